use std::sync::Arc;

use shared::StepId;

use crate::resource::{LoadState, Resource};

/// One step of the presentation.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Navigation placeholder with no data dependency.
    Empty,
    Resource(Arc<Resource>),
}

impl Slot {
    pub fn resource(&self) -> Option<&Arc<Resource>> {
        match self {
            Slot::Empty => None,
            Slot::Resource(resource) => Some(resource),
        }
    }
}

impl From<Resource> for Slot {
    fn from(resource: Resource) -> Self {
        Slot::Resource(Arc::new(resource))
    }
}

impl From<Option<Resource>> for Slot {
    fn from(resource: Option<Resource>) -> Self {
        resource.map_or(Slot::Empty, Slot::from)
    }
}

/// Steps in narrative order. The order is fixed once the table is built.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    slots: Vec<Slot>,
}

impl ResourceTable {
    pub fn new(slots: Vec<Slot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, step: StepId) -> Option<&Slot> {
        self.slots.get(step.0)
    }

    pub fn resource(&self, step: StepId) -> Option<&Arc<Resource>> {
        self.slot(step).and_then(Slot::resource)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepId, &Slot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(idx, slot)| (StepId(idx), slot))
    }

    pub fn resources(&self) -> impl Iterator<Item = (StepId, &Arc<Resource>)> {
        self.iter()
            .filter_map(|(step, slot)| slot.resource().map(|resource| (step, resource)))
    }

    /// Lowest-index resource that has never been loaded.
    pub fn first_unloaded(&self) -> Option<(StepId, &Arc<Resource>)> {
        self.resources()
            .find(|(_, resource)| resource.state() == LoadState::Unloaded)
    }

    pub fn any_loading(&self) -> bool {
        self.resources()
            .any(|(_, resource)| resource.state() == LoadState::Loading)
    }

    /// Per-step load state; `None` for empty slots.
    pub fn states(&self) -> Vec<Option<LoadState>> {
        self.slots
            .iter()
            .map(|slot| slot.resource().map(|resource| resource.state()))
            .collect()
    }
}

impl FromIterator<Slot> for ResourceTable {
    fn from_iter<I: IntoIterator<Item = Slot>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
