//! Decides, per trigger, whether to render the requested step or warm the
//! cache with a background load.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use loader::SourceFetcher;
use shared::StepId;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    dispatcher::Dispatcher,
    error::SequencerError,
    presenter::Presenter,
    resource::{LoadState, Resource},
    resource_table::{ResourceTable, Slot},
};

/// What a single evaluation did. All `None` means nothing changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub shown: Option<StepId>,
    pub rendered: Option<StepId>,
    pub foreground_load: Option<StepId>,
    pub prefetch: Option<StepId>,
}

impl Evaluation {
    pub fn is_noop(&self) -> bool {
        *self == Evaluation::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Another trigger was already being processed; this one was dropped.
    Coalesced,
    Evaluated(Evaluation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerSnapshot {
    pub requested: Option<StepId>,
    pub rendered: Option<StepId>,
    pub visible: Option<StepId>,
    pub states: Vec<Option<LoadState>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    rendered: Option<StepId>,
    visible: Option<StepId>,
}

pub struct Sequencer {
    table: ResourceTable,
    fetcher: Arc<dyn SourceFetcher>,
    presenter: Arc<dyn Presenter>,
    dispatcher: Dispatcher,
    /// Step the viewer wants; `None` until navigation starts.
    requested: Mutex<Option<StepId>>,
    cursor: Mutex<Cursor>,
    /// Single-flight guard. Set only while a trigger is being evaluated;
    /// triggers that find it set are dropped, not queued.
    busy: AtomicBool,
}

impl Sequencer {
    pub fn new(
        table: ResourceTable,
        fetcher: Arc<dyn SourceFetcher>,
        presenter: Arc<dyn Presenter>,
        dispatcher: Dispatcher,
    ) -> Arc<Self> {
        Arc::new(Self {
            table,
            fetcher,
            presenter,
            dispatcher,
            requested: Mutex::new(None),
            cursor: Mutex::new(Cursor::default()),
            busy: AtomicBool::new(false),
        })
    }

    /// Subscribes [`Sequencer::on_trigger`] to the dispatcher.
    pub fn attach(self: &Arc<Self>) -> Result<JoinHandle<()>, SequencerError> {
        let sequencer = Arc::clone(self);
        self.dispatcher.subscribe(move || {
            sequencer.on_trigger();
        })
    }

    pub fn table(&self) -> &ResourceTable {
        &self.table
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn requested(&self) -> Option<StepId> {
        *lock(&self.requested)
    }

    pub fn rendered(&self) -> Option<StepId> {
        lock(&self.cursor).rendered
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        let requested = self.requested();
        let cursor = lock(&self.cursor);
        SequencerSnapshot {
            requested,
            rendered: cursor.rendered,
            visible: cursor.visible,
            states: self.table.states(),
        }
    }

    /// Kicks off the first evaluation, before any step is requested, so
    /// background prefetch starts right away.
    pub fn start(&self) {
        debug!(steps = self.table.len(), "starting sequencer");
        self.dispatcher.publish();
    }

    /// Moves one step forward, stopping at the last step.
    pub fn advance(&self) -> Option<StepId> {
        let last = self.table.len().checked_sub(1);
        self.navigate(|current| {
            let last = last?;
            Some(StepId(current.map_or(0, |step| (step.0 + 1).min(last))))
        })
    }

    /// Moves one step back, stopping at the first step.
    pub fn retreat(&self) -> Option<StepId> {
        let has_steps = !self.table.is_empty();
        self.navigate(|current| {
            has_steps.then(|| StepId(current.map_or(0, |step| step.0.saturating_sub(1))))
        })
    }

    pub fn go_to(&self, step: StepId) -> Result<(), SequencerError> {
        if step.0 >= self.table.len() {
            return Err(SequencerError::StepOutOfRange {
                step,
                len: self.table.len(),
            });
        }
        self.navigate(|_| Some(step));
        Ok(())
    }

    fn navigate<F>(&self, next: F) -> Option<StepId>
    where
        F: FnOnce(Option<StepId>) -> Option<StepId>,
    {
        let requested = {
            let mut requested = lock(&self.requested);
            if let Some(step) = next(*requested) {
                *requested = Some(step);
            }
            *requested
        };
        debug!(requested = ?requested, "navigation");
        self.dispatcher.publish();
        requested
    }

    /// Trigger entry point: evaluates once unless an evaluation is already
    /// running, in which case the trigger is dropped.
    pub fn on_trigger(&self) -> TriggerOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("trigger coalesced into running evaluation");
            return TriggerOutcome::Coalesced;
        }
        let _busy = BusyGuard(&self.busy);
        let evaluation = self.evaluate();
        debug!(?evaluation, "trigger evaluated");
        TriggerOutcome::Evaluated(evaluation)
    }

    fn evaluate(&self) -> Evaluation {
        let requested = self.requested();
        let Cursor { rendered, visible } = *lock(&self.cursor);
        let mut evaluation = Evaluation::default();

        // The cursor lock is never held across presenter calls.
        if let Some(step) = requested {
            if visible != Some(step) {
                lock(&self.cursor).visible = Some(step);
                self.presenter.show_only(&[step]);
                evaluation.shown = Some(step);
            }

            if rendered != Some(step) {
                match self.table.slot(step) {
                    Some(Slot::Resource(resource)) => {
                        self.act_on_requested(step, resource, &mut evaluation);
                    }
                    Some(Slot::Empty) | None => {}
                }
            }
        }

        if evaluation.rendered.is_none() && evaluation.foreground_load.is_none() {
            if let Some((step, resource)) = self.table.first_unloaded() {
                if self.start_load(step, resource) {
                    debug!(%step, source = resource.source(), "background prefetch");
                    evaluation.prefetch = Some(step);
                }
            }
        }

        evaluation
    }

    fn act_on_requested(
        &self,
        step: StepId,
        resource: &Arc<Resource>,
        evaluation: &mut Evaluation,
    ) {
        match resource.state() {
            LoadState::Failed => {
                if evaluation.shown == Some(step) {
                    warn!(%step, source = resource.source(), "requested step failed to load; not rendering");
                } else {
                    debug!(%step, "requested step failed to load");
                }
            }
            LoadState::Loaded => match resource.render(step, self.presenter.as_ref()) {
                Ok(()) => {
                    info!(%step, source = resource.source(), kind = %resource.kind(), "rendered step");
                    lock(&self.cursor).rendered = Some(step);
                    evaluation.rendered = Some(step);
                    if let Some(caption) = resource.caption() {
                        self.presenter.set_caption(caption);
                    }
                }
                Err(err) => error!(%step, error = %err, "render refused"),
            },
            LoadState::Unloaded => {
                if self.start_load(step, resource) {
                    evaluation.foreground_load = Some(step);
                }
            }
            LoadState::Loading => debug!(%step, "requested step still loading"),
        }
    }

    fn start_load(&self, step: StepId, resource: &Arc<Resource>) -> bool {
        let dispatcher = self.dispatcher.clone();
        resource
            .load(Arc::clone(&self.fetcher), move |state| {
                debug!(%step, ?state, "load settled");
                dispatcher.publish();
            })
            .is_some()
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;
