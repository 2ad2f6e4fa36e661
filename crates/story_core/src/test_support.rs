//! Fakes shared by the resource and sequencer tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use loader::{FetchError, SourceFetcher};
use shared::{RenderKind, StepId, Table};
use tokio::{sync::Notify, time::timeout};

use crate::{
    dispatcher::{Dispatcher, TriggerReceiver},
    presenter::Presenter,
    resource_table::{ResourceTable, Slot},
    sequencer::{Sequencer, TriggerOutcome},
};

const SETTLE_LIMIT: Duration = Duration::from_secs(5);

fn locked<T: Clone>(mutex: &Mutex<T>) -> T {
    mutex.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Serves canned bodies. Unknown sources fail; gated sources block until
/// [`ScriptedFetcher::open`] is called.
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    bodies: HashMap<String, String>,
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn with_body(mut self, source: &str, body: &str) -> Self {
        self.bodies.insert(source.to_string(), body.to_string());
        self
    }

    pub(crate) fn with_gate(mut self, source: &str) -> Self {
        self.gates
            .insert(source.to_string(), Arc::new(Notify::new()));
        self
    }

    pub(crate) fn open(&self, source: &str) {
        if let Some(gate) = self.gates.get(source) {
            gate.notify_one();
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        locked(&self.calls)
    }

    pub(crate) fn calls_for(&self, source: &str) -> usize {
        self.calls().iter().filter(|call| *call == source).count()
    }
}

#[async_trait]
impl SourceFetcher for ScriptedFetcher {
    async fn fetch(&self, source: &str) -> Result<String, FetchError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source.to_string());

        match self.gates.get(source) {
            Some(gate) => gate.notified().await,
            None => tokio::task::yield_now().await,
        }

        self.bodies
            .get(source)
            .cloned()
            .ok_or_else(|| FetchError::InvalidSource {
                location: source.to_string(),
                reason: "no scripted body".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PresenterCall {
    Render(StepId, RenderKind),
    ShowOnly(Vec<StepId>),
    Caption(String),
}

#[derive(Default)]
pub(crate) struct RecordingPresenter {
    calls: Mutex<Vec<PresenterCall>>,
}

impl RecordingPresenter {
    pub(crate) fn calls(&self) -> Vec<PresenterCall> {
        locked(&self.calls)
    }

    pub(crate) fn renders(&self) -> Vec<StepId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PresenterCall::Render(step, _) => Some(step),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: PresenterCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, step: StepId, kind: RenderKind, _table: &Table) {
        self.record(PresenterCall::Render(step, kind));
    }

    fn show_only(&self, steps: &[StepId]) {
        self.record(PresenterCall::ShowOnly(steps.to_vec()));
    }

    fn set_caption(&self, text: &str) {
        self.record(PresenterCall::Caption(text.to_string()));
    }
}

/// A sequencer whose triggers are delivered by hand.
pub(crate) struct Harness {
    pub(crate) sequencer: Arc<Sequencer>,
    pub(crate) triggers: TriggerReceiver,
    pub(crate) fetcher: Arc<ScriptedFetcher>,
    pub(crate) presenter: Arc<RecordingPresenter>,
}

impl Harness {
    pub(crate) fn new(slots: Vec<Slot>, fetcher: ScriptedFetcher) -> Self {
        let fetcher = Arc::new(fetcher);
        let presenter = Arc::new(RecordingPresenter::default());
        let dispatcher = Dispatcher::new();
        let triggers = dispatcher.take_receiver().expect("receiver");
        let sequencer = Sequencer::new(
            ResourceTable::new(slots),
            fetcher.clone(),
            presenter.clone(),
            dispatcher,
        );
        Self {
            sequencer,
            triggers,
            fetcher,
            presenter,
        }
    }

    /// Delivers every queued trigger; returns how many were delivered.
    pub(crate) fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while self.triggers.try_recv().is_some() {
            self.sequencer.on_trigger();
            delivered += 1;
        }
        delivered
    }

    /// Waits for the next trigger (normally a load completion) and delivers it.
    pub(crate) async fn next(&mut self) -> TriggerOutcome {
        timeout(SETTLE_LIMIT, self.triggers.recv())
            .await
            .expect("timed out waiting for a trigger")
            .expect("dispatcher closed");
        self.sequencer.on_trigger()
    }

    /// Delivers triggers until nothing is loading and nothing is queued.
    pub(crate) async fn settle(&mut self) {
        let Self {
            sequencer,
            triggers,
            ..
        } = self;
        let settle = async {
            loop {
                while triggers.try_recv().is_some() {
                    sequencer.on_trigger();
                }
                if !sequencer.table().any_loading() {
                    break;
                }
                if triggers.recv().await.is_some() {
                    sequencer.on_trigger();
                }
            }
        };
        timeout(SETTLE_LIMIT, settle)
            .await
            .expect("sequencer did not settle");
    }
}
