//! Trigger bus between navigation, load completions and the sequencer.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::{
    sync::mpsc::{self, error::TryRecvError},
    task::JoinHandle,
};
use tracing::debug;

use crate::error::SequencerError;

/// "Re-evaluate". Carries no payload: the sequencer reads current state, so
/// duplicate or reordered triggers are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger;

#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    tx: mpsc::UnboundedSender<Trigger>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<Trigger>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(DispatcherInner {
                tx,
                rx: Mutex::new(Some(rx)),
            }),
        }
    }

    /// Queues a trigger for the subscriber. Never blocks.
    pub fn publish(&self) {
        if self.inner.tx.send(Trigger).is_err() {
            debug!("trigger dropped: subscriber is gone");
        }
    }

    /// Claims the single subscription for manual delivery.
    pub fn take_receiver(&self) -> Result<TriggerReceiver, SequencerError> {
        self.inner
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|rx| TriggerReceiver { rx })
            .ok_or(SequencerError::AlreadySubscribed)
    }

    /// Runs `handler` once per published trigger on a spawned task.
    ///
    /// There is exactly one subscriber; a second call fails with
    /// [`SequencerError::AlreadySubscribed`].
    pub fn subscribe<F>(&self, mut handler: F) -> Result<JoinHandle<()>, SequencerError>
    where
        F: FnMut() + Send + 'static,
    {
        let mut receiver = self.take_receiver()?;
        Ok(tokio::spawn(async move {
            while receiver.recv().await.is_some() {
                handler();
            }
        }))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TriggerReceiver {
    rx: mpsc::UnboundedReceiver<Trigger>,
}

impl TriggerReceiver {
    pub async fn recv(&mut self) -> Option<Trigger> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<Trigger> {
        match self.rx.try_recv() {
            Ok(trigger) => Some(trigger),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
