use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use loader::{load_table, LoadError, SourceFetcher};
use shared::{RenderKind, StepId, Table};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::{error::SequencerError, presenter::Presenter};

/// Load lifecycle of a [`Resource`].
///
/// `Unloaded -> Loading -> Loaded | Failed`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

impl LoadState {
    pub fn is_settled(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }
}

enum Lifecycle {
    Unloaded,
    Loading,
    Loaded(Arc<Table>),
    Failed,
}

impl Lifecycle {
    fn state(&self) -> LoadState {
        match self {
            Lifecycle::Unloaded => LoadState::Unloaded,
            Lifecycle::Loading => LoadState::Loading,
            Lifecycle::Loaded(_) => LoadState::Loaded,
            Lifecycle::Failed => LoadState::Failed,
        }
    }
}

/// One fetchable data source bound to the presenter routine that draws it.
pub struct Resource {
    source: String,
    kind: RenderKind,
    caption: Option<String>,
    lifecycle: Mutex<Lifecycle>,
}

impl Resource {
    pub fn new(source: impl Into<String>, kind: RenderKind) -> Self {
        Self {
            source: source.into(),
            kind,
            caption: None,
            lifecycle: Mutex::new(Lifecycle::Unloaded),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> RenderKind {
        self.kind
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn state(&self) -> LoadState {
        self.lock().state()
    }

    pub fn payload(&self) -> Option<Arc<Table>> {
        match &*self.lock() {
            Lifecycle::Loaded(table) => Some(Arc::clone(table)),
            _ => None,
        }
    }

    /// Starts the one and only fetch of this resource.
    ///
    /// Returns `None` without side effects unless the resource is `Unloaded`.
    /// Otherwise the resource is `Loading` by the time this returns, the
    /// fetch+parse runs on a spawned task, and `on_complete` is called exactly
    /// once with the settled state (`Loaded` or `Failed`). A fetch that panics
    /// settles as `Failed`.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn load<F>(
        self: &Arc<Self>,
        fetcher: Arc<dyn SourceFetcher>,
        on_complete: F,
    ) -> Option<JoinHandle<()>>
    where
        F: FnOnce(LoadState) + Send + 'static,
    {
        if !self.begin_load() {
            return None;
        }

        let resource = Arc::clone(self);
        Some(tokio::spawn(async move {
            let fetching = Arc::clone(&resource);
            let task = tokio::spawn(async move {
                load_table(fetcher.as_ref(), &fetching.source).await
            });
            let state = match task.await {
                Ok(outcome) => resource.finish_load(outcome),
                Err(err) => resource.abandon_load(&err),
            };
            on_complete(state);
        }))
    }

    /// Hands the loaded payload to the presenter.
    ///
    /// Calling this before the resource is `Loaded` is a contract violation
    /// and returns [`SequencerError::NotLoaded`].
    pub fn render(&self, step: StepId, presenter: &dyn Presenter) -> Result<(), SequencerError> {
        let table = self.payload().ok_or_else(|| SequencerError::NotLoaded {
            source_location: self.source.clone(),
        })?;
        presenter.render(step, self.kind, &table);
        Ok(())
    }

    fn begin_load(&self) -> bool {
        let mut lifecycle = self.lock();
        if !matches!(*lifecycle, Lifecycle::Unloaded) {
            debug!(
                source = %self.source,
                state = ?lifecycle.state(),
                "load skipped"
            );
            return false;
        }
        *lifecycle = Lifecycle::Loading;
        info!(source = %self.source, "loading resource");
        true
    }

    fn finish_load(&self, outcome: Result<Table, LoadError>) -> LoadState {
        let next = match outcome {
            Ok(table) => {
                info!(source = %self.source, rows = table.len(), "resource loaded");
                Lifecycle::Loaded(Arc::new(table))
            }
            Err(err) => {
                warn!(source = %self.source, error = %err, "resource failed to load");
                Lifecycle::Failed
            }
        };
        let mut lifecycle = self.lock();
        *lifecycle = next;
        lifecycle.state()
    }

    fn abandon_load(&self, err: &JoinError) -> LoadState {
        error!(source = %self.source, error = %err, "load task died; marking resource failed");
        let mut lifecycle = self.lock();
        *lifecycle = Lifecycle::Failed;
        lifecycle.state()
    }

    fn lock(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("caption", &self.caption)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/resource_tests.rs"]
mod tests;
