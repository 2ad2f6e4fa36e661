//! Load/render sequencing for step-by-step data presentations.
//!
//! A [`Sequencer`] owns a [`ResourceTable`] of steps. Every trigger published
//! on its [`Dispatcher`] (navigation or a finished load) re-runs one
//! evaluation that either renders the requested step or starts the next
//! background load.

pub mod dispatcher;
pub mod error;
pub mod presenter;
pub mod resource;
pub mod resource_table;
pub mod sequencer;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{Dispatcher, Trigger, TriggerReceiver};
pub use error::SequencerError;
pub use presenter::{name_value_pairs, NameValue, Presenter};
pub use resource::{LoadState, Resource};
pub use resource_table::{ResourceTable, Slot};
pub use sequencer::{Evaluation, Sequencer, SequencerSnapshot, TriggerOutcome};
