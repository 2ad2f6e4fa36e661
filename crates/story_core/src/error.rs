use shared::StepId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequencerError {
    #[error("resource '{source_location}' is not loaded")]
    NotLoaded { source_location: String },
    #[error("step {step} is outside the presentation (0..{len})")]
    StepOutOfRange { step: StepId, len: usize },
    #[error("dispatcher already has a subscriber")]
    AlreadySubscribed,
}
