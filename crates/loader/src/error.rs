use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source '{location}': {reason}")]
    InvalidSource { location: String, reason: String },
    #[error("request for '{location}' failed: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("'{location}' returned HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("failed to read '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv has no header row")]
    MissingHeader,
}

/// Everything that can go wrong between a source location and a parsed table.
///
/// Callers of the sequencer never see this; a resource collapses it into its
/// failed state and logs it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to parse '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: ParseError,
    },
}
