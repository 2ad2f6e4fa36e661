//! Fetch+parse collaborator: turns a source location into a typed [`Table`].

use shared::Table;
use tracing::debug;

pub mod error;
pub mod fetch;
pub mod parse;

pub use error::{FetchError, LoadError, ParseError};
pub use fetch::{fetcher_for, FileFetcher, HttpFetcher, SourceFetcher};
pub use parse::parse_table;

/// Fetches `source` and parses it into a table.
pub async fn load_table(fetcher: &dyn SourceFetcher, source: &str) -> Result<Table, LoadError> {
    let text = fetcher.fetch(source).await?;
    let table = parse_table(&text).map_err(|err| LoadError::Parse {
        location: source.to_string(),
        source: err,
    })?;
    debug!(
        source,
        rows = table.len(),
        columns = table.columns().len(),
        "parsed table"
    );
    Ok(table)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
