//! Storyboard manifest: the ordered list of steps, read once at startup.

use std::{fs, io, path::Path};

use serde::Deserialize;
use shared::RenderKind;
use story_core::{Resource, ResourceTable, Slot};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read storyboard '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid storyboard: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("step {step}: 'source' is set but 'kind' is missing")]
    MissingKind { step: usize },
    #[error("step {step}: '{field}' needs a 'source'")]
    OrphanField { step: usize, field: &'static str },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Storyboard {
    #[serde(default, rename = "step")]
    steps: Vec<StepEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StepEntry {
    source: Option<String>,
    kind: Option<RenderKind>,
    caption: Option<String>,
}

impl StepEntry {
    fn into_slot(self, step: usize) -> Result<Slot, ManifestError> {
        let Some(source) = self.source else {
            if self.kind.is_some() {
                return Err(ManifestError::OrphanField { step, field: "kind" });
            }
            if self.caption.is_some() {
                return Err(ManifestError::OrphanField {
                    step,
                    field: "caption",
                });
            }
            return Ok(Slot::Empty);
        };

        let kind = self.kind.ok_or(ManifestError::MissingKind { step })?;
        let resource = Resource::new(source, kind);
        Ok(Slot::from(match self.caption {
            Some(caption) => resource.with_caption(caption),
            None => resource,
        }))
    }
}

pub fn parse_storyboard(raw: &str) -> Result<ResourceTable, ManifestError> {
    let storyboard: Storyboard = toml::from_str(raw)?;
    storyboard
        .steps
        .into_iter()
        .enumerate()
        .map(|(step, entry)| entry.into_slot(step))
        .collect::<Result<Vec<_>, _>>()
        .map(ResourceTable::new)
}

pub fn load_storyboard(path: &Path) -> Result<ResourceTable, ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = parse_storyboard(&raw)?;
    info!(
        path = %path.display(),
        steps = table.len(),
        resources = table.resources().count(),
        "loaded storyboard"
    );
    Ok(table)
}

#[cfg(test)]
#[path = "tests/manifest_tests.rs"]
mod tests;
