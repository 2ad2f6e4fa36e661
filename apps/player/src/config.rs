use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "player.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerSettings {
    pub storyboard: PathBuf,
    /// Directory path or `http(s)://` base URL that step sources are relative to.
    pub asset_root: String,
    pub log_filter: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            storyboard: PathBuf::from("storyboard.toml"),
            asset_root: ".".into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicitly named config file must exist; the default `player.toml` is
/// optional.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<PlayerSettings> {
    let mut settings = match explicit {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            parse_settings(&raw, path)?
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(raw) => parse_settings(&raw, Path::new(DEFAULT_CONFIG_FILE))?,
            Err(err) if err.kind() == ErrorKind::NotFound => PlayerSettings::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read '{DEFAULT_CONFIG_FILE}'"))
            }
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn parse_settings(raw: &str, path: &Path) -> anyhow::Result<PlayerSettings> {
    toml::from_str(raw).with_context(|| format!("invalid config '{}'", path.display()))
}

/// `SCROLLY_*` variables override the file; `APP__*` variables override both.
pub fn apply_env_overrides<F>(settings: &mut PlayerSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("SCROLLY_STORYBOARD") {
        settings.storyboard = PathBuf::from(v);
    }
    if let Some(v) = lookup("APP__STORYBOARD") {
        settings.storyboard = PathBuf::from(v);
    }

    if let Some(v) = lookup("SCROLLY_ASSET_ROOT") {
        settings.asset_root = v;
    }
    if let Some(v) = lookup("APP__ASSET_ROOT") {
        settings.asset_root = v;
    }

    if let Some(v) = lookup("SCROLLY_LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}
