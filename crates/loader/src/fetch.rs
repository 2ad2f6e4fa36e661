use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Reads the raw text behind a source location.
///
/// Each call is one network or storage read; deduplication is the caller's
/// concern.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    http: Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // Without a trailing slash `Url::join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    fn resolve(&self, source: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(source)
            .map_err(|err| FetchError::InvalidSource {
                location: source.to_string(),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, source: &str) -> Result<String, FetchError> {
        let url = self.resolve(source)?;
        debug!(%url, "fetching over http");
        let http_err = |source_err| FetchError::Http {
            location: url.to_string(),
            source: source_err,
        };
        let res = self.http.get(url.clone()).send().await.map_err(http_err)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }
        res.text().await.map_err(http_err)
    }
}

pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, source: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(source);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if source.is_empty() || escapes_root {
            return Err(FetchError::InvalidSource {
                location: source.to_string(),
                reason: "expected a relative path inside the asset root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch(&self, source: &str) -> Result<String, FetchError> {
        let path = self.resolve(source)?;
        debug!(path = %path.display(), "reading asset file");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source_err| FetchError::Io {
                location: path.display().to_string(),
                source: source_err,
            })
    }
}

/// Picks a fetcher for an asset root: `http(s)://` roots go over the network,
/// anything else is a local directory.
pub fn fetcher_for(asset_root: &str) -> Result<Box<dyn SourceFetcher>, FetchError> {
    let lower = asset_root.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        let base_url = Url::parse(asset_root).map_err(|err| FetchError::InvalidSource {
            location: asset_root.to_string(),
            reason: err.to_string(),
        })?;
        return Ok(Box::new(HttpFetcher::new(base_url)));
    }
    Ok(Box::new(FileFetcher::new(asset_root)))
}
