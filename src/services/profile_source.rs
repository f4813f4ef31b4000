//! Where the profile document comes from.
//!
//! A run fetches the raw JSON text exactly once; parsing happens in the
//! pipeline so every source fails the same way on malformed input.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::AssetLoader;
use crate::error::LoadFailure;
use crate::models::AppConfig;

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the raw profile document
    async fn fetch(&self) -> Result<String, LoadFailure>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Profile file in the site directory, with the embedded sample as fallback
pub struct FileSource {
    path: PathBuf,
    assets: Arc<AssetLoader>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, assets: Arc<AssetLoader>) -> Self {
        Self {
            path: path.into(),
            assets,
        }
    }
}

#[async_trait]
impl ProfileSource for FileSource {
    async fn fetch(&self) -> Result<String, LoadFailure> {
        self.assets
            .read_site_string(&self.path)
            .map_err(|source| LoadFailure::Asset {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Profile served over HTTP(S)
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ProfileSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadFailure> {
        tracing::debug!(url = %self.url, "Fetching profile");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadFailure::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Profile text supplied up front (stdin, tests)
pub struct InlineSource {
    label: String,
    content: String,
}

impl InlineSource {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
        }
    }
}

#[async_trait]
impl ProfileSource for InlineSource {
    async fn fetch(&self) -> Result<String, LoadFailure> {
        Ok(self.content.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Pick the source for the configured profile location
pub fn source_for(config: &AppConfig, assets: Arc<AssetLoader>) -> Box<dyn ProfileSource> {
    if config.data_is_remote() {
        Box::new(HttpSource::new(config.data.as_str()))
    } else {
        Box::new(FileSource::new(config.data.as_str(), assets))
    }
}
