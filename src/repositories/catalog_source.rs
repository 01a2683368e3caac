use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{CatalogDocument, RepositoryError, RepositoryResult};

/// Read-only source of the catalog document
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch and parse the catalog document
    async fn fetch(&self) -> RepositoryResult<CatalogDocument>;

    /// Location shown in logs and error messages
    fn location(&self) -> String;
}

/// Catalog document stored on the local filesystem
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> RepositoryResult<CatalogDocument> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| RepositoryError::Io {
                path: self.path.display().to_string(),
                source,
            })?;

        let document: CatalogDocument = serde_json::from_str(&raw)?;
        info!(services = document.services.len(), "Catalog read from file");
        Ok(document)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog document served over HTTP(S)
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> RepositoryResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepositoryError::Http {
                url: url.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, url })
    }

    fn http_error(&self, message: impl Into<String>) -> RepositoryError {
        RepositoryError::Http {
            url: self.url.clone(),
            message: message.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> RepositoryResult<CatalogDocument> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.http_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.http_error(format!("Unexpected status {}", status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.http_error(e.to_string()))?;
        let document: CatalogDocument = serde_json::from_str(&body)?;

        info!(services = document.services.len(), "Catalog fetched over HTTP");
        Ok(document)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a configured location: `http://` and `https://` URLs are
/// fetched, anything else is read as a file path
pub fn catalog_source_for(
    location: &str,
    timeout: Duration,
) -> RepositoryResult<Arc<dyn CatalogSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Arc::new(HttpCatalogSource::new(location, timeout)?))
    } else {
        Ok(Arc::new(FileCatalogSource::new(location)))
    }
}
