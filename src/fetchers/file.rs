use crate::error::NavigationError;
use crate::fetchers::PageFetcher;
use std::path::PathBuf;

/// Serves HTML saved on disk instead of driving a browser
#[derive(Debug, Clone)]
pub struct FileFetcher {
    path: PathBuf,
}

impl FileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<String, NavigationError> {
        ::log::info!("Reading HTML for {} from {}", url, self.path.display());
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| NavigationError::File {
                path: self.path.clone(),
                source,
            })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
