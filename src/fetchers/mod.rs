pub mod browser;
pub mod file;

pub use browser::BrowserFetcher;
pub use file::FileFetcher;

use crate::error::NavigationError;

/// Source of rendered HTML for a single page
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Return the fully rendered HTML of `url`
    async fn fetch(&self, url: &str) -> Result<String, NavigationError>;
}
