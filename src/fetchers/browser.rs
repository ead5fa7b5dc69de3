use crate::config::AppConfig;
use crate::error::NavigationError;
use crate::fetchers::PageFetcher;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::{Duration, Instant};
use url::Url;

/// Quiet period the resource count must hold steady for the network to count as idle
const NETWORK_IDLE_WINDOW: Duration = Duration::from_millis(500);

/// Upper bound on waiting for network idleness before capturing anyway
const NETWORK_SETTLE_LIMIT: Duration = Duration::from_secs(30);

/// Upper bound on waiting for the body element to appear
const BODY_WAIT_LIMIT: Duration = Duration::from_secs(30);

const NETWORK_STATE_SCRIPT: &str = "return { \
    ready: document.readyState === 'complete', \
    resources: performance.getEntriesByType('resource').length \
};";

/// Renders pages in a headless browser driven over WebDriver.
///
/// Each call opens its own session and closes it before returning.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    webdriver_url: String,
    user_agent: String,
}

impl BrowserFetcher {
    pub fn new(webdriver_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.webdriver_url, &config.user_agent)
    }

    /// Headless session capabilities for Chrome and Firefox, both carrying the user agent
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless=new",
                    "--disable-gpu",
                    format!("--user-agent={}", self.user_agent),
                ]
            }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({
                "args": ["-headless"],
                "prefs": { "general.useragent.override": self.user_agent },
            }),
        );
        caps
    }

    async fn connect(&self) -> Result<Client, NavigationError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        let client = builder
            .connect(&self.webdriver_url)
            .await
            .map_err(|source| NavigationError::Session {
                webdriver_url: self.webdriver_url.clone(),
                source,
            })?;
        ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
        Ok(client)
    }

    async fn render(&self, client: &Client, url: &str) -> Result<String, NavigationError> {
        let command_error = |context: &'static str| {
            move |source| NavigationError::Command {
                context,
                url: url.to_string(),
                source,
            }
        };

        client
            .goto(url)
            .await
            .map_err(command_error("navigating to"))?;

        client
            .wait()
            .at_most(BODY_WAIT_LIMIT)
            .for_element(Locator::Css("body"))
            .await
            .map_err(command_error("waiting for the body of"))?;

        wait_for_network_idle(client)
            .await
            .map_err(command_error("waiting for network idle on"))?;

        client
            .source()
            .await
            .map_err(command_error("getting source for"))
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, NavigationError> {
        let parsed = Url::parse(url).map_err(|source| NavigationError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let started = Instant::now();
        ::log::info!("Fetching {} via {}", parsed, self.webdriver_url);

        let client = self.connect().await?;
        let result = self.render(&client, parsed.as_str()).await;

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        if let Ok(html) = &result {
            ::log::debug!(
                "Fetched {} ({} bytes) in {:.2} seconds",
                parsed,
                html.len(),
                started.elapsed().as_secs_f64()
            );
        }
        result
    }
}

/// Polls until the document has loaded and no new resources appear for one idle window
async fn wait_for_network_idle(client: &Client) -> Result<(), fantoccini::error::CmdError> {
    let deadline = Instant::now() + NETWORK_SETTLE_LIMIT;
    let mut last_count = None;

    loop {
        let state = client.execute(NETWORK_STATE_SCRIPT, vec![]).await?;
        let ready = state["ready"].as_bool().unwrap_or(false);
        let count = state["resources"].as_u64();

        if ready && count.is_some() && count == last_count {
            ::log::trace!("Network idle with {:?} resources loaded", count);
            return Ok(());
        }
        if Instant::now() >= deadline {
            ::log::warn!("Network did not settle; capturing the page as it stands");
            return Ok(());
        }

        last_count = count;
        tokio::time::sleep(NETWORK_IDLE_WINDOW).await;
    }
}
