use std::path::PathBuf;
use thiserror::Error;

/// Failures while obtaining the rendered HTML of the target page
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid target URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to start a browser session at {webdriver_url}: {source}")]
    Session {
        webdriver_url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("failed while {context} {url}: {source}")]
    Command {
        context: &'static str,
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("failed to read HTML from {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A page matched a known failure signature and should not be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScrapeRejected {
    #[error(
        "It looks like this site has denied access to our scraper. Use the --force flag to override this error."
    )]
    AccessDenied,

    #[error("It looks like this site is unreadable by our scraper. Improve your SEO and try again.")]
    JavaScriptRequired,
}

/// Failures of the chat-completion call
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0} is not set; add it to the environment or a .env file")]
    MissingCredential(&'static str),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("model API returned HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("model API response contained no choices")]
    EmptyResponse,
}

/// Failures loading the JSON configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid meta name pattern: {0}")]
    MetaPattern(#[from] regex::Error),
}

/// Everything that can abort a run, apart from an expected extraction rejection
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to prepare log directory {}: {source}", .path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read system prompt {}: {source}", .path.display())]
    SystemPrompt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
