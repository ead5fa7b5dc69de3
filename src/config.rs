use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Desktop browser user agent sent with every page load
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36";

/// Environment variable that overrides the configured WebDriver endpoint
pub const WEBDRIVER_URL_ENV: &str = "WEBDRIVER_URL";

/// Configuration for a single scrape-and-generate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory recreated empty at startup, receives scraped.html and generated.txt
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Text file holding the system prompt sent to the model
    #[serde(default = "default_system_prompt_path")]
    pub system_prompt_path: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// User agent the browser presents to the target site
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Chat-completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key; when absent it is read from OPENAI_API_KEY at generation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Regex matched against the `name` attribute of meta tags
    #[serde(default = "default_meta_name_pattern")]
    pub meta_name_pattern: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_system_prompt_path() -> PathBuf {
    PathBuf::from("system_prompt.txt")
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_meta_name_pattern() -> String {
    "description".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            system_prompt_path: default_system_prompt_path(),
            webdriver_url: default_webdriver_url(),
            user_agent: default_user_agent(),
            model: default_model(),
            api_base: default_api_base(),
            api_key: None,
            meta_name_pattern: default_meta_name_pattern(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply overrides taken from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var(WEBDRIVER_URL_ENV) {
            if !webdriver_url.is_empty() {
                ::log::debug!("Using WebDriver URL from {}", WEBDRIVER_URL_ENV);
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}
