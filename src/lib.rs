//! Scrape a single web page and turn its content into marketing copy.
//!
//! The [`Pipeline`] runs the stages in order: fetch, parse, classify and
//! truncate, then prompt a chat-completion model. Each stage is a separate
//! method so the driver can report progress and stop on a rejected scrape.

pub mod config;
pub mod error;
pub mod extractor;
pub mod fetchers;
pub mod generator;
pub mod parsers;
pub mod results;
pub mod run_log;

pub use config::AppConfig;
pub use error::{Error, GenerationError, NavigationError, ScrapeRejected};
pub use extractor::Extractor;
pub use fetchers::{BrowserFetcher, FileFetcher, PageFetcher};
pub use parsers::PageDocument;
pub use results::{ExtractionResult, GenerationRequest, GenerationResult};
pub use run_log::RunLog;

use generator::ChatGenerator;
use parsers::Parser;
use std::fs;

/// Tone used when none is requested
pub const DEFAULT_TONE: &str = "Professional";

/// One scrape-and-generate run
pub struct Pipeline {
    config: AppConfig,
    run_log: RunLog,
    system_prompt: String,
    parser: Parser,
    extractor: Extractor,
    tone: String,
    force: bool,
}

impl Pipeline {
    /// Reset the log directory and load the system prompt.
    ///
    /// Runs before any fetch so stale logs from an earlier run never survive.
    pub fn prepare(config: AppConfig) -> error::Result<Self> {
        let run_log = RunLog::reset(&config.log_dir).map_err(|source| Error::LogDirectory {
            path: config.log_dir.clone(),
            source,
        })?;

        let system_prompt =
            fs::read_to_string(&config.system_prompt_path).map_err(|source| {
                Error::SystemPrompt {
                    path: config.system_prompt_path.clone(),
                    source,
                }
            })?;

        let parser = Parser::new(&config.meta_name_pattern).map_err(error::ConfigError::from)?;

        Ok(Self {
            config,
            run_log,
            system_prompt,
            parser,
            extractor: Extractor::new(),
            tone: DEFAULT_TONE.to_string(),
            force: false,
        })
    }

    /// Set the requested advertisement tone; an empty tone keeps the default
    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        let tone = tone.into();
        self.tone = if tone.is_empty() {
            DEFAULT_TONE.to_string()
        } else {
            tone
        };
        self
    }

    /// Skip the rejection checks during extraction
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn run_log(&self) -> &RunLog {
        &self.run_log
    }

    /// Fetch the page, parse it and log the pretty-printed DOM
    pub async fn scrape<F: PageFetcher>(
        &self,
        fetcher: &F,
        url: &str,
    ) -> error::Result<PageDocument> {
        let html = fetcher.fetch(url).await?;
        let parsed = self.parser.parse(&html);
        self.run_log
            .write(run_log::SCRAPED_HTML_FILE, &parsed.pretty_html);
        Ok(parsed.document)
    }

    /// Classify the page and build the digest, or report why it was rejected
    pub fn extract(&self, document: &PageDocument) -> Result<ExtractionResult, ScrapeRejected> {
        self.extractor.extract(document, self.force)
    }

    /// Ask the model for copy in the configured tone and log the reply.
    ///
    /// The credential is resolved here, after extraction, so a missing key only
    /// surfaces once a page has been accepted.
    pub async fn generate(
        &self,
        extraction: &ExtractionResult,
    ) -> error::Result<GenerationResult> {
        let api_key = match &self.config.api_key {
            Some(key) => key.clone(),
            None => generator::api_key_from_env()?,
        };
        let generator = ChatGenerator::new(&self.config.api_base, api_key, &self.config.model);

        let request = GenerationRequest::new(&self.tone, extraction);
        let generated = generator.generate(&request, &self.system_prompt).await?;
        self.run_log
            .write(run_log::GENERATED_TEXT_FILE, &generated.text);
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticFetcher(&'static str);

    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, NavigationError> {
            Ok(self.0.to_string())
        }
    }

    fn test_config(root: &Path) -> AppConfig {
        let prompt_path = root.join("system_prompt.txt");
        fs::write(&prompt_path, "You write short social media posts.").unwrap();
        AppConfig {
            log_dir: root.join("logs"),
            system_prompt_path: prompt_path,
            api_key: Some("test-key".to_string()),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_prepare_clears_stale_logs() {
        let root = tempfile::tempdir().unwrap();
        let config = test_config(root.path());
        fs::create_dir_all(config.log_dir.join("old")).unwrap();
        fs::write(config.log_dir.join("generated.txt"), "yesterday").unwrap();

        let pipeline = Pipeline::prepare(config).unwrap();
        assert_eq!(fs::read_dir(pipeline.run_log().dir()).unwrap().count(), 0);
        assert_eq!(pipeline.tone(), DEFAULT_TONE);
    }

    #[test]
    fn test_empty_tone_falls_back_to_default() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::prepare(test_config(root.path()))
            .unwrap()
            .with_tone("");
        assert_eq!(pipeline.tone(), DEFAULT_TONE);

        let pipeline = pipeline.with_tone("Witty");
        assert_eq!(pipeline.tone(), "Witty");
    }

    #[test]
    fn test_prepare_requires_system_prompt() {
        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            system_prompt_path: root.path().join("missing.txt"),
            ..test_config(root.path())
        };
        let result = Pipeline::prepare(config);
        assert!(matches!(result, Err(Error::SystemPrompt { .. })));
    }

    #[test]
    fn test_prepare_rejects_bad_meta_pattern() {
        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            meta_name_pattern: "[".to_string(),
            ..test_config(root.path())
        };
        let result = Pipeline::prepare(config);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_scrape_logs_pretty_html() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::prepare(test_config(root.path())).unwrap();

        let fetcher =
            StaticFetcher("<html><head><title>Shop</title></head><body>Buy now</body></html>");
        let document = pipeline.scrape(&fetcher, "https://shop.test/").await.unwrap();
        assert_eq!(document.title.as_deref(), Some("Shop"));

        let logged =
            fs::read_to_string(pipeline.run_log().dir().join(run_log::SCRAPED_HTML_FILE)).unwrap();
        assert!(logged.contains("  <title>\n   Shop\n  </title>\n"));
    }

    #[tokio::test]
    async fn test_rejected_page_stops_before_generation() {
        let root = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::prepare(test_config(root.path())).unwrap();

        let fetcher = StaticFetcher("<html><body><h1>Access Denied</h1></body></html>");
        let document = pipeline.scrape(&fetcher, "https://shop.test/").await.unwrap();

        assert_eq!(
            pipeline.extract(&document),
            Err(ScrapeRejected::AccessDenied)
        );
        assert!(
            !pipeline
                .run_log()
                .dir()
                .join(run_log::GENERATED_TEXT_FILE)
                .exists()
        );

        let forced = pipeline.with_force(true);
        assert!(forced.extract(&document).is_ok());
    }

    #[tokio::test]
    async fn test_full_run_writes_generated_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "Step into comfort." } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_base: server.uri(),
            ..test_config(root.path())
        };
        let pipeline = Pipeline::prepare(config).unwrap().with_tone("Playful");

        let fetcher =
            StaticFetcher("<html><head><title>Shoes</title></head><body>Comfy shoes</body></html>");
        let document = pipeline.scrape(&fetcher, "https://shop.test/").await.unwrap();
        let extraction = pipeline.extract(&document).unwrap();
        let generated = pipeline.generate(&extraction).await.unwrap();

        assert_eq!(generated.text, "Step into comfort.");
        let logged =
            fs::read_to_string(pipeline.run_log().dir().join(run_log::GENERATED_TEXT_FILE))
                .unwrap();
        assert_eq!(logged, "Step into comfort.");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(
            body["messages"][1]["content"],
            json!("TONE: Playful;\nDATA: Title Tag: Shoes\n\nBody Tag:\nComfy shoes\n\n")
        );
        assert_eq!(
            body["messages"][0]["content"],
            json!("You write short social media posts.")
        );
    }
}
