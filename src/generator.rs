use crate::error::GenerationError;
use crate::results::{GenerationRequest, GenerationResult};
use serde::{Deserialize, Serialize};

/// Environment variable holding the model API credential
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Reads the API key, loading a local `.env` file first if one exists
pub fn api_key_from_env() -> Result<String, GenerationError> {
    match dotenvy::dotenv() {
        Ok(path) => ::log::debug!("Loaded environment from {}", path.display()),
        Err(e) => ::log::debug!("No .env file loaded: {}", e),
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(GenerationError::MissingCredential(API_KEY_ENV))
}

/// Client for an OpenAI-compatible chat-completion endpoint
pub struct ChatGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl ChatGenerator {
    pub fn new(api_base: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send the system prompt and the tone/data user message, returning the reply verbatim
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        system_prompt: &str,
    ) -> Result<GenerationResult, GenerationError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_message(),
                },
            ],
        };

        ::log::info!("Requesting completion from {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            ::log::error!("Model API error response: {}", error_text);
            return Err(GenerationError::Api {
                status,
                body: error_text,
            });
        }
        ::log::debug!("Model API response status: {}", status);

        let chat_response: ChatResponse = response.json().await?;
        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;

        Ok(GenerationResult {
            text: choice.message.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ExtractionResult;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(tone: &str, data: &str) -> GenerationRequest {
        GenerationRequest::new(tone, &ExtractionResult::new(data.to_string()))
    }

    #[test]
    fn test_user_message_format() {
        let req = request("Playful", "Title Tag: Shop\n\n");
        assert_eq!(req.user_message(), "TONE: Playful;\nDATA: Title Tag: Shop\n\n");
    }

    #[test]
    fn test_endpoint_joins_base_without_double_slash() {
        let generator = ChatGenerator::new("http://localhost:1234/v1/", "k", "gpt-4");
        assert_eq!(generator.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(generator.model, "gpt-4");
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_returns_text_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "messages": [
                    { "role": "system", "content": "Write social posts." },
                    { "role": "user", "content": "TONE: Professional;\nDATA: Body Tag:\nBuy now\n\n" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": "  Shop today!  \n" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = ChatGenerator::new(&server.uri(), "test-key", "gpt-4");
        let result = generator
            .generate(
                &request("Professional", "Body Tag:\nBuy now\n\n"),
                "Write social posts.",
            )
            .await
            .unwrap();

        assert_eq!(result.text, "  Shop today!  \n");
    }

    #[tokio::test]
    async fn test_generate_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let generator = ChatGenerator::new(&server.uri(), "bad-key", "gpt-4");
        let err = generator
            .generate(&request("Professional", "data"), "prompt")
            .await
            .unwrap_err();

        match err {
            GenerationError::Api { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected an API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let generator = ChatGenerator::new(&server.uri(), "k", "gpt-4");
        let err = generator
            .generate(&request("Professional", "data"), "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_reports_unreachable_server() {
        // Nothing listens on port 9 of localhost in the test environment
        let generator = ChatGenerator::new("http://127.0.0.1:9", "k", "gpt-4");
        let err = generator
            .generate(&request("Professional", "data"), "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
