use std::fmt;

/// Bounded plain-text digest of a page, the sole input to generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    text: String,
}

impl ExtractionResult {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A tone directive paired with the extracted page data
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Free-text style directive, passed through unvalidated
    pub tone: String,
    pub data: String,
}

impl GenerationRequest {
    pub fn new(tone: impl Into<String>, extraction: &ExtractionResult) -> Self {
        Self {
            tone: tone.into(),
            data: extraction.as_str().to_string(),
        }
    }

    /// The user message sent alongside the system prompt
    pub fn user_message(&self) -> String {
        format!("TONE: {};\nDATA: {}", self.tone, self.data)
    }
}

/// Text returned by the model, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub text: String,
}

impl fmt::Display for GenerationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
