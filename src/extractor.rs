//! Decides whether a scrape can be trusted and builds the text digest sent to the model.

use crate::error::ScrapeRejected;
use crate::parsers::PageDocument;
use crate::results::ExtractionResult;

/// Markers of a page that refused to serve the scraper
pub const ACCESS_DENIED_MARKERS: &[&str] = &[
    "access denied",
    "forbidden",
    "unauthorized",
    "403 forbidden",
    "401 unauthorized",
];

/// Markers of a page that renders nothing useful without script execution
pub const JAVASCRIPT_REQUIRED_MARKERS: &[&str] = &["enable javascript"];

/// Maximum number of body characters forwarded to the model
pub const BODY_CHAR_LIMIT: usize = 4000;

/// Maximum number of matching meta tags forwarded to the model
pub const META_TAG_LIMIT: usize = 10;

/// Builds [`ExtractionResult`]s from parsed pages
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    body_char_limit: usize,
    meta_tag_limit: usize,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            body_char_limit: BODY_CHAR_LIMIT,
            meta_tag_limit: META_TAG_LIMIT,
        }
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the page and, unless rejected, assemble its digest.
    ///
    /// With `force` set the signature checks are skipped entirely.
    pub fn extract(
        &self,
        document: &PageDocument,
        force: bool,
    ) -> Result<ExtractionResult, ScrapeRejected> {
        if force {
            ::log::info!("Skipping rejection checks (--force)");
        } else {
            check_signatures(&document.visible_text)?;
        }

        Ok(ExtractionResult::new(self.assemble(document)))
    }

    fn assemble(&self, document: &PageDocument) -> String {
        let mut extracted = String::new();

        if let Some(title) = &document.title {
            extracted.push_str(&format!("Title Tag: {}\n\n", title));
        }

        if !document.meta_tags.is_empty() {
            for tag in document.meta_tags.iter().take(self.meta_tag_limit) {
                extracted.push_str(&format!("{}\n", tag));
            }
            extracted.push('\n');
        }

        if let Some(body) = &document.body_text {
            let truncated: String = body.chars().take(self.body_char_limit).collect();
            extracted.push_str(&format!("Body Tag:\n{}\n\n", truncated));
        }

        extracted
    }
}

/// Checks the page text for rejection signatures; access denial takes precedence
pub fn check_signatures(visible_text: &str) -> Result<(), ScrapeRejected> {
    let haystack = visible_text.to_lowercase();

    if contains_any(&haystack, ACCESS_DENIED_MARKERS) {
        ::log::warn!("Page text matched an access-denied marker");
        return Err(ScrapeRejected::AccessDenied);
    }
    if contains_any(&haystack, JAVASCRIPT_REQUIRED_MARKERS) {
        ::log::warn!("Page text matched a javascript-required marker");
        return Err(ScrapeRejected::JavaScriptRequired);
    }
    Ok(())
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| haystack.contains(marker))
}
