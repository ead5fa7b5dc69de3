pub mod html;


use regex::Regex;
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[name]").expect("meta selector is valid"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("body selector is valid"));

/// A meta tag kept in source order, with every attribute it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub attributes: Vec<(String, String)>,
}

impl fmt::Display for MetaTag {
    /// Renders as `Meta Tag -- name: value;other: value;`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Meta Tag -- ")?;
        for (name, value) in &self.attributes {
            write!(f, "{}: {};", name, value)?;
        }
        Ok(())
    }
}

/// Parsed view of a fetched page
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    /// Text of the first `<title>` element
    pub title: Option<String>,
    /// Meta tags whose `name` matched the parser's pattern, in document order
    pub meta_tags: Vec<MetaTag>,
    /// Whitespace-normalized visible text of `<body>`
    pub body_text: Option<String>,
    /// All visible text of the page, fragments joined by single spaces
    pub visible_text: String,
}

/// Result of parsing fetched HTML
pub struct ParseResult {
    /// The queryable page summary
    pub document: PageDocument,
    /// Indented serialization of the DOM, suitable for logging
    pub pretty_html: String,
}

/// Turns raw HTML into a [`PageDocument`]
#[derive(Debug, Clone)]
pub struct Parser {
    meta_name: Regex,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            meta_name: Regex::new("description").expect("literal pattern is valid"),
        }
    }
}

impl Parser {
    /// Create a parser that keeps meta tags whose `name` matches `meta_name_pattern`
    pub fn new(meta_name_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            meta_name: Regex::new(meta_name_pattern)?,
        })
    }

    /// Parse a complete HTML document
    pub fn parse(&self, content: &str) -> ParseResult {
        let doc = html::parse_document(content);
        let document = self.document(&doc);
        let pretty_html = html::prettify(&doc);

        ::log::debug!(
            "Parsed document: title={:?}, {} matching meta tags, {} body chars",
            document.title,
            document.meta_tags.len(),
            document.body_text.as_ref().map_or(0, |b| b.chars().count())
        );

        ParseResult {
            document,
            pretty_html,
        }
    }

    fn document(&self, doc: &Html) -> PageDocument {
        let title = doc
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>())
            .filter(|t| !t.is_empty());

        let meta_tags = doc
            .select(&META_SELECTOR)
            .filter(|el| {
                el.value()
                    .attr("name")
                    .is_some_and(|name| self.meta_name.is_match(name))
            })
            .map(|el| MetaTag {
                attributes: el
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
            })
            .collect();

        let body_text = doc
            .select(&BODY_SELECTOR)
            .next()
            .map(html::normalized_text)
            .filter(|t| !t.is_empty());

        let visible_text = html::visible_text(doc.root_element()).join(" ");

        PageDocument {
            title,
            meta_tags,
            body_text,
            visible_text,
        }
    }
}
