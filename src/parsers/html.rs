use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::html::HtmlTreeSink;
use scraper::{ElementRef, Html, Node};

/// Elements whose text content is never rendered
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose children are emitted without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parses a full document the way a browser with scripting disabled would.
///
/// `<noscript>` children become real elements instead of one raw text node,
/// so their markup never leaks into extracted text.
pub fn parse_document(content: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    driver::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(content)
}

/// Collects the text nodes under `element` that a browser would render, in document order
pub fn visible_text(element: ElementRef<'_>) -> Vec<&str> {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|e| HIDDEN_TEXT_ELEMENTS.contains(&e.name()))
            });
            if hidden { None } else { Some(&**text) }
        })
        .collect()
}

/// Visible text with all whitespace runs collapsed to single spaces
pub fn normalized_text(element: ElementRef<'_>) -> String {
    visible_text(element)
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serializes a document with one node per line, indented one space per level
pub fn prettify(doc: &Html) -> String {
    let mut out = String::new();
    for child in doc.tree.root().children() {
        match child.value() {
            Node::Doctype(doctype) => {
                out.push_str(&format!("<!DOCTYPE {}>\n", doctype.name()));
            }
            Node::Comment(comment) => {
                out.push_str(&format!("<!--{}-->\n", &**comment));
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    write_element(element, 0, &mut out);
                }
            }
            _ => {}
        }
    }
    out
}

fn write_element(element: ElementRef<'_>, depth: usize, out: &mut String) {
    let name = element.value().name();
    let indent = " ".repeat(depth);

    out.push_str(&indent);
    out.push('<');
    out.push_str(name);
    for (attr, value) in element.value().attrs() {
        out.push_str(&format!(" {}=\"{}\"", attr, escape_attribute(value)));
    }
    out.push_str(">\n");

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&name);
    let child_indent = " ".repeat(depth + 1);
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                out.push_str(&child_indent);
                if raw {
                    out.push_str(trimmed);
                } else {
                    out.push_str(&escape_text(trimmed));
                }
                out.push('\n');
            }
            Node::Comment(comment) => {
                out.push_str(&format!("{}<!--{}-->\n", child_indent, &**comment));
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, depth + 1, out);
                }
            }
            _ => {}
        }
    }

    out.push_str(&indent);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
