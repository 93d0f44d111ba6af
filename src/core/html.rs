// src/core/html.rs
// Markup query: parse a document, run one CSS selector, return the first
// match's visible text.

use scraper::{Html, Selector};

use super::sanitize::normalize_ws;

/// Compile a selector, keeping the parser's message for config errors.
pub fn compile_selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| e.to_string())
}

/// Whitespace-normalized text of the first element matching `selector`,
/// or `None` when nothing matches.
pub fn select_first_text(doc: &str, selector: &Selector) -> Option<String> {
    let html = Html::parse_document(doc);
    let el = html.select(selector).next()?;
    let text: String = el.text().collect();
    Some(normalize_ws(&text))
}
