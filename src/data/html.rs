//! Shared helpers for reading catalog pages
//!
//! Every page the pipeline reads depends on a few stable structural markers
//! (class names and `itemprop` attributes). These helpers locate them and turn
//! a missing marker into an [`ExtractionError`].

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors that can occur when a page lacks the structure we read from
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// An expected element is not in the document
    #[error("Page is missing expected element: {0}")]
    MissingAnchor(&'static str),

    /// A link could not be resolved against the page URL
    #[error("Invalid link '{href}': {source}")]
    InvalidLink {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Parses a static CSS selector
///
/// Selectors are compile-time constants in this crate, so a parse failure is
/// a programming error.
pub(crate) fn selector(css: &'static str) -> Selector {
    match Selector::parse(css) {
        Ok(selector) => selector,
        Err(e) => panic!("invalid selector {css:?}: {e}"),
    }
}

/// First element of `document` matching `selector`
pub(crate) fn find<'a>(
    document: &'a Html,
    selector: &Selector,
    anchor: &'static str,
) -> Result<ElementRef<'a>, ExtractionError> {
    document
        .select(selector)
        .next()
        .ok_or(ExtractionError::MissingAnchor(anchor))
}

/// First descendant of `parent` matching `selector`
pub(crate) fn find_in<'a>(
    parent: ElementRef<'a>,
    selector: &Selector,
    anchor: &'static str,
) -> Result<ElementRef<'a>, ExtractionError> {
    parent
        .select(selector)
        .next()
        .ok_or(ExtractionError::MissingAnchor(anchor))
}

/// Trimmed text content of an element
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first descendant matching `selector`
pub(crate) fn text_in(
    parent: ElementRef<'_>,
    selector: &Selector,
    anchor: &'static str,
) -> Result<String, ExtractionError> {
    find_in(parent, selector, anchor).map(text_of)
}
