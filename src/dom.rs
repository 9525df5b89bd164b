//! Named, bounds-checked accessors over the parsed DOM.
//!
//! The source pages are navigated by position as much as by selector: "the
//! second panel group", "the first structural child of the answer box". Raw
//! index expressions turn a layout drift into an opaque panic, so every
//! positional access goes through one of these helpers and fails with
//! [`HarvestError::Structure`] naming the page and the missing piece.

use scraper::{ElementRef, Html, Selector};

use crate::types::{HarvestError, PageId};

/// All matches of `selector` in document order.
pub fn select_all<'a>(document: &'a Html, selector: &Selector) -> Vec<ElementRef<'a>> {
    document.select(selector).collect()
}

/// The match at `index` (zero-based) of `selector`, or a structure error
/// describing what was expected.
pub fn nth_match<'a>(
    document: &'a Html,
    selector: &Selector,
    index: usize,
    what: &str,
    page: &PageId,
) -> Result<ElementRef<'a>, HarvestError> {
    let mut matches = document.select(selector);
    matches.nth(index).ok_or_else(|| {
        HarvestError::structure(page, format!("{} #{} not found", what, index + 1))
    })
}

/// Element children of `element`, skipping text and comment nodes.
pub fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// The `index`-th (zero-based) element child of `element`.
pub fn structural_child<'a>(
    element: ElementRef<'a>,
    index: usize,
    what: &str,
    page: &PageId,
) -> Result<ElementRef<'a>, HarvestError> {
    child_elements(element).nth(index).ok_or_else(|| {
        HarvestError::structure(page, format!("{}: structural child #{} missing", what, index + 1))
    })
}

/// The nearest enclosing ancestor element with the given tag name.
pub fn enclosing<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == tag)
}

/// Concatenated descendant text with surrounding whitespace trimmed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
