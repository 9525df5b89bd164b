//! Page parsers: one per source layout, sharing the markup normalizer.
//!
//! The two source families use structurally different markup ("intrel"
//! Elementor accordions and "doctorate" Bootstrap panels) but produce the
//! same record schema, so both sit behind [`PageParser`] and the cleanup
//! rules live in [`crate::normalize`] exactly once.

pub mod accordion;
pub mod panel;

use crate::types::{Category, HarvestError, PageId, QaRecord};

/// Output of parsing one source page.
#[derive(Clone, Debug)]
pub struct ParsedPage {
    /// Section title extracted by the panel variant; provenance metadata for
    /// logging and partitioning, never stored on records.
    pub section_title: Option<String>,
    /// QA records in section order then intra-section document order.
    pub records: Vec<QaRecord>,
}

/// A layout-specific extractor from raw page HTML to ordered QA records.
pub trait PageParser: Send + Sync {
    fn parse(&self, page: &PageId, html: &str) -> Result<ParsedPage, HarvestError>;
}

/// Accordion-layout parser, used for [`Category::Intrel`].
pub struct AccordionParser;

impl PageParser for AccordionParser {
    fn parse(&self, page: &PageId, html: &str) -> Result<ParsedPage, HarvestError> {
        accordion::parse_accordion_page(page, html)
    }
}

/// Panel-layout parser, used for [`Category::Doctorate`].
pub struct PanelParser;

impl PageParser for PanelParser {
    fn parse(&self, page: &PageId, html: &str) -> Result<ParsedPage, HarvestError> {
        panel::parse_panel_page(page, html)
    }
}

/// Selects the parser variant for a category.
pub fn parser_for(category: Category) -> &'static dyn PageParser {
    match category {
        Category::Intrel => &AccordionParser,
        Category::Doctorate => &PanelParser,
    }
}

/// Parses a page with the variant implied by its [`PageId`].
pub fn parse_page(page: &PageId, html: &str) -> Result<ParsedPage, HarvestError> {
    parser_for(page.category).parse(page, html)
}
