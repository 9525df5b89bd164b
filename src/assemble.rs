//! Record Assembler: merges parser output across pages and languages.

use std::collections::BTreeMap;

use crate::parsers::parse_page;
use crate::types::{Category, HarvestError, Language, PageId, QaRecord};

/// What to do when a page fails to parse.
///
/// The policy is always chosen explicitly by the caller; there is no
/// implicit skipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the entire run on the first page failure.
    FailFast,
    /// Skip the failed page, record the failure, and keep going. Only that
    /// page's records are lost.
    #[default]
    CollectAndContinue,
}

/// A page that failed to parse, kept for reporting.
#[derive(Debug)]
pub struct PageFailure {
    pub page: PageId,
    pub error: HarvestError,
}

/// Ordered record collections keyed by `(category, language)`, plus the
/// failures observed under [`FailurePolicy::CollectAndContinue`].
///
/// Insertion order is page iteration order, then within-page document
/// order, so serialized output is reproducible and diffable.
#[derive(Debug, Default)]
pub struct Assembly {
    collections: BTreeMap<(Category, Language), Vec<QaRecord>>,
    failures: Vec<PageFailure>,
}

impl Assembly {
    /// Records extracted for one `(category, language)` partition.
    pub fn records(&self, category: Category, language: Language) -> &[QaRecord] {
        self.collections
            .get(&(category, language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates partitions in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&(Category, Language), &Vec<QaRecord>)> {
        self.collections.iter()
    }

    /// Consumes the assembly, yielding the partitioned collections.
    pub fn into_collections(self) -> BTreeMap<(Category, Language), Vec<QaRecord>> {
        self.collections
    }

    /// Pages skipped under collect-and-continue.
    pub fn failures(&self) -> &[PageFailure] {
        &self.failures
    }

    pub fn total_records(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

/// Parses every page with the variant implied by its [`PageId`] and appends
/// the output to the collection keyed by `(category, language)`, preserving
/// page iteration order.
pub fn assemble<I, S>(pages: I, policy: FailurePolicy) -> Result<Assembly, HarvestError>
where
    I: IntoIterator<Item = (PageId, S)>,
    S: AsRef<str>,
{
    let mut assembly = Assembly::default();

    for (page, html) in pages {
        match parse_page(&page, html.as_ref()) {
            Ok(parsed) => {
                if let Some(title) = &parsed.section_title {
                    tracing::debug!(page = %page, section = %title, "parsed page");
                }
                tracing::info!(page = %page, records = parsed.records.len(), "page assembled");
                assembly
                    .collections
                    .entry((page.category, page.language))
                    .or_default()
                    .extend(parsed.records);
            }
            Err(error) => match policy {
                FailurePolicy::FailFast => return Err(error),
                FailurePolicy::CollectAndContinue => {
                    tracing::warn!(page = %page, %error, "skipping malformed page");
                    assembly.failures.push(PageFailure { page, error });
                }
            },
        }
    }

    Ok(assembly)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accordion_html(question: &str, answer: &str) -> String {
        format!(
            "<html><body>\
             <div class=\"elementor-clearfix\">S</div>\
             <div data-accordion-type=\"accordion\">\
               <span><i class=\"fa-accordion-icon\"></i>{question}</span>\
               <div class=\"eael-accordion-content clearfix\"><p>{answer}</p></div>\
             </div></body></html>"
        )
    }

    fn broken_html() -> String {
        // A lone section header with no accordion container.
        "<html><body><div class=\"elementor-clearfix\">S</div></body></html>".to_string()
    }

    #[test]
    fn concatenation_preserves_page_order() {
        let p1 = PageId::new(Category::Intrel, Language::En, 0);
        let p2 = PageId::new(Category::Intrel, Language::En, 1);
        let assembly = assemble(
            vec![
                (p1, accordion_html("First?", "one")),
                (p2, accordion_html("Second?", "two")),
            ],
            FailurePolicy::FailFast,
        )
        .unwrap();

        let records = assembly.records(Category::Intrel, Language::En);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].question, "First?");
        assert_eq!(records[1].question, "Second?");
    }

    #[test]
    fn partitions_are_keyed_by_category_and_language() {
        let en = PageId::new(Category::Intrel, Language::En, 0);
        let es = PageId::new(Category::Intrel, Language::Es, 0);
        let assembly = assemble(
            vec![
                (en, accordion_html("Hello?", "hi")),
                (es, accordion_html("¿Hola?", "hola")),
            ],
            FailurePolicy::FailFast,
        )
        .unwrap();

        assert_eq!(assembly.records(Category::Intrel, Language::En).len(), 1);
        assert_eq!(assembly.records(Category::Intrel, Language::Es).len(), 1);
        assert!(assembly.records(Category::Doctorate, Language::En).is_empty());
        assert_eq!(assembly.total_records(), 2);
    }

    #[test]
    fn fail_fast_aborts_on_the_first_bad_page() {
        let good = PageId::new(Category::Intrel, Language::En, 0);
        let bad = PageId::new(Category::Intrel, Language::En, 1);
        let result = assemble(
            vec![
                (good, accordion_html("Q?", "A")),
                (bad, broken_html()),
            ],
            FailurePolicy::FailFast,
        );
        assert!(matches!(result, Err(HarvestError::Structure { .. })));
    }

    #[test]
    fn collect_and_continue_records_the_failure_and_keeps_going() {
        let bad = PageId::new(Category::Intrel, Language::En, 0);
        let good = PageId::new(Category::Intrel, Language::En, 1);
        let assembly = assemble(
            vec![
                (bad.clone(), broken_html()),
                (good, accordion_html("Still here?", "yes")),
            ],
            FailurePolicy::CollectAndContinue,
        )
        .unwrap();

        assert_eq!(assembly.failures().len(), 1);
        assert_eq!(assembly.failures()[0].page, bad);
        let records = assembly.records(Category::Intrel, Language::En);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "Still here?");
    }
}
