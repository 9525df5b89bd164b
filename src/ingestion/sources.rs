//! Source URL tables for the two FAQ families, per language.

use crate::types::{Category, Language, PageId};

const INTREL_EN: &[&str] =
    &["https://relint.uva.es/internacional/english/students/welcome-guide/faq/"];

const INTREL_ES: &[&str] = &[
    "https://relint.uva.es/internacional/espanol/estudiantes/guia-bienvenida/preguntas-frecuentes/",
];

const DOCTORATE_EN: &[&str] = &[
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/AAFF/?lang=en",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/admisionYMatricula/?lang=en",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/PD/?lang=en",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/tesis/?lang=en",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/financiacion/?lang=en",
];

const DOCTORATE_ES: &[&str] = &[
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/AAFF/?lang=es",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/admisionYMatricula/?lang=es",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/PD/?lang=es",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/tesis/?lang=es",
    "https://escueladoctorado.uva.es/export/sites/doctorado/faqs/financiacion/?lang=es",
];

/// Source URLs for one category/language, in page-index order.
pub fn urls(category: Category, language: Language) -> &'static [&'static str] {
    match (category, language) {
        (Category::Intrel, Language::En) => INTREL_EN,
        (Category::Intrel, Language::Es) => INTREL_ES,
        (Category::Doctorate, Language::En) => DOCTORATE_EN,
        (Category::Doctorate, Language::Es) => DOCTORATE_ES,
    }
}

/// Every known page with its URL: languages outermost, then categories, so
/// each language's corpus is produced contiguously.
pub fn all_pages() -> Vec<(PageId, &'static str)> {
    let mut pages = Vec::new();
    for language in Language::ALL {
        for category in Category::ALL {
            for (index, url) in urls(category, language).iter().enumerate() {
                pages.push((PageId::new(category, language, index), *url));
            }
        }
    }
    pages
}
