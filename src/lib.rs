//! ```text
//! ingestion::sources ──► ingestion::fetch_page ──► PageCache (fetch-if-absent)
//!
//! Raw page ──► parsers::parse_page (variant by category)
//!                 │
//!                 ├─► parsers::accordion  ("intrel" layout)
//!                 ├─► parsers::panel      ("doctorate" layout)
//!                 └─► normalize           (shared answer cleanup)
//!
//! ParsedPage ──► assemble ──► Assembly keyed by (category, language)
//!                                │
//!                                ├─► embedding::augment (batch, optional)
//!                                └─► export (JSON array / CSV rows)
//! ```

pub mod assemble;
pub mod dom;
pub mod embedding;
pub mod export;
pub mod ingestion;
pub mod normalize;
pub mod parsers;
pub mod types;

pub use assemble::{Assembly, FailurePolicy, PageFailure, assemble};
pub use embedding::{
    EmbeddingProvider, MockEmbeddingProvider, TokenAveragingProvider, augment,
};
pub use normalize::normalize;
pub use parsers::{PageParser, ParsedPage, parse_page, parser_for};
pub use types::{Category, HarvestError, Language, PageId, QaRecord};
