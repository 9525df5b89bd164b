//! Page acquisition: known source URLs and the fetch-if-absent disk cache.
//!
//! The extraction core never fetches on its own; it consumes page content
//! this module has already made available.

pub mod cache;
pub mod sources;

pub use cache::{FetchOutcome, PageCache, fetch_page};
pub use sources::{all_pages, urls};
