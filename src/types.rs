//! Core domain types shared across the harvesting pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language of a source FAQ page. Output collections are partitioned by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Es];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FAQ source grouping. Determines which page parser variant applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// International-relations FAQ pages (Elementor accordion layout).
    Intrel,
    /// Doctoral-school FAQ pages (Bootstrap panel layout).
    Doctorate,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Intrel, Category::Doctorate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Intrel => "intrel",
            Category::Doctorate => "doctorate",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one source page: category, language, and zero-based position
/// within that category's URL list.
///
/// The display form (`en/intrel1`) matches the on-disk cache file stem, so
/// log lines and cache entries point at the same thing.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageId {
    pub category: Category,
    pub language: Language,
    pub index: usize,
}

impl PageId {
    pub fn new(category: Category, language: Language, index: usize) -> Self {
        Self {
            category,
            language,
            index,
        }
    }

    /// File stem used by the page cache, e.g. `doctorate3`.
    pub fn file_stem(&self) -> String {
        format!("{}{}", self.category, self.index + 1)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.language, self.category, self.index + 1)
    }
}

/// One extracted question/answer pair.
///
/// `question` is non-empty after extraction. `answer` is always set; an empty
/// string is a valid answer. `embedding` stays `None` until the augmenter
/// attaches a vector and is omitted from JSON while absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl QaRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            embedding: None,
        }
    }
}

/// Errors surfaced by the harvesting pipeline.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// An answer fragment could not be normalized. Local to one record; the
    /// caller decides skip-vs-abort.
    #[error("markup: {0}")]
    Markup(String),

    /// A page did not match the expected variant layout: a container is
    /// absent or an index is out of range. Carries the offending page so the
    /// assembler can report which source is malformed.
    #[error("structure ({page}): {detail}")]
    Structure { page: PageId, detail: String },

    /// The embedding provider returned a mismatched-length batch. Fatal for
    /// the whole batch; positional correspondence cannot be trusted.
    #[error("augmentation: {0}")]
    Augmentation(String),

    /// A token-vector table could not be loaded or parsed.
    #[error("vector table: {0}")]
    Vectors(String),

    #[error("fetch: {0}")]
    Fetch(String),

    #[error("io: {0}")]
    Io(String),
}

impl HarvestError {
    pub fn structure(page: &PageId, detail: impl Into<String>) -> Self {
        HarvestError::Structure {
            page: page.clone(),
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for HarvestError {
    fn from(err: reqwest::Error) -> Self {
        HarvestError::Fetch(err.to_string())
    }
}
