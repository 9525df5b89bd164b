//! Embedding augmentation for assembled records.
//!
//! The vector computation itself lives behind [`EmbeddingProvider`]; this
//! module only batches question texts, validates positional correspondence,
//! and attaches the vectors. [`MockEmbeddingProvider`] gives deterministic
//! vectors for tests, and [`TokenAveragingProvider`] implements the
//! documented external contract (mean of the representable, non-stop-word,
//! non-punctuation token vectors) over a supplied token table.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::types::{HarvestError, QaRecord};

/// A batch text-to-vector function: one call per batch, order-preserving,
/// one fixed-dimension vector per input.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, HarvestError>;
}

/// Attaches an embedding to every record's question, in place.
///
/// The provider is called exactly once with all lower-cased question texts
/// so it can batch internally. A length mismatch fails with
/// [`HarvestError::Augmentation`] before any record is touched, so a failed
/// batch leaves the records exactly as they were. Degenerate (all-NaN)
/// vectors are attached as-is; filtering them is the caller's policy.
pub async fn augment(
    records: &mut [QaRecord],
    provider: &dyn EmbeddingProvider,
) -> Result<(), HarvestError> {
    if records.is_empty() {
        return Ok(());
    }

    let questions: Vec<String> = records
        .iter()
        .map(|record| record.question.to_lowercase())
        .collect();

    let vectors = provider.embed_batch(&questions).await?;
    if vectors.len() != questions.len() {
        return Err(HarvestError::Augmentation(format!(
            "provider '{}' returned {} vectors for {} questions",
            provider.name(),
            vectors.len(),
            questions.len()
        )));
    }

    for (record, vector) in records.iter_mut().zip(vectors) {
        record.embedding = Some(vector);
    }

    tracing::debug!(
        provider = provider.name(),
        records = records.len(),
        "embeddings attached"
    );
    Ok(())
}

/// Deterministic hash-based provider for tests and offline runs.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 8 }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, HarvestError> {
        Ok(texts
            .iter()
            .map(|text| hash_to_vec(text, self.dimensions))
            .collect())
    }
}

fn hash_to_vec(text: &str, dimensions: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimensions)
        .map(|i| {
            let bits = seed.rotate_left((i * 8) as u32) ^ ((i as u64) << 24);
            (bits as f32) / u32::MAX as f32
        })
        .collect()
}

/// Embeds a text as the average of its tokens' vectors.
///
/// Tokens are alphanumeric runs; punctuation therefore never contributes.
/// Stop-words and tokens absent from the table are excluded from the
/// average. A text with no contributing token yields an all-NaN vector —
/// still one vector per input, so positional correspondence holds.
#[derive(Clone, Debug, Default)]
pub struct TokenAveragingProvider {
    dimensions: usize,
    vectors: HashMap<String, Vec<f32>>,
    stop_words: HashSet<String>,
}

impl TokenAveragingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: HashMap::new(),
            stop_words: HashSet::new(),
        }
    }

    /// Parses a whitespace-separated token table: one `token v1 v2 … vn`
    /// entry per line, blank lines ignored. All entries must agree on n.
    pub fn from_plain_text(table: &str) -> Result<Self, HarvestError> {
        let mut provider: Option<TokenAveragingProvider> = None;

        for (line_no, line) in table.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let token = fields
                .next()
                .ok_or_else(|| HarvestError::Vectors(format!("line {}: empty entry", line_no + 1)))?;
            let vector: Vec<f32> = fields
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|err| {
                    HarvestError::Vectors(format!("line {}: {}", line_no + 1, err))
                })?;
            if vector.is_empty() {
                return Err(HarvestError::Vectors(format!(
                    "line {}: token '{}' has no components",
                    line_no + 1,
                    token
                )));
            }

            let provider = provider.get_or_insert_with(|| TokenAveragingProvider::new(vector.len()));
            if vector.len() != provider.dimensions {
                return Err(HarvestError::Vectors(format!(
                    "line {}: expected {} components, found {}",
                    line_no + 1,
                    provider.dimensions,
                    vector.len()
                )));
            }
            provider.vectors.insert(token.to_string(), vector);
        }

        provider.ok_or_else(|| HarvestError::Vectors("empty token table".to_string()))
    }

    #[must_use]
    pub fn with_vector(mut self, token: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(token.into(), vector);
        self
    }

    #[must_use]
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words.extend(words.into_iter().map(Into::into));
        self
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dimensions];
        let mut contributing = 0usize;

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            if self.stop_words.contains(token) {
                continue;
            }
            let Some(vector) = self.vectors.get(token) else {
                continue;
            };
            for (slot, component) in sum.iter_mut().zip(vector) {
                *slot += component;
            }
            contributing += 1;
        }

        if contributing == 0 {
            return vec![f32::NAN; self.dimensions];
        }
        sum.iter().map(|total| total / contributing as f32).collect()
    }
}

#[async_trait]
impl EmbeddingProvider for TokenAveragingProvider {
    fn name(&self) -> &str {
        "token-averaging"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, HarvestError> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}
