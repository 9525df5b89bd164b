//! Serialized views of assembled records: a JSON array and two-column CSV.
//!
//! Both forms map straight off [`QaRecord`]; nothing is re-parsed.

use std::path::Path;

use crate::types::{HarvestError, QaRecord};

/// Renders records as a pretty-printed JSON array of
/// `{question, answer[, embedding]}` objects.
pub fn to_json(records: &[QaRecord]) -> Result<String, HarvestError> {
    serde_json::to_string_pretty(records).map_err(|err| HarvestError::Io(err.to_string()))
}

/// Renders records as CSV with a `Question,Answer` header. Embeddings are
/// deliberately absent from the tabular view.
pub fn to_csv(records: &[QaRecord]) -> String {
    let mut out = String::from("Question,Answer\n");
    for record in records {
        out.push_str(&csv_field(&record.question));
        out.push(',');
        out.push_str(&csv_field(&record.answer));
        out.push('\n');
    }
    out
}

pub async fn write_json(path: impl AsRef<Path>, records: &[QaRecord]) -> Result<(), HarvestError> {
    tokio::fs::write(path, to_json(records)?).await?;
    Ok(())
}

pub async fn write_csv(path: impl AsRef<Path>, records: &[QaRecord]) -> Result<(), HarvestError> {
    tokio::fs::write(path, to_csv(records)).await?;
    Ok(())
}

/// RFC 4180 quoting: fields containing commas, quotes, or line breaks are
/// wrapped in quotes, with embedded quotes doubled.
fn csv_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
