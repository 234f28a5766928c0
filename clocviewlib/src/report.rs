//! Parsed counter reports.
//!
//! The counter's JSON output maps language names to per-language records,
//! with two reserved top-level keys: `header` (tool metadata, ignored here)
//! and `SUM` (the aggregate across all languages).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClocViewError;
use crate::Result;

/// Reserved key for tool metadata, excluded from per-language iteration.
const HEADER_KEY: &str = "header";

/// Reserved key for the tool-supplied aggregate.
const SUM_KEY: &str = "SUM";

/// File and line counts for one language (or for the aggregate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageStats {
    /// Number of files the counter attributed to this language
    pub files: u64,
    /// Lines of code (the counter's `code` field; blanks and comments are not included)
    pub lines: u64,
}

impl LanguageStats {
    /// Create stats from explicit counts.
    pub fn new(files: u64, lines: u64) -> Self {
        Self { files, lines }
    }
}

/// Parsed result of one counter invocation.
///
/// Per-language entries keep the order in which the counter emitted them.
/// The aggregate is the counter's own `SUM` record, held separately and
/// never re-derived by summing the language entries — the two are allowed
/// to disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Per-language statistics in the counter's key order
    pub languages: Vec<(String, LanguageStats)>,
    /// Aggregate across all languages, as reported by the counter
    pub aggregate: Option<LanguageStats>,
}

impl Report {
    /// Whether the report carries no languages and no aggregate.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.aggregate.is_none()
    }

    /// Parse a complete JSON document in the counter's output shape.
    pub fn parse(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ClocViewError::MalformedOutput {
                message: e.to_string(),
                raw: json.to_string(),
            })?;
        Self::from_value(value, json)
    }

    /// Extract the trailing JSON object from raw counter stdout.
    ///
    /// The counter may print noise after the report, so the candidate
    /// document is everything up to and including the last `}` in the
    /// buffer. Text before the object itself is not tolerated and fails
    /// the parse; the full raw buffer is preserved in the error.
    pub fn from_stdout(stdout: &str) -> Result<Self> {
        let end = stdout
            .rfind('}')
            .ok_or_else(|| ClocViewError::MalformedOutput {
                message: "no JSON object found in counter output".to_string(),
                raw: stdout.to_string(),
            })?;

        let candidate = &stdout[..=end];
        let value: Value =
            serde_json::from_str(candidate).map_err(|e| ClocViewError::MalformedOutput {
                message: e.to_string(),
                raw: stdout.to_string(),
            })?;
        Self::from_value(value, stdout)
    }

    fn from_value(value: Value, raw: &str) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ClocViewError::MalformedOutput {
                message: "top-level JSON value is not an object".to_string(),
                raw: raw.to_string(),
            });
        };

        let mut report = Report::default();
        for (key, entry) in map {
            if key == HEADER_KEY {
                continue;
            }
            let stats = language_stats(&entry).ok_or_else(|| ClocViewError::MalformedOutput {
                message: format!("entry '{key}' is missing integer nFiles/code fields"),
                raw: raw.to_string(),
            })?;
            if key == SUM_KEY {
                report.aggregate = Some(stats);
            } else {
                report.languages.push((key, stats));
            }
        }
        Ok(report)
    }
}

/// Read the `nFiles`/`code` fields of one record.
fn language_stats(entry: &Value) -> Option<LanguageStats> {
    let files = entry.get("nFiles")?.as_u64()?;
    let lines = entry.get("code")?.as_u64()?;
    Some(LanguageStats { files, lines })
}
