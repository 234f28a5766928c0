//! Formatted display entries derived from a report.
//!
//! The formatter is a pure function from [`Report`] to two ordered entry
//! sequences, one per unit. Entries are structured (label, value, unit)
//! triples; string rendering happens only at the display edge, so sorting
//! and filtering never re-parse formatted text.

use serde::{Deserialize, Serialize};

use crate::report::Report;

/// Label used for the aggregate entry in each sequence.
pub const TOTAL_LABEL: &str = "Total";

/// Notice text used when a report contains no countable files.
pub const EMPTY_NOTICE: &str = "No code files found";

/// Unit of a formatted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Files,
    Lines,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Files => write!(f, "files"),
            Unit::Lines => write!(f, "lines"),
        }
    }
}

/// One display entry derived from a report record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    /// A per-language or aggregate count
    Stat {
        label: String,
        value: u64,
        unit: Unit,
    },
    /// A sentinel row with no numeric value
    Notice { text: String },
}

impl Entry {
    /// Create a count entry.
    pub fn stat(label: impl Into<String>, value: u64, unit: Unit) -> Self {
        Entry::Stat {
            label: label.into(),
            value,
            unit,
        }
    }

    /// Create a sentinel notice entry.
    pub fn notice(text: impl Into<String>) -> Self {
        Entry::Notice { text: text.into() }
    }

    /// The display label (the notice text for sentinel entries).
    pub fn label(&self) -> &str {
        match self {
            Entry::Stat { label, .. } => label,
            Entry::Notice { text } => text,
        }
    }

    /// The numeric value, if this entry carries one.
    pub fn value(&self) -> Option<u64> {
        match self {
            Entry::Stat { value, .. } => Some(*value),
            Entry::Notice { .. } => None,
        }
    }

    /// Whether this is the aggregate entry.
    pub fn is_total(&self) -> bool {
        matches!(self, Entry::Stat { label, .. } if label == TOTAL_LABEL)
    }

    /// Secondary display text, e.g. `"9,000 lines"`. Notices have none.
    pub fn detail(&self) -> Option<String> {
        match self {
            Entry::Stat { value, unit, .. } => Some(format!("{} {unit}", format_value(*value))),
            Entry::Notice { .. } => None,
        }
    }

    /// Full one-line rendering, e.g. `"Python: 3 files"`.
    pub fn render(&self) -> String {
        match self {
            Entry::Stat { label, value, unit } => {
                format!("{label}: {} {unit}", format_value(*value))
            }
            Entry::Notice { text } => text.clone(),
        }
    }
}

/// The two formatted sequences derived from one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// File-count entries, in report order, aggregate last
    pub files: Vec<Entry>,
    /// Line-count entries, in report order, aggregate last
    pub lines: Vec<Entry>,
}

impl Summary {
    /// Build both sequences from a report.
    ///
    /// Entries come out in the report's key order; sorting belongs to the
    /// projection stage. An empty report yields one sentinel notice per
    /// sequence so the display layer always has something to render.
    pub fn from_report(report: &Report) -> Self {
        if report.is_empty() {
            return Summary {
                files: vec![Entry::notice(EMPTY_NOTICE)],
                lines: vec![Entry::notice(EMPTY_NOTICE)],
            };
        }

        let mut files = Vec::with_capacity(report.languages.len() + 1);
        let mut lines = Vec::with_capacity(report.languages.len() + 1);

        for (name, stats) in &report.languages {
            files.push(Entry::stat(name.clone(), stats.files, Unit::Files));
            lines.push(Entry::stat(name.clone(), stats.lines, Unit::Lines));
        }

        if let Some(aggregate) = report.aggregate {
            files.push(Entry::stat(TOTAL_LABEL, aggregate.files, Unit::Files));
            lines.push(Entry::stat(TOTAL_LABEL, aggregate.lines, Unit::Lines));
        }

        Summary { files, lines }
    }
}

/// Render a count with comma thousands separators.
pub fn format_value(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Parse a value rendered by [`format_value`] back to the integer.
pub fn parse_value(text: &str) -> Option<u64> {
    let stripped: String = text.chars().filter(|c| *c != ',').collect();
    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    stripped.parse().ok()
}
