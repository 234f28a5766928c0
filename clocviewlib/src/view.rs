//! Projection of formatted entries into display rows.
//!
//! A projection sits between the formatted summary and the rendered
//! output: it applies the run-state gate, separates the aggregate from
//! the per-language population, filters by label, and sorts by the true
//! integer value — never by the rendered string.

use serde::{Deserialize, Serialize};

use crate::summary::Entry;

/// Lifecycle flag for the current ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// No run in flight; current data (if any) is valid for display
    #[default]
    Idle,
    /// A run is in flight; projections are empty until it completes
    Running,
    /// The last run failed; a notice describes why
    Failed,
}

impl RunState {
    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

/// One rendered row: primary label plus secondary text.
///
/// Rows carry no interactive affordance; they are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNode {
    /// Language name, `"Total"`, or notice text
    pub label: String,
    /// Formatted `"<value> <unit>"` string; empty for notice rows
    pub detail: String,
}

impl DisplayNode {
    fn from_entry(entry: &Entry) -> Self {
        DisplayNode {
            label: entry.label().to_string(),
            detail: entry.detail().unwrap_or_default(),
        }
    }
}

/// Derive the rows actually shown from one entry sequence.
///
/// While a run is in flight the output is empty regardless of prior
/// entries — stale or partial data is never shown. The aggregate entry
/// never enters the filterable/sortable population; callers surface it
/// separately via [`total_node`].
pub fn project(entries: &[Entry], filter: Option<&str>, run_state: RunState) -> Vec<DisplayNode> {
    if run_state.is_running() || entries.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<&Entry> = entries.iter().filter(|e| !e.is_total()).collect();

    if let Some(needle) = normalized_filter(filter) {
        // Entries without a numeric value fail open: never hidden
        rows.retain(|e| e.value().is_none() || e.label().to_lowercase().contains(&needle));
    }

    // Stable: ties and valueless rows keep their input order
    rows.sort_by_key(|e| std::cmp::Reverse(e.value().unwrap_or(0)));

    rows.into_iter().map(DisplayNode::from_entry).collect()
}

/// The separated aggregate row, if the sequence carries one.
pub fn total_node(entries: &[Entry]) -> Option<DisplayNode> {
    entries.iter().find(|e| e.is_total()).map(DisplayNode::from_entry)
}

/// An empty or whitespace-only filter is equivalent to no filter.
fn normalized_filter(filter: Option<&str>) -> Option<String> {
    let needle = filter?.trim();
    if needle.is_empty() {
        None
    } else {
        Some(needle.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{Entry, Unit, EMPTY_NOTICE, TOTAL_LABEL};

    fn lines_entries() -> Vec<Entry> {
        vec![
            Entry::stat("Go", 5000, Unit::Lines),
            Entry::stat("Rust", 9000, Unit::Lines),
            Entry::stat(TOTAL_LABEL, 14000, Unit::Lines),
        ]
    }

    fn labels(rows: &[DisplayNode]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn test_project_sorts_descending() {
        let rows = project(&lines_entries(), None, RunState::Idle);

        assert_eq!(labels(&rows), vec!["Rust", "Go"]);
        assert_eq!(rows[0].detail, "9,000 lines");
        assert_eq!(rows[1].detail, "5,000 lines");
    }

    #[test]
    fn test_project_sorts_on_integer_not_rendering() {
        // "1,000" would sort below "999" as a string
        let entries = vec![
            Entry::stat("A", 999, Unit::Lines),
            Entry::stat("B", 1000, Unit::Lines),
        ];
        let rows = project(&entries, None, RunState::Idle);

        assert_eq!(labels(&rows), vec!["B", "A"]);
    }

    #[test]
    fn test_project_is_stable_on_ties() {
        let entries = vec![
            Entry::stat("First", 100, Unit::Lines),
            Entry::stat("Second", 100, Unit::Lines),
            Entry::stat("Third", 100, Unit::Lines),
        ];
        let rows = project(&entries, None, RunState::Idle);

        assert_eq!(labels(&rows), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_project_excludes_total() {
        let rows = project(&lines_entries(), None, RunState::Idle);
        assert!(rows.iter().all(|r| r.label != TOTAL_LABEL));
    }

    #[test]
    fn test_total_node_separated() {
        let total = total_node(&lines_entries()).unwrap();
        assert_eq!(total.label, TOTAL_LABEL);
        assert_eq!(total.detail, "14,000 lines");

        assert!(total_node(&[Entry::stat("Go", 1, Unit::Lines)]).is_none());
    }

    #[test]
    fn test_filter_case_insensitive() {
        let rows = project(&lines_entries(), Some("go"), RunState::Idle);
        assert_eq!(labels(&rows), vec!["Go"]);

        let rows = project(&lines_entries(), Some("RU"), RunState::Idle);
        assert_eq!(labels(&rows), vec!["Rust"]);
    }

    #[test]
    fn test_filter_whitespace_is_noop() {
        let unfiltered = project(&lines_entries(), None, RunState::Idle);
        assert_eq!(project(&lines_entries(), Some(""), RunState::Idle), unfiltered);
        assert_eq!(
            project(&lines_entries(), Some("   "), RunState::Idle),
            unfiltered
        );
    }

    #[test]
    fn test_filter_keeps_notice_rows() {
        let entries = vec![
            Entry::stat("Go", 5000, Unit::Lines),
            Entry::notice(EMPTY_NOTICE),
        ];
        let rows = project(&entries, Some("nomatch"), RunState::Idle);

        assert_eq!(labels(&rows), vec![EMPTY_NOTICE]);
        assert_eq!(rows[0].detail, "");
    }

    #[test]
    fn test_running_yields_empty() {
        assert!(project(&lines_entries(), None, RunState::Running).is_empty());
        assert!(project(&lines_entries(), Some("go"), RunState::Running).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty() {
        assert!(project(&[], None, RunState::Idle).is_empty());
        assert!(project(&[], None, RunState::Failed).is_empty());
    }
}
