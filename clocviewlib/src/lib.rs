//! # clocviewlib
//!
//! Library behind the `clocview` CLI: runs an external line-counting tool
//! (cloc-compatible), parses its JSON report, and projects per-language
//! file/line counts into sorted, filterable display views.
//!
//! ## Overview
//!
//! Unlike counters that scan source trees themselves, this library delegates
//! all scanning to an external tool and owns everything after its stdout:
//!
//! - **Ingestion**: invoke the counter once per run, capture stdout, and
//!   extract the trailing JSON object (the tool is tolerated as noisy —
//!   preamble and a nonzero exit do not fail a parseable report).
//! - **Summary**: one structured `(label, value, unit)` entry per language
//!   and unit, in the counter's key order, plus the tool-supplied `"Total"`
//!   aggregate kept apart from the per-language population.
//! - **Projection**: case-insensitive substring filtering and stable
//!   descending sort on the true integer value, gated on the run lifecycle
//!   so stale data is never shown mid-run.
//! - **Controller**: a single owner for report-derived state with an
//!   observer surface — subscribers are told *when* to re-read, never what
//!   changed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clocviewlib::{ClocInvocation, CountController};
//!
//! let controller = CountController::new();
//! controller.set_filter("rust");
//! controller.run_blocking(ClocInvocation::new("."))?;
//!
//! for row in controller.lines_view() {
//!     println!("{}  {}", row.label, row.detail);
//! }
//! # Ok::<(), clocviewlib::ClocViewError>(())
//! ```

pub mod controller;
pub mod error;
pub mod ingest;
pub mod report;
pub mod summary;
pub mod view;

pub use controller::{CountController, RefreshListener};
pub use error::ClocViewError;
pub use ingest::ClocInvocation;
pub use report::{LanguageStats, Report};
pub use summary::{format_value, parse_value, Entry, Summary, Unit};
pub use view::{DisplayNode, RunState};

/// Result type for clocviewlib operations
pub type Result<T> = std::result::Result<T, ClocViewError>;
