//! Controller owning report-derived state and the refresh observer list.
//!
//! All mutation happens in the completion handler and the filter setters,
//! serialized by one internal lock. Overlapping runs are permitted and are
//! not serialized, de-duplicated, or cancelled: the later completion
//! overwrites the earlier one's state, with no ordering guarantee.

use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::ClocViewError;
use crate::ingest::ClocInvocation;
use crate::report::Report;
use crate::summary::{Summary, Unit};
use crate::view::{self, DisplayNode, RunState};

/// Placeholder text shown while a run is in flight.
pub const IN_PROGRESS_NOTICE: &str = "Counting in progress...";

/// Observer invoked whenever derived state must be re-read.
///
/// The notification carries no payload: consumers re-fetch current state
/// from the controller rather than receiving a diff.
pub trait RefreshListener: Send + Sync {
    fn on_refresh(&self);
}

#[derive(Default)]
struct ControllerState {
    run_state: RunState,
    summary: Summary,
    filter: Option<String>,
    notice: Option<String>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<ControllerState>,
    listeners: Mutex<Vec<Arc<dyn RefreshListener>>>,
}

/// Owner of the current report's formatted entries, run state, and filter.
#[derive(Clone, Default)]
pub struct CountController {
    inner: Arc<Inner>,
}

impl CountController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for refresh notifications.
    pub fn subscribe(&self, listener: Arc<dyn RefreshListener>) {
        self.inner.listeners.lock().unwrap().push(listener);
    }

    /// Start a run without blocking the caller.
    ///
    /// Fire-and-forget: completion is observed only through the refresh
    /// notification. Calling this while a run is in flight starts a second
    /// counter process in parallel; the later completion wins.
    pub fn run(&self, invocation: ClocInvocation) {
        self.begin();

        let controller = self.clone();
        thread::spawn(move || {
            let outcome = invocation.run();
            let _ = controller.complete(outcome);
        });
    }

    /// Identical in effect to [`run`](Self::run).
    pub fn refresh(&self, invocation: ClocInvocation) {
        self.run(invocation);
    }

    /// Run synchronously through the same begin/complete path as [`run`](Self::run).
    pub fn run_blocking(&self, invocation: ClocInvocation) -> crate::Result<()> {
        self.begin();
        let outcome = invocation.run();
        self.complete(outcome)
    }

    /// Set the substring filter. Empty or whitespace text is equivalent to
    /// [`clear_filter`](Self::clear_filter). Never touches the run state.
    pub fn set_filter(&self, text: impl Into<String>) {
        let text = text.into();
        {
            let mut state = self.inner.state.lock().unwrap();
            state.filter = if text.trim().is_empty() { None } else { Some(text) };
        }
        self.notify();
    }

    /// Clear the substring filter. Never touches the run state.
    pub fn clear_filter(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.filter = None;
        }
        self.notify();
    }

    /// The current filter text, if one is set.
    pub fn filter(&self) -> Option<String> {
        self.inner.state.lock().unwrap().filter.clone()
    }

    /// The current run lifecycle flag.
    pub fn run_state(&self) -> RunState {
        self.inner.state.lock().unwrap().run_state
    }

    /// Placeholder or error text for the display layer, if any.
    pub fn notice(&self) -> Option<String> {
        self.inner.state.lock().unwrap().notice.clone()
    }

    /// Projected file-count rows under the current filter and run state.
    pub fn files_view(&self) -> Vec<DisplayNode> {
        let state = self.inner.state.lock().unwrap();
        view::project(&state.summary.files, state.filter.as_deref(), state.run_state)
    }

    /// Projected line-count rows under the current filter and run state.
    pub fn lines_view(&self) -> Vec<DisplayNode> {
        let state = self.inner.state.lock().unwrap();
        view::project(&state.summary.lines, state.filter.as_deref(), state.run_state)
    }

    /// The separated aggregate row for one unit, hidden while running.
    pub fn total_row(&self, unit: Unit) -> Option<DisplayNode> {
        let state = self.inner.state.lock().unwrap();
        if state.run_state.is_running() {
            return None;
        }
        let entries = match unit {
            Unit::Files => &state.summary.files,
            Unit::Lines => &state.summary.lines,
        };
        view::total_node(entries)
    }

    /// Transition to running and signal the in-progress placeholder.
    fn begin(&self) {
        {
            let mut state = self.inner.state.lock().unwrap();
            state.run_state = RunState::Running;
            state.notice = Some(IN_PROGRESS_NOTICE.to_string());
        }
        self.notify();
    }

    /// Install one run's outcome and signal a refresh.
    ///
    /// The report is fully replaced, never merged, so no stale
    /// per-language entries survive across runs.
    fn complete(&self, outcome: crate::Result<Report>) -> crate::Result<()> {
        let result = {
            let mut state = self.inner.state.lock().unwrap();
            match outcome {
                Ok(report) => {
                    state.summary = Summary::from_report(&report);
                    state.run_state = RunState::Idle;
                    state.notice = None;
                    Ok(())
                }
                Err(err) => {
                    // A missing target directory never started a process,
                    // so it returns to idle rather than failed
                    state.run_state = match err {
                        ClocViewError::NoTargetDirectory(_) => RunState::Idle,
                        _ => RunState::Failed,
                    };
                    state.summary = Summary::default();
                    state.notice = Some(notice_for(&err));
                    Err(err)
                }
            }
        };
        self.notify();
        result
    }

    fn notify(&self) {
        let listeners: Vec<Arc<dyn RefreshListener>> =
            self.inner.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener.on_refresh();
        }
    }
}

/// Display text for a failed run; malformed output keeps its raw buffer.
fn notice_for(err: &ClocViewError) -> String {
    match err {
        ClocViewError::MalformedOutput { raw, .. } if !raw.trim().is_empty() => {
            format!("{err}\n--- raw counter output ---\n{}", raw.trim_end())
        }
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{channel, Sender};
    use std::time::Duration;

    struct CountingListener(AtomicUsize);

    impl RefreshListener for CountingListener {
        fn on_refresh(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ChannelListener(Mutex<Sender<()>>);

    impl RefreshListener for ChannelListener {
        fn on_refresh(&self) {
            let _ = self.0.lock().unwrap().send(());
        }
    }

    #[test]
    fn test_filter_setters_notify_and_leave_run_state() {
        let controller = CountController::new();
        let listener = Arc::new(CountingListener(AtomicUsize::new(0)));
        controller.subscribe(listener.clone());

        controller.set_filter("rust");
        assert_eq!(controller.filter().as_deref(), Some("rust"));
        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(listener.0.load(Ordering::SeqCst), 1);

        controller.set_filter("   ");
        assert_eq!(controller.filter(), None);

        controller.clear_filter();
        assert_eq!(controller.filter(), None);
        assert_eq!(listener.0.load(Ordering::SeqCst), 3);
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn test_missing_directory_returns_to_idle_with_notice() {
        let controller = CountController::new();
        let err = controller
            .run_blocking(ClocInvocation::new("/definitely/not/a/real/directory"))
            .unwrap_err();

        assert!(matches!(err, ClocViewError::NoTargetDirectory(_)));
        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(controller.notice().unwrap().contains("no target directory"));
        assert!(controller.files_view().is_empty());
    }

    #[cfg(unix)]
    mod with_fake_counter {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};

        fn script(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("fake-cloc");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            let mut perms = fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&path, perms).unwrap();
            path
        }

        fn invocation(dir: &Path, body: &str) -> ClocInvocation {
            ClocInvocation::new(dir)
                .program(script(dir, body).to_string_lossy().into_owned())
                .no_vcs()
        }

        const TWO_LANGUAGES: &str = r#"echo '{"Go":{"nFiles":10,"code":5000},"Rust":{"nFiles":2,"code":9000},"SUM":{"nFiles":12,"code":14000}}'"#;

        #[test]
        fn test_run_blocking_installs_projected_views() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();
            controller
                .run_blocking(invocation(dir.path(), TWO_LANGUAGES))
                .unwrap();

            assert_eq!(controller.run_state(), RunState::Idle);
            assert_eq!(controller.notice(), None);

            let lines: Vec<String> = controller
                .lines_view()
                .iter()
                .map(|r| format!("{}: {}", r.label, r.detail))
                .collect();
            assert_eq!(lines, vec!["Rust: 9,000 lines", "Go: 5,000 lines"]);

            let total = controller.total_row(Unit::Lines).unwrap();
            assert_eq!(total.detail, "14,000 lines");
        }

        #[test]
        fn test_filter_applies_to_views_without_touching_report() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();
            controller
                .run_blocking(invocation(dir.path(), TWO_LANGUAGES))
                .unwrap();

            controller.set_filter("go");
            let lines = controller.lines_view();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].label, "Go");

            // Clearing restores the full projection from the same report
            controller.clear_filter();
            assert_eq!(controller.lines_view().len(), 2);
        }

        #[test]
        fn test_failed_run_clears_entries_and_keeps_raw() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();

            controller
                .run_blocking(invocation(dir.path(), TWO_LANGUAGES))
                .unwrap();
            assert!(!controller.lines_view().is_empty());

            let err = controller
                .run_blocking(invocation(dir.path(), "echo 'oops no braces here'"))
                .unwrap_err();
            assert!(matches!(err, ClocViewError::MalformedOutput { .. }));

            assert_eq!(controller.run_state(), RunState::Failed);
            assert!(controller.lines_view().is_empty());
            assert!(controller.notice().unwrap().contains("oops no braces here"));
        }

        #[test]
        fn test_rerun_replaces_report() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();

            controller
                .run_blocking(invocation(dir.path(), TWO_LANGUAGES))
                .unwrap();
            controller
                .run_blocking(invocation(
                    dir.path(),
                    r#"echo '{"Python":{"nFiles":3,"code":120}}'"#,
                ))
                .unwrap();

            let lines = controller.lines_view();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].label, "Python");
        }

        #[test]
        fn test_empty_report_is_a_normal_outcome() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();
            controller
                .run_blocking(invocation(dir.path(), "echo '{}'"))
                .unwrap();

            assert_eq!(controller.run_state(), RunState::Idle);
            let rows = controller.files_view();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].label, crate::summary::EMPTY_NOTICE);
        }

        #[test]
        fn test_fire_and_forget_notifies_on_start_and_completion() {
            let dir = tempfile::tempdir().unwrap();
            let controller = CountController::new();
            let (tx, rx) = channel();
            controller.subscribe(Arc::new(ChannelListener(Mutex::new(tx))));

            controller.run(invocation(dir.path(), TWO_LANGUAGES));

            // One notification when the run starts, one when it completes
            rx.recv_timeout(Duration::from_secs(10)).unwrap();
            rx.recv_timeout(Duration::from_secs(10)).unwrap();

            assert_eq!(controller.run_state(), RunState::Idle);
            assert_eq!(controller.lines_view().len(), 2);
        }
    }
}
