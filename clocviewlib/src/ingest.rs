//! Invocation of the external counting tool.
//!
//! The counter owns all source-tree scanning; this module owns launching
//! it, capturing stdout, and turning that buffer into a [`Report`].

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ClocViewError;
use crate::report::Report;
use crate::Result;

/// Default counter executable.
pub const DEFAULT_PROGRAM: &str = "cloc";

/// Builder for one counter invocation.
///
/// The defaults are equivalent to `cloc --json --quiet --vcs=git <root>`:
/// JSON output, restricted to version-control-tracked files, rooted at the
/// given directory.
#[derive(Debug, Clone)]
pub struct ClocInvocation {
    program: String,
    root: PathBuf,
    vcs: Option<String>,
    extra_args: Vec<String>,
}

impl ClocInvocation {
    /// Create an invocation rooted at `root` with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            root: root.into(),
            vcs: Some("git".to_string()),
            extra_args: Vec::new(),
        }
    }

    /// Use a different counter executable.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Restrict counting to files tracked by the given VCS.
    pub fn vcs(mut self, vcs: impl Into<String>) -> Self {
        self.vcs = Some(vcs.into());
        self
    }

    /// Count all files, not just version-control-tracked ones.
    pub fn no_vcs(mut self) -> Self {
        self.vcs = None;
        self
    }

    /// Append an extra argument passed through to the counter.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// The directory this invocation counts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Launch the counter, wait for it to exit, and parse its report.
    ///
    /// The root must be an existing directory; otherwise no process is
    /// started. The exit code is observed but not authoritative: a
    /// parseable report succeeds even on a nonzero exit, and an empty or
    /// malformed buffer fails even on a clean one.
    pub fn run(&self) -> Result<Report> {
        if !self.root.is_dir() {
            return Err(ClocViewError::NoTargetDirectory(self.root.clone()));
        }

        let mut command = Command::new(&self.program);
        command.arg("--json").arg("--quiet");
        if let Some(vcs) = &self.vcs {
            command.arg(format!("--vcs={vcs}"));
        }
        for arg in &self.extra_args {
            command.arg(arg);
        }
        command.arg(&self.root);

        let output = command
            .output()
            .map_err(|source| ClocViewError::ProcessStart {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        match Report::from_stdout(&stdout) {
            Ok(report) => Ok(report),
            Err(ClocViewError::MalformedOutput { message, raw }) => {
                let message = match output.status.code() {
                    Some(code) if code != 0 => {
                        format!("{message} (counter exited with status {code})")
                    }
                    _ => message,
                };
                Err(ClocViewError::MalformedOutput { message, raw })
            }
            Err(other) => Err(other),
        }
    }
}
