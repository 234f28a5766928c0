//! # clocview
//!
//! A CLI front-end for an external line counter (cloc-compatible). It runs
//! the counter over a directory and renders per-language file and line
//! counts as descending-sorted, filterable lists with the counter's own
//! aggregate total kept apart.
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory
//! clocview .
//!
//! # Only languages whose name contains "script"
//! clocview . --filter script
//!
//! # Line counts only, as JSON
//! clocview . --view lines --output json
//!
//! # A counter installed under a different name, with pass-through args
//! clocview . --cloc-bin /opt/cloc/cloc --cloc-arg --exclude-dir=target
//!
//! # Re-run (identical to count)
//! clocview refresh .
//! ```
//!
//! Scanning is delegated entirely to the counter; by default only
//! version-control-tracked files are counted (`--no-vcs` lifts that).

use std::process::ExitCode;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clocviewlib::{ClocInvocation, ClocViewError, CountController};

mod render;

use render::{render_json, render_views, ViewChoice};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("clocview")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Per-language file and line counts from an external counter")
        .args(count_args())
        .subcommand(
            Command::new("count")
                .about("Run the counter and render the report (default command)")
                .visible_alias("refresh")
                .args(count_args()),
        )
}

/// Arguments shared by the root command and the count subcommand
fn count_args() -> Vec<Arg> {
    vec![
        Arg::new("path")
            .help("Directory to count (defaults to current directory)")
            .default_value("."),
        Arg::new("filter")
            .short('f')
            .long("filter")
            .help("Only show languages whose name contains this text (case-insensitive)"),
        Arg::new("view")
            .long("view")
            .value_parser(["files", "lines", "both"])
            .default_value("both")
            .help("Which count lists to render"),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(["table", "json"])
            .default_value("table")
            .help("Output format"),
        Arg::new("cloc-bin")
            .long("cloc-bin")
            .help("Counter executable to invoke (defaults to 'cloc')"),
        Arg::new("cloc-arg")
            .long("cloc-arg")
            .action(ArgAction::Append)
            .help("Extra argument passed through to the counter (can be repeated)"),
        Arg::new("no-vcs")
            .long("no-vcs")
            .action(ArgAction::SetTrue)
            .help("Count all files, not just version-control-tracked ones"),
        Arg::new("no-total")
            .long("no-total")
            .action(ArgAction::SetTrue)
            .help("Omit the aggregate Total row"),
    ]
}

/// Build the counter invocation from matches
fn build_invocation(matches: &ArgMatches) -> ClocInvocation {
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or(".");

    let mut invocation = ClocInvocation::new(path);
    if let Some(bin) = matches.get_one::<String>("cloc-bin") {
        invocation = invocation.program(bin);
    }
    if matches.get_flag("no-vcs") {
        invocation = invocation.no_vcs();
    }
    if let Some(args) = matches.get_many::<String>("cloc-arg") {
        for arg in args {
            invocation = invocation.arg(arg);
        }
    }
    invocation
}

/// Handler for the count command
fn count(matches: &ArgMatches) -> Result<String> {
    let controller = CountController::new();
    if let Some(filter) = matches.get_one::<String>("filter") {
        controller.set_filter(filter.clone());
    }

    controller.run_blocking(build_invocation(matches))?;

    let view = matches
        .get_one::<String>("view")
        .map(String::as_str)
        .map(ViewChoice::from_flag)
        .unwrap_or(ViewChoice::Both);
    let with_total = !matches.get_flag("no-total");

    let output = matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("table");
    if output == "json" {
        render_json(&controller, view, with_total)
    } else {
        Ok(render_views(&controller, view, with_total))
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let sub = matches
        .subcommand()
        .and_then(|(name, sub)| (name == "count").then(|| sub.clone()));
    let matches = sub.unwrap_or(matches);

    match count(&matches) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            if let Some(ClocViewError::MalformedOutput { raw, .. }) =
                e.downcast_ref::<ClocViewError>()
            {
                if !raw.trim().is_empty() {
                    eprintln!("--- raw counter output ---");
                    eprintln!("{}", raw.trim_end());
                }
            }
            ExitCode::FAILURE
        }
    }
}
