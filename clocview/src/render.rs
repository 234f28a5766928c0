//! Terminal and JSON rendering for projected views.

use anyhow::Result;
use clocviewlib::{CountController, DisplayNode, Unit};
use console::Style;
use serde::Serialize;

/// Width of the name column in table output
const NAME_WIDTH: usize = 24;

/// Width of the value column in table output
const CELL_WIDTH: usize = 14;

/// Which count lists to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChoice {
    Files,
    Lines,
    Both,
}

impl ViewChoice {
    /// Map the `--view` flag value to a choice.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "files" => ViewChoice::Files,
            "lines" => ViewChoice::Lines,
            _ => ViewChoice::Both,
        }
    }

    fn includes_files(self) -> bool {
        matches!(self, ViewChoice::Files | ViewChoice::Both)
    }

    fn includes_lines(self) -> bool {
        matches!(self, ViewChoice::Lines | ViewChoice::Both)
    }
}

/// One projected list plus its separated aggregate row
#[derive(Debug, Serialize)]
struct JsonView {
    rows: Vec<DisplayNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<DisplayNode>,
}

/// Data context for JSON output
#[derive(Debug, Serialize)]
struct JsonOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<JsonView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<JsonView>,
}

/// Render the selected views as pretty-printed JSON
pub fn render_json(
    controller: &CountController,
    view: ViewChoice,
    with_total: bool,
) -> Result<String> {
    let json_view = |rows: Vec<DisplayNode>, unit: Unit| JsonView {
        rows,
        total: if with_total {
            controller.total_row(unit)
        } else {
            None
        },
    };

    let output = JsonOutput {
        files: view
            .includes_files()
            .then(|| json_view(controller.files_view(), Unit::Files)),
        lines: view
            .includes_lines()
            .then(|| json_view(controller.lines_view(), Unit::Lines)),
    };

    Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

/// Render the selected views as styled tables
pub fn render_views(controller: &CountController, view: ViewChoice, with_total: bool) -> String {
    let mut out = String::new();

    if controller.run_state().is_running() {
        if let Some(notice) = controller.notice() {
            out.push_str(&notice);
            out.push('\n');
        }
        return out;
    }

    if view.includes_files() {
        let total = with_total.then(|| controller.total_row(Unit::Files)).flatten();
        render_section(&mut out, "Files", &controller.files_view(), total);
    }
    if view == ViewChoice::Both {
        out.push('\n');
    }
    if view.includes_lines() {
        let total = with_total.then(|| controller.total_row(Unit::Lines)).flatten();
        render_section(&mut out, "Lines", &controller.lines_view(), total);
    }

    out
}

/// Render one list with its header, rows, and separated total
fn render_section(out: &mut String, title: &str, rows: &[DisplayNode], total: Option<DisplayNode>) {
    let header_style = Style::new().bold();
    let separator = "-".repeat(NAME_WIDTH + 1 + CELL_WIDTH);

    out.push_str(&format!("{}\n", header_style.apply_to(title)));
    out.push_str(&separator);
    out.push('\n');

    for row in rows {
        push_row(out, row);
    }

    if let Some(total) = total {
        out.push_str(&separator);
        out.push('\n');
        push_row(out, &total);
    }
}

fn push_row(out: &mut String, row: &DisplayNode) {
    if row.detail.is_empty() {
        // Notice rows have no value column
        out.push_str(&row.label);
        out.push('\n');
    } else {
        let name = truncate_name(&row.label, NAME_WIDTH - 2);
        out.push_str(&format!(
            "{:<name_width$} {:>cell_width$}\n",
            name,
            row.detail,
            name_width = NAME_WIDTH,
            cell_width = CELL_WIDTH
        ));
    }
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.len() > max_len {
        format!("..{}", &name[name.len() - max_len + 2..])
    } else {
        name.to_string()
    }
}
