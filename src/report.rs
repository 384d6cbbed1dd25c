mod csv;
mod html;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;
use crate::summary::FileSummary;

pub use self::csv::render_csv;
pub use self::html::render_html;

/// Which artifacts to write next to each other under the output directory.
#[derive(Debug, Clone, Copy)]
pub struct ReportFormats {
    pub json: bool,
    pub pretty: bool,
}

/// Write `<week>_summary.{csv,html[,json]}` and return the written paths.
///
/// Nothing is written for an empty table.
pub fn write_reports(
    summaries: &[FileSummary],
    week_label: &str,
    output_dir: &Path,
    formats: ReportFormats,
) -> Result<Vec<PathBuf>> {
    if summaries.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(output_dir)?;
    let stem = format!("{week_label}_summary");
    let mut written = Vec::new();

    let csv_path = output_dir.join(format!("{stem}.csv"));
    fs::write(&csv_path, render_csv(summaries))?;
    written.push(csv_path);

    let html_path = output_dir.join(format!("{stem}.html"));
    let title = format!("{week_label} commit summary by file");
    fs::write(&html_path, render_html(summaries, &title))?;
    written.push(html_path);

    if formats.json {
        let json_path = output_dir.join(format!("{stem}.json"));
        let json_output = if formats.pretty {
            serde_json::to_string_pretty(summaries)?
        } else {
            serde_json::to_string(summaries)?
        };
        fs::write(&json_path, json_output)?;
        written.push(json_path);
    }

    for path in &written {
        info!("Report written to: {}", path.display());
    }

    Ok(written)
}
