mod roster;
mod weeks;

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;

use crate::error::{AuditError, Result};

pub use roster::{load_roster, load_token, RosterEntry, RosterFormat};
pub use weeks::{load_weeks, WeekTable, WeekWindow};

/// Everything a run needs, resolved once from the command line.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub api_url: String,
    pub raw_url: String,
    pub org: String,
    pub branch: String,
    pub directory: Option<String>,
    pub reference_root: PathBuf,
    pub request_delay: Duration,
    pub exclude_first_commit: bool,
}

impl AuditConfig {
    /// Directory prefix whose files are graded, `<week>/` unless overridden.
    pub fn tracked_directory(&self, week_label: &str) -> String {
        self.directory
            .clone()
            .unwrap_or_else(|| format!("{week_label}/"))
    }

    pub fn repository_name(week_label: &str, user_id: &str) -> String {
        format!("homework-{week_label}-{user_id}")
    }
}

pub fn utc_offset_hours(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| AuditError::Config(format!("UTC offset out of range: {hours}h")))
}

fn read_config_file(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            AuditError::Config(format!("{what} '{}' not found", path.display()))
        }
        _ => AuditError::Io(e),
    })
}
