use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};

/// File status as reported by the commit detail endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    Removed,
    #[serde(other)]
    Unknown,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Removed => "removed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file touched by one in-window commit.
#[derive(Debug, Clone)]
pub struct ChangeRecord {
    pub user: String,
    pub timestamp: DateTime<FixedOffset>,
    pub filename: String,
    pub total_changes: u64,
    pub additions: u64,
    pub deletions: u64,
    pub status: ChangeStatus,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultLabel {
    Fail,
    Warning,
    Success,
}

impl ResultLabel {
    pub fn from_commit_count(count: usize) -> Self {
        match count {
            0 | 1 => Self::Fail,
            2..=4 => Self::Warning,
            _ => Self::Success,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::Warning => "warning",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for ResultLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time between the first and last qualifying commit, truncated to minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodingDuration {
    pub hours: i64,
    pub minutes: i64,
}

impl CodingDuration {
    pub fn between(first: DateTime<FixedOffset>, last: DateTime<FixedOffset>) -> Self {
        Self::from_delta(last - first)
    }

    pub fn from_delta(delta: TimeDelta) -> Self {
        let seconds = delta.num_seconds().max(0);
        Self {
            hours: seconds / 3600,
            minutes: (seconds % 3600) / 60,
        }
    }
}

impl fmt::Display for CodingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

impl Serialize for CodingDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One report row: the aggregate of every qualifying change to a file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub week_label: String,
    pub user: String,
    pub filename: String,
    pub last_commit_at: DateTime<FixedOffset>,
    pub total_changes_mean: f64,
    pub additions_mean: f64,
    pub deletions_mean: f64,
    pub commit_count: usize,
    pub status: ChangeStatus,
    pub url: String,
    pub coding_duration: CodingDuration,
    pub loc: usize,
    pub code_similarity: Option<f64>,
    pub result: ResultLabel,
}

impl FileSummary {
    pub fn last_commit_display(&self) -> String {
        self.last_commit_at.format("%Y-%m-%d %H:%M").to_string()
    }

    pub fn similarity_display(&self) -> String {
        self.code_similarity
            .map_or_else(|| "-".to_string(), |score| format!("{score:.2}"))
    }
}
