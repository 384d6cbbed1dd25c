use std::collections::{HashMap, HashSet};

use super::client::GitHubCommitDto;
use crate::config::WeekWindow;
use crate::summary::{ChangeRecord, ChangeStatus};

/// Build one record per tracked, non-removed file of an in-window commit.
pub fn build_records(
    commit: &GitHubCommitDto,
    user: &str,
    directory: &str,
    window: &WeekWindow,
) -> Vec<ChangeRecord> {
    let timestamp = commit.commit.author.date.with_timezone(&window.offset());
    if !window.contains(timestamp) {
        return Vec::new();
    }

    let url = commit.html_url.clone().unwrap_or_default();

    commit
        .files
        .iter()
        .filter(|f| f.filename.starts_with(directory) && f.status != ChangeStatus::Removed)
        .map(|f| ChangeRecord {
            user: user.to_string(),
            timestamp,
            filename: f.filename.clone(),
            total_changes: f.changes,
            additions: f.additions,
            deletions: f.deletions,
            status: f.status,
            url: url.clone(),
        })
        .collect()
}

/// Drop the earliest record of every file that has more than one.
///
/// Among records sharing the earliest timestamp, the first one in fetch order
/// is dropped. Single-record files are kept.
pub fn exclude_first_commit(records: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    let mut earliest: HashMap<&str, (usize, usize)> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        earliest
            .entry(record.filename.as_str())
            .and_modify(|(count, first)| {
                *count += 1;
                if record.timestamp < records[*first].timestamp {
                    *first = index;
                }
            })
            .or_insert((1, index));
    }

    let dropped: HashSet<usize> = earliest
        .values()
        .filter(|(count, _)| *count > 1)
        .map(|(_, first)| *first)
        .collect();

    records
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, record)| record)
        .collect()
}
