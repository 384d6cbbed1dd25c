use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use log::warn;

use super::client::line_count;
use super::similarity::ReferenceSet;
use crate::providers::HeadContent;
use crate::summary::{ChangeRecord, ChangeStatus, CodingDuration, FileSummary, ResultLabel};

/// Per-file statistics that need no remote lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats {
    pub filename: String,
    pub user: String,
    pub first_commit_at: DateTime<FixedOffset>,
    pub last_commit_at: DateTime<FixedOffset>,
    pub total_changes_mean: f64,
    pub additions_mean: f64,
    pub deletions_mean: f64,
    pub commit_count: usize,
    pub status: ChangeStatus,
    pub url: String,
}

impl FileStats {
    fn into_summary(self, week_label: &str, loc: usize, code_similarity: Option<f64>) -> FileSummary {
        FileSummary {
            week_label: week_label.to_string(),
            user: self.user,
            coding_duration: CodingDuration::between(self.first_commit_at, self.last_commit_at),
            result: ResultLabel::from_commit_count(self.commit_count),
            filename: self.filename,
            last_commit_at: self.last_commit_at,
            total_changes_mean: self.total_changes_mean,
            additions_mean: self.additions_mean,
            deletions_mean: self.deletions_mean,
            commit_count: self.commit_count,
            status: self.status,
            url: self.url,
            loc,
            code_similarity,
        }
    }
}

/// Round to 2 decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group records by file path, ordered by path.
pub fn summarize(records: &[ChangeRecord]) -> Vec<FileStats> {
    let mut groups: BTreeMap<&str, Vec<&ChangeRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.filename.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .filter_map(|(filename, group)| summarize_group(filename, &group))
        .collect()
}

fn summarize_group(filename: &str, group: &[&ChangeRecord]) -> Option<FileStats> {
    let first = group.first()?;

    // Ties on the newest timestamp go to the record fetched last
    let latest = group
        .iter()
        .copied()
        .reduce(|latest, record| {
            if record.timestamp >= latest.timestamp {
                record
            } else {
                latest
            }
        })?;
    let first_commit_at = group.iter().map(|r| r.timestamp).min()?;

    let count = group.len();
    Some(FileStats {
        filename: filename.to_string(),
        user: first.user.clone(),
        first_commit_at,
        last_commit_at: latest.timestamp,
        total_changes_mean: mean(group.iter().map(|r| r.total_changes), count),
        additions_mean: mean(group.iter().map(|r| r.additions), count),
        deletions_mean: mean(group.iter().map(|r| r.deletions), count),
        commit_count: count,
        status: latest.status,
        url: latest.url.clone(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = u64>, count: usize) -> f64 {
    let total: u64 = values.sum();
    round2(total as f64 / count.max(1) as f64)
}

/// Attach head-of-branch line counts and similarity scores.
///
/// Each path is fetched once. Files missing at the head are dropped.
pub async fn attach_head_metrics<C>(
    stats: Vec<FileStats>,
    week_label: &str,
    content: &C,
    references: &ReferenceSet,
) -> Vec<FileSummary>
where
    C: HeadContent + ?Sized,
{
    let mut summaries = Vec::with_capacity(stats.len());

    for file in stats {
        let Some(text) = content.fetch_head(&file.filename).await else {
            warn!(
                "Dropping {} for {}: not available at the branch head",
                file.filename, file.user
            );
            continue;
        };

        let loc = line_count(&text);
        let code_similarity = references.score(&file.filename, Some(&text)).await;
        summaries.push(file.into_summary(week_label, loc, code_similarity));
    }

    summaries
}

pub async fn aggregate<C>(
    records: &[ChangeRecord],
    week_label: &str,
    content: &C,
    references: &ReferenceSet,
) -> Vec<FileSummary>
where
    C: HeadContent + ?Sized,
{
    attach_head_metrics(summarize(records), week_label, content, references).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::Path;

    struct InMemoryHead(HashMap<String, String>);

    #[async_trait]
    impl HeadContent for InMemoryHead {
        async fn fetch_head(&self, path: &str) -> Option<String> {
            self.0.get(path).cloned()
        }
    }

    fn head(files: &[(&str, &str)]) -> InMemoryHead {
        InMemoryHead(
            files
                .iter()
                .map(|(path, text)| ((*path).to_string(), (*text).to_string()))
                .collect(),
        )
    }

    fn record(filename: &str, at: &str, changes: (u64, u64, u64)) -> ChangeRecord {
        ChangeRecord {
            user: "kim".to_string(),
            timestamp: DateTime::parse_from_rfc3339(at).unwrap(),
            filename: filename.to_string(),
            total_changes: changes.0,
            additions: changes.1,
            deletions: changes.2,
            status: ChangeStatus::Modified,
            url: format!("https://github.com/org/repo/commit/{at}"),
        }
    }

    #[test]
    fn test_commit_count_and_label_per_file() {
        let mut records = vec![record("W3/one.js", "2024-03-18T10:00:00+09:00", (1, 1, 0))];
        for day in 18..21 {
            records.push(record("W3/three.js", &format!("2024-03-{day}T10:00:00+09:00"), (1, 1, 0)));
        }
        for day in 18..24 {
            records.push(record("W3/six.js", &format!("2024-03-{day}T10:00:00+09:00"), (1, 1, 0)));
        }

        let stats = summarize(&records);
        let counts: Vec<_> = stats
            .iter()
            .map(|s| (s.filename.as_str(), s.commit_count, ResultLabel::from_commit_count(s.commit_count)))
            .collect();

        assert_eq!(
            counts,
            vec![
                ("W3/one.js", 1, ResultLabel::Fail),
                ("W3/six.js", 6, ResultLabel::Success),
                ("W3/three.js", 3, ResultLabel::Warning),
            ]
        );
    }

    #[test]
    fn test_means_are_rounded_to_two_decimals() {
        let records = vec![
            record("W3/a.js", "2024-03-18T10:00:00+09:00", (1, 1, 0)),
            record("W3/a.js", "2024-03-19T10:00:00+09:00", (1, 0, 1)),
            record("W3/a.js", "2024-03-20T10:00:00+09:00", (2, 2, 1)),
        ];

        let stats = summarize(&records);

        assert!((stats[0].total_changes_mean - 1.33).abs() < 1e-9);
        assert!((stats[0].additions_mean - 1.0).abs() < 1e-9);
        assert!((stats[0].deletions_mean - 0.67).abs() < 1e-9);
    }

    #[test]
    fn test_round2_rounds_halves_away_from_zero() {
        // 1/8 is exact in binary, so this is a true half at the third decimal
        let mut records = vec![record("W3/a.js", "2024-03-18T10:00:00+09:00", (1, 1, 0))];
        for hour in 11..18 {
            records.push(record("W3/a.js", &format!("2024-03-18T{hour}:00:00+09:00"), (0, 0, 0)));
        }

        let stats = summarize(&records);

        assert!((stats[0].total_changes_mean - 0.13).abs() < 1e-9);
        assert!((round2(-0.125) + 0.13).abs() < 1e-9);
    }

    #[test]
    fn test_latest_record_wins_ties_by_fetch_order() {
        let mut earlier = record("W3/a.js", "2024-03-18T10:00:00+09:00", (1, 1, 0));
        earlier.status = ChangeStatus::Added;
        let mut tied_first = record("W3/a.js", "2024-03-20T10:00:00+09:00", (1, 1, 0));
        tied_first.status = ChangeStatus::Modified;
        tied_first.url = "tied-first".to_string();
        let mut tied_last = record("W3/a.js", "2024-03-20T10:00:00+09:00", (1, 1, 0));
        tied_last.status = ChangeStatus::Renamed;
        tied_last.url = "tied-last".to_string();

        let stats = summarize(&[tied_first, earlier, tied_last]);

        assert_eq!(stats[0].status, ChangeStatus::Renamed);
        assert_eq!(stats[0].url, "tied-last");
        assert_eq!(stats[0].last_commit_at.to_rfc3339(), "2024-03-20T10:00:00+09:00");
    }

    #[test]
    fn test_output_is_ordered_by_path() {
        let records = vec![
            record("W3/z.js", "2024-03-18T10:00:00+09:00", (1, 1, 0)),
            record("W3/a.js", "2024-03-18T11:00:00+09:00", (1, 1, 0)),
            record("W3/m/b.js", "2024-03-18T12:00:00+09:00", (1, 1, 0)),
        ];

        let names: Vec<_> = summarize(&records).into_iter().map(|s| s.filename).collect();

        assert_eq!(names, vec!["W3/a.js", "W3/m/b.js", "W3/z.js"]);
    }

    #[tokio::test]
    async fn test_aggregate_drops_files_missing_at_head() {
        let records = vec![
            record("W3/kept.js", "2024-03-18T10:00:00+09:00", (1, 1, 0)),
            record("W3/deleted.js", "2024-03-18T11:00:00+09:00", (1, 1, 0)),
        ];
        let content = head(&[("W3/kept.js", "a\nb\nc")]);
        let references = ReferenceSet::new(Path::new("/nonexistent"), "W3/");

        let summaries = aggregate(&records, "W3", &content, &references).await;

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].filename, "W3/kept.js");
        assert_eq!(summaries[0].loc, 3);
        assert_eq!(summaries[0].code_similarity, None);
        assert_eq!(summaries[0].week_label, "W3");
    }

    #[tokio::test]
    async fn test_aggregate_scores_against_reference() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "let x = 1;").unwrap();
        let records = vec![
            record("W3/a.js", "2024-03-18T10:00:00+09:00", (4, 3, 1)),
            record("W3/a.js", "2024-03-19T12:30:00+09:00", (2, 1, 1)),
        ];
        let content = head(&[("W3/a.js", "let x = 1;")]);
        let references = ReferenceSet::new(dir.path(), "W3/");

        let summaries = aggregate(&records, "W3", &content, &references).await;

        assert_eq!(summaries[0].code_similarity, Some(100.0));
        assert_eq!(summaries[0].result, ResultLabel::Warning);
        assert_eq!(summaries[0].coding_duration.to_string(), "26h 30m");
        assert!((summaries[0].total_changes_mean - 3.0).abs() < 1e-9);
    }
}
