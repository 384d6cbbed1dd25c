use std::borrow::Cow;

use crate::summary::FileSummary;

const HEADER: [&str; 14] = [
    "week_label",
    "user",
    "filename",
    "commit_count",
    "last_commit_at",
    "status",
    "total_changes_mean",
    "additions_mean",
    "deletions_mean",
    "code_similarity",
    "coding_duration",
    "loc",
    "result",
    "url",
];

/// Flat dump, one line per summary row.
pub fn render_csv(summaries: &[FileSummary]) -> String {
    let mut out = HEADER.join(",");
    out.push('\n');

    for row in summaries {
        let fields = [
            row.week_label.clone(),
            row.user.clone(),
            row.filename.clone(),
            row.commit_count.to_string(),
            row.last_commit_display(),
            row.status.to_string(),
            row.total_changes_mean.to_string(),
            row.additions_mean.to_string(),
            row.deletions_mean.to_string(),
            row.code_similarity.map(|s| s.to_string()).unwrap_or_default(),
            row.coding_duration.to_string(),
            row.loc.to_string(),
            row.result.to_string(),
            row.url.clone(),
        ];

        let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
