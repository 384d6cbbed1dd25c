use std::fmt::Write;

use indexmap::IndexMap;

use crate::summary::{FileSummary, ResultLabel};

const STYLE: &str = r"
    table { border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; }
    th, td { border: 1px solid #ccc; padding: 8px; text-align: center; }
    th { background-color: #f2f2f2; }
    td.filename-col { text-align: left; }
";

const COLUMNS: [&str; 10] = [
    "Week",
    "User",
    "File (commits)",
    "Latest commit",
    "Status",
    "Mean changed lines (+/-)",
    "Similarity",
    "Coding time",
    "Result",
    "LOC",
];

fn result_style(result: ResultLabel) -> &'static str {
    match result {
        ResultLabel::Fail => "background-color: #ffdddd;",
        ResultLabel::Warning => "background-color: #fffacc;",
        ResultLabel::Success => "background-color: #ddffdd;",
    }
}

/// Render rows grouped by week then user, merging the group cells.
pub fn render_html(summaries: &[FileSummary], title: &str) -> String {
    let mut groups: IndexMap<(&str, &str), Vec<&FileSummary>> = IndexMap::new();
    for row in summaries {
        groups
            .entry((row.week_label.as_str(), row.user.as_str()))
            .or_default()
            .push(row);
    }

    let title = escape(title);
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h2>{title}</h2>\n<table>\n<thead>\n<tr>"
    );
    for column in COLUMNS {
        let _ = write!(html, "<th>{column}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for ((week, user), rows) in &groups {
        for (index, row) in rows.iter().enumerate() {
            html.push_str("<tr>");
            if index == 0 {
                let span = rows.len();
                let _ = write!(
                    html,
                    "<td rowspan='{span}'>{}</td><td rowspan='{span}'>{}</td>",
                    escape(week),
                    escape(user)
                );
            }
            push_row_cells(&mut html, row);
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn push_row_cells(html: &mut String, row: &FileSummary) {
    let _ = write!(
        html,
        "<td class='filename-col'><a href=\"{}\" target=\"_blank\">{} ({})</a></td>",
        escape(&row.url),
        escape(&row.filename),
        row.commit_count
    );
    let _ = write!(
        html,
        "<td>{}</td><td>{}</td><td>{} ({}/{})</td><td>{}</td><td>{}</td>",
        row.last_commit_display(),
        row.status,
        row.total_changes_mean,
        row.additions_mean,
        row.deletions_mean,
        row.similarity_display(),
        row.coding_duration
    );
    let _ = write!(
        html,
        "<td style='{}'>{}</td><td>{}</td>",
        result_style(row.result),
        row.result,
        row.loc
    );
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
