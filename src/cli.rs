use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use crate::config::{self, AuditConfig, RosterFormat, WeekTable};
use crate::error::AuditError;
use crate::orchestrator::audit_week;
use crate::report::{write_reports, ReportFormats};

#[derive(Parser)]
#[command(name = "hwaudit")]
#[command(author, version, about = "Weekly homework commit audit", long_about = None)]
pub struct Cli {
    /// Week label to audit (prompts for a selection when omitted)
    #[arg(short, long)]
    week: Option<String>,

    /// Week table with `label,start_date,end_date` lines
    #[arg(long, default_value = "week_information.txt")]
    weeks_file: PathBuf,

    /// Roster of students
    #[arg(short, long, default_value = "users_account.txt")]
    roster_file: PathBuf,

    /// Column layout of the roster file
    #[arg(long, value_enum, default_value_t = RosterFormat::EmailToken)]
    roster_format: RosterFormat,

    /// File holding a token shared by every student (required for `id-name`)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Organisation owning the homework repositories
    #[arg(long, env = "HWAUDIT_ORG", default_value = "computer-sunmoon")]
    org: String,

    /// Branch whose head is used for line counts and similarity
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Tracked directory prefix (defaults to `<week>/`)
    #[arg(short, long)]
    directory: Option<String>,

    /// Local reference solutions, laid out like the tracked directory
    #[arg(long, default_value = "lib")]
    reference_dir: PathBuf,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Raw file content base URL
    #[arg(long, default_value = "https://raw.githubusercontent.com")]
    raw_url: String,

    /// Directory the reports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Count each file's first commit too
    #[arg(long, default_value_t = false)]
    include_first_commit: bool,

    /// Delay between commit detail requests, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Offset of the week table's local time from UTC, in hours
    #[arg(long, default_value_t = 9, allow_negative_numbers = true)]
    utc_offset_hours: i32,

    /// Also write a JSON dump of the summary rows
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Pretty print the JSON dump
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let utc_offset = config::utc_offset_hours(self.utc_offset_hours)?;
        let weeks = config::load_weeks(&self.weeks_file, utc_offset)?;
        if weeks.is_empty() {
            return Err(AuditError::Config(format!(
                "week table '{}' has no valid entries",
                self.weeks_file.display()
            ))
            .into());
        }

        let shared_token = self
            .token_file
            .as_deref()
            .map(config::load_token)
            .transpose()?;
        let roster = config::load_roster(&self.roster_file, self.roster_format, shared_token.as_ref())?;

        let label = match &self.week {
            Some(label) => label.clone(),
            None => prompt_week(&weeks)?,
        };
        let window = weeks.get(&label)?;

        let audit_config = AuditConfig {
            api_url: self.api_url.clone(),
            raw_url: self.raw_url.clone(),
            org: self.org.clone(),
            branch: self.branch.clone(),
            directory: self.directory.clone(),
            reference_root: self.reference_dir.clone(),
            request_delay: Duration::from_millis(self.delay_ms),
            exclude_first_commit: !self.include_first_commit,
        };

        info!(
            "Auditing {} students for {} ({} to {})",
            roster.len(),
            window.label,
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        );

        let outcome = audit_week(&audit_config, &roster, window).await;

        for failure in &outcome.failures {
            warn!(
                "Failed: {} ({}): {}",
                failure.student, failure.repository, failure.reason
            );
        }

        if outcome.summaries.is_empty() {
            warn!("No student produced commit data for {label}; no report written");
            return Ok(());
        }

        let formats = ReportFormats {
            json: self.json,
            pretty: self.pretty,
        };
        write_reports(&outcome.summaries, &label, &self.output_dir, formats)?;

        info!(
            "{} rows from {} of {} students",
            outcome.summaries.len(),
            roster.len() - outcome.failures.len() - outcome.students_without_data.len(),
            roster.len()
        );

        Ok(())
    }
}

fn prompt_week(weeks: &WeekTable) -> Result<String> {
    let labels = weeks.labels();
    let mut stdout = io::stdout();

    writeln!(stdout, "Available weeks:")?;
    for (index, label) in labels.iter().enumerate() {
        writeln!(stdout, "  {}. {label}", index + 1)?;
    }
    write!(stdout, "Select a week number: ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    Ok(parse_selection(&input, &labels)?.to_string())
}

fn parse_selection<'a>(input: &str, labels: &[&'a str]) -> crate::error::Result<&'a str> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| labels.get(index).copied())
        .ok_or_else(|| {
            AuditError::Config(format!(
                "invalid week selection '{trimmed}', expected 1 to {}",
                labels.len()
            ))
        })
}
