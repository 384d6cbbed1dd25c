use log::{error, info, warn};

use crate::config::{AuditConfig, RosterEntry, WeekWindow};
use crate::error::Result;
use crate::providers::github::{GitHubProvider, ReferenceSet, WeekQuery};
use crate::summary::FileSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFailure {
    pub student: String,
    pub repository: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub summaries: Vec<FileSummary>,
    pub failures: Vec<StudentFailure>,
    pub students_without_data: Vec<String>,
}

/// Audit every roster entry for one week, one student at a time.
///
/// A failing student is logged and recorded; the rest are still processed.
pub async fn audit_week(
    config: &AuditConfig,
    roster: &[RosterEntry],
    window: &WeekWindow,
) -> RunOutcome {
    let directory = config.tracked_directory(&window.label);
    let references = ReferenceSet::new(&config.reference_root, &directory);
    let mut outcome = RunOutcome::default();

    for (index, student) in roster.iter().enumerate() {
        let repository = AuditConfig::repository_name(&window.label, &student.user_id);
        info!(
            "[{}/{}] Auditing {} ({}/{})",
            index + 1,
            roster.len(),
            student.display_name,
            config.org,
            repository
        );

        match audit_student(config, student, window, &directory, &repository, &references).await {
            Ok(rows) if rows.is_empty() => {
                warn!("No commit data for {} in {repository}", student.display_name);
                outcome.students_without_data.push(student.display_name.clone());
            }
            Ok(rows) => {
                info!("{}: {} files summarized", student.display_name, rows.len());
                outcome.summaries.extend(rows);
            }
            Err(e) => {
                error!("Audit failed for {} ({repository}): {e}", student.display_name);
                outcome.failures.push(StudentFailure {
                    student: student.display_name.clone(),
                    repository,
                    reason: e.to_string(),
                });
            }
        }
    }

    outcome
}

async fn audit_student(
    config: &AuditConfig,
    student: &RosterEntry,
    window: &WeekWindow,
    directory: &str,
    repository: &str,
    references: &ReferenceSet,
) -> Result<Vec<FileSummary>> {
    let provider = GitHubProvider::new(config, repository.to_string(), Some(student.token.clone()))?;
    let query = WeekQuery {
        author: &student.author,
        user: &student.display_name,
        window,
        directory,
        exclude_first_commit: config.exclude_first_commit,
    };

    provider.collect_week(query, references).await
}
