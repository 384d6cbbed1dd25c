use std::time::Duration;

use async_trait::async_trait;
use futures::{pin_mut, TryStreamExt};
use log::info;

use crate::auth::Token;
use crate::config::{AuditConfig, WeekWindow};
use crate::error::Result;
use crate::providers::github::aggregate::aggregate;
use crate::providers::github::client::GitHubClient;
use crate::providers::github::filter::{build_records, exclude_first_commit};
use crate::providers::github::similarity::ReferenceSet;
use crate::providers::HeadContent;
use crate::summary::FileSummary;

pub struct GitHubProvider {
    pub client: GitHubClient,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub request_delay: Duration,
}

/// One student's slice of a week.
#[derive(Debug, Clone, Copy)]
pub struct WeekQuery<'a> {
    /// Commit list `author` filter
    pub author: &'a str,
    /// Name shown in the report
    pub user: &'a str,
    pub window: &'a WeekWindow,
    pub directory: &'a str,
    pub exclude_first_commit: bool,
}

impl GitHubProvider {
    pub fn new(config: &AuditConfig, repo: String, token: Option<Token>) -> Result<Self> {
        let client = GitHubClient::new(&config.api_url, &config.raw_url, token)?;

        Ok(Self {
            client,
            owner: config.org.clone(),
            repo,
            branch: config.branch.clone(),
            request_delay: config.request_delay,
        })
    }

    pub async fn collect_week(
        &self,
        query: WeekQuery<'_>,
        references: &ReferenceSet,
    ) -> Result<Vec<FileSummary>> {
        info!(
            "Collecting {} commits by {} in {}/{}",
            query.window.label, query.author, self.owner, self.repo
        );

        let history = self.commit_history(query.author);
        pin_mut!(history);

        let mut commits = 0usize;
        let mut records = Vec::new();
        while let Some(commit) = history.try_next().await? {
            commits += 1;
            records.extend(build_records(&commit, query.user, query.directory, query.window));
        }

        info!(
            "{}/{}: {commits} commits fetched, {} file changes in window",
            self.owner,
            self.repo,
            records.len()
        );

        if query.exclude_first_commit {
            records = exclude_first_commit(records);
        }

        if records.is_empty() {
            return Ok(Vec::new());
        }

        Ok(aggregate(&records, &query.window.label, self, references).await)
    }
}

#[async_trait]
impl HeadContent for GitHubProvider {
    async fn fetch_head(&self, path: &str) -> Option<String> {
        self.client
            .fetch_raw(&self.owner, &self.repo, &self.branch, path)
            .await
    }
}
