use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::{AuditError, Result};
use crate::summary::ChangeStatus;

#[derive(Debug, Deserialize)]
pub struct GitHubCommitListDto {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub struct GitHubCommitDto {
    pub sha: String,
    pub html_url: Option<String>,
    pub commit: GitHubCommitMetaDto,
    #[serde(default)]
    pub files: Vec<GitHubFileDto>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubCommitMetaDto {
    pub author: GitHubSignatureDto,
}

#[derive(Debug, Deserialize)]
pub struct GitHubSignatureDto {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GitHubFileDto {
    pub filename: String,
    #[serde(default = "unknown_status")]
    pub status: ChangeStatus,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

fn unknown_status() -> ChangeStatus {
    ChangeStatus::Unknown
}

impl GitHubClient {
    /// Fetch one page of commits authored by `author`.
    ///
    /// A non-success status means the repository or token is wrong, so it is
    /// returned as an error rather than treated as an empty page.
    pub async fn fetch_commit_list_page(
        &self,
        owner: &str,
        repo: &str,
        author: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<GitHubCommitListDto>> {
        let url = self
            .repo_url(owner, repo)?
            .join("commits")
            .map_err(|e| AuditError::Config(format!("Invalid commits URL: {e}")))?;

        let request = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json")
            .query(&[("author", author)])
            .query(&[("page", page), ("per_page", per_page)]);
        let request = self.auth_request(request);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::Api(format!(
                "listing commits of {owner}/{repo} returned {status} ({url}); check the repository address and token"
            )));
        }

        let commits = response.json::<Vec<GitHubCommitListDto>>().await?;
        Ok(commits)
    }

    /// Fetch a single commit with its file list, `None` on a non-success status.
    pub async fn fetch_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Option<GitHubCommitDto>> {
        let url = self
            .repo_url(owner, repo)?
            .join(&format!("commits/{sha}"))
            .map_err(|e| AuditError::Config(format!("Invalid commit URL: {e}")))?;

        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        let request = self.auth_request(request);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Skipping commit {sha} of {owner}/{repo}: detail request returned {status}");
            return Ok(None);
        }

        let commit = response.json::<GitHubCommitDto>().await?;
        Ok(Some(commit))
    }
}
