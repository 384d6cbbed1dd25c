use std::collections::VecDeque;

use futures::{stream, Stream};
use log::debug;

use super::core::GitHubProvider;
use crate::error::Result;
use crate::providers::github::client::GitHubCommitDto;

const PER_PAGE: u32 = 100;

struct HistoryCursor {
    page: u32,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl GitHubProvider {
    /// Lazily walk every commit by `author`, yielding full commit details.
    ///
    /// Pages are requested until one comes back empty. Details are fetched one
    /// at a time with `request_delay` between requests; commits whose detail
    /// request fails with a non-success status are skipped.
    pub fn commit_history<'a>(
        &'a self,
        author: &'a str,
    ) -> impl Stream<Item = Result<GitHubCommitDto>> + 'a {
        let cursor = HistoryCursor {
            page: 1,
            pending: VecDeque::new(),
            exhausted: false,
        };

        stream::try_unfold(cursor, move |cursor| self.next_commit(author, cursor))
    }

    async fn next_commit(
        &self,
        author: &str,
        mut cursor: HistoryCursor,
    ) -> Result<Option<(GitHubCommitDto, HistoryCursor)>> {
        loop {
            if let Some(sha) = cursor.pending.pop_front() {
                tokio::time::sleep(self.request_delay).await;
                match self.client.fetch_commit(&self.owner, &self.repo, &sha).await? {
                    Some(commit) => {
                        debug!("Commit {} touches {} files", commit.sha, commit.files.len());
                        return Ok(Some((commit, cursor)));
                    }
                    None => continue,
                }
            }

            if cursor.exhausted {
                return Ok(None);
            }

            let page = self
                .client
                .fetch_commit_list_page(&self.owner, &self.repo, author, cursor.page, PER_PAGE)
                .await?;

            debug!(
                "{}/{} page {}: {} commits",
                self.owner,
                self.repo,
                cursor.page,
                page.len()
            );

            if page.is_empty() {
                cursor.exhausted = true;
            } else {
                cursor.pending.extend(page.into_iter().map(|c| c.sha));
                cursor.page += 1;
            }
        }
    }
}
