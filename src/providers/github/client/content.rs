use log::{debug, warn};
use url::Url;

use super::core::GitHubClient;

impl GitHubClient {
    /// Raw file URL at `{raw}/{owner}/{repo}/{branch}/{path}`.
    pub fn raw_file_url(&self, owner: &str, repo: &str, branch: &str, path: &str) -> Option<Url> {
        let mut url = self.raw_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend([owner, repo, branch])
            .extend(path.split('/'));
        Some(url)
    }

    /// Fetch a file's raw text at the head of `branch`.
    ///
    /// Any failure, including transport errors, yields `None`.
    pub async fn fetch_raw(&self, owner: &str, repo: &str, branch: &str, path: &str) -> Option<String> {
        let url = self.raw_file_url(owner, repo, branch, path)?;
        let request = self.auth_request(self.client.get(url));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetching {path} from {owner}/{repo}@{branch} failed: {e}");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!("{path} is not available at {owner}/{repo}@{branch} ({status})");
            return None;
        }

        match response.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Reading {path} from {owner}/{repo}@{branch} failed: {e}");
                None
            }
        }
    }
}

/// Newline count plus one, so an empty file still counts as one line.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}
