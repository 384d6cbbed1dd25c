pub mod github;

use async_trait::async_trait;

/// Source of file contents at the head of the audited branch.
#[async_trait]
pub trait HeadContent {
    /// Raw text of `path`, or `None` if it cannot be retrieved.
    async fn fetch_head(&self, path: &str) -> Option<String>;
}
