mod commits;
mod content;
mod core;

pub use commits::GitHubCommitDto;
pub use content::line_count;
pub use self::core::GitHubClient;
