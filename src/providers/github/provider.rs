mod core;
mod history;

pub use self::core::{GitHubProvider, WeekQuery};
