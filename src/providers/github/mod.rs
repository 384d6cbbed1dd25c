mod aggregate;
mod client;
mod filter;
mod provider;
mod similarity;

pub use provider::{GitHubProvider, WeekQuery};
pub use similarity::ReferenceSet;
