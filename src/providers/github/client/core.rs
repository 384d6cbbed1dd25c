use reqwest::Client;
use url::Url;

use crate::auth::Token;
use crate::error::{AuditError, Result};

pub struct GitHubClient {
    pub client: Client,
    pub api_url: Url,
    pub raw_url: Url,
    pub token: Option<Token>,
}

impl GitHubClient {
    pub fn new(api_url: &str, raw_url: &str, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("hwaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuditError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = parse_base_url(api_url)
            .map_err(|e| AuditError::Config(format!("Invalid API base URL: {e}")))?;
        let raw_url = parse_base_url(raw_url)
            .map_err(|e| AuditError::Config(format!("Invalid raw content base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            raw_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    pub fn repo_url(&self, owner: &str, repo: &str) -> Result<Url> {
        self.api_url
            .join(&format!("repos/{owner}/{repo}/"))
            .map_err(|e| AuditError::Config(format!("Invalid repository URL: {e}")))
    }
}

/// Parses a base URL so that relative joins append to its path.
fn parse_base_url(base: &str) -> std::result::Result<Url, url::ParseError> {
    if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_url_on_public_api() {
        let client =
            GitHubClient::new("https://api.github.com", "https://raw.githubusercontent.com", None)
                .unwrap();

        let url = client.repo_url("computer-sunmoon", "homework-W3-jungbini").unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/computer-sunmoon/homework-W3-jungbini/"
        );
    }

    #[test]
    fn test_repo_url_keeps_enterprise_prefix() {
        let client = GitHubClient::new(
            "https://git.example.edu/api/v3",
            "https://git.example.edu/raw",
            None,
        )
        .unwrap();

        let url = client.repo_url("course", "homework").unwrap();

        assert_eq!(url.as_str(), "https://git.example.edu/api/v3/repos/course/homework/");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = GitHubClient::new("not a url", "https://raw.githubusercontent.com", None);

        assert!(matches!(result, Err(AuditError::Config(_))));
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let client = GitHubClient::new(
            "https://api.github.com",
            "https://raw.githubusercontent.com",
            Some(Token::from("")),
        )
        .unwrap();

        assert!(client.token.is_none());
    }
}
