use std::path::Path;

use clap::ValueEnum;
use log::warn;

use super::read_config_file;
use crate::auth::Token;
use crate::error::{AuditError, Result};

/// Column layout of the roster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RosterFormat {
    /// `email,token`; the user id is the local part of the email
    EmailToken,
    /// `id,token,name`
    IdTokenName,
    /// `id,name`; every student shares the token from `--token-file`
    IdName,
}

impl RosterFormat {
    fn expected(self) -> &'static str {
        match self {
            Self::EmailToken => "email,token",
            Self::IdTokenName => "id,token,name",
            Self::IdName => "id,name",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// Account id used in the repository name
    pub user_id: String,
    /// Value passed as the commit list `author` filter
    pub author: String,
    pub display_name: String,
    pub token: Token,
}

pub fn load_roster(
    path: &Path,
    format: RosterFormat,
    shared_token: Option<&Token>,
) -> Result<Vec<RosterEntry>> {
    let content = read_config_file(path, "roster file")?;
    parse_roster(&content, format, shared_token)
}

pub fn parse_roster(
    content: &str,
    format: RosterFormat,
    shared_token: Option<&Token>,
) -> Result<Vec<RosterEntry>> {
    if format == RosterFormat::IdName && shared_token.is_none() {
        return Err(AuditError::Config(
            "roster format 'id-name' requires --token-file".to_string(),
        ));
    }

    let mut entries = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_roster_line(line, format, shared_token) {
            Some(entry) => entries.push(entry),
            None => warn!(
                "Skipping roster line {}: expected '{}'",
                index + 1,
                format.expected()
            ),
        }
    }

    Ok(entries)
}

fn parse_roster_line(
    line: &str,
    format: RosterFormat,
    shared_token: Option<&Token>,
) -> Option<RosterEntry> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.iter().any(|f| f.is_empty()) {
        return None;
    }

    match (format, fields.as_slice()) {
        (RosterFormat::EmailToken, [email, token]) => {
            let user_id = email.split('@').next().unwrap_or_default().to_string();
            Some(RosterEntry {
                display_name: user_id.clone(),
                user_id,
                author: (*email).to_string(),
                token: Token::from(*token),
            })
        }
        (RosterFormat::IdTokenName, [id, token, name]) => Some(RosterEntry {
            user_id: (*id).to_string(),
            author: (*id).to_string(),
            display_name: (*name).to_string(),
            token: Token::from(*token),
        }),
        (RosterFormat::IdName, [id, name]) => Some(RosterEntry {
            user_id: (*id).to_string(),
            author: (*id).to_string(),
            display_name: (*name).to_string(),
            token: shared_token?.clone(),
        }),
        _ => None,
    }
}

/// Reads a single shared credential; a missing file is fatal.
pub fn load_token(path: &Path) -> Result<Token> {
    let token = Token::from(read_config_file(path, "token file")?.as_str());
    if token.is_empty() {
        return Err(AuditError::Config(format!(
            "token file '{}' is empty",
            path.display()
        )));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_email_token_derives_user_id() {
        let entries = parse_roster(
            "jungbini@sunmoon.ac.kr,ghp_aaa\n",
            RosterFormat::EmailToken,
            None,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "jungbini");
        assert_eq!(entries[0].display_name, "jungbini");
        assert_eq!(entries[0].author, "jungbini@sunmoon.ac.kr");
        assert_eq!(entries[0].token.as_str(), "ghp_aaa");
    }

    #[test]
    fn test_id_token_name_format() {
        let entries = parse_roster(
            "kimcs,ghp_bbb,Kim Chulsoo\nleeyh,ghp_ccc,Lee Younghee\n",
            RosterFormat::IdTokenName,
            None,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].user_id, "leeyh");
        assert_eq!(entries[1].display_name, "Lee Younghee");
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let content = "good@example.com,ghp_1\nmissing-token\n\n,ghp_2\nextra@example.com,ghp_3,oops\n";
        let entries = parse_roster(content, RosterFormat::EmailToken, None).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, "good");
    }

    #[test]
    fn test_id_name_requires_shared_token() {
        let err = parse_roster("kimcs,Kim", RosterFormat::IdName, None).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));

        let token = Token::from("ghp_shared");
        let entries = parse_roster("kimcs,Kim", RosterFormat::IdName, Some(&token)).unwrap();
        assert_eq!(entries[0].token.as_str(), "ghp_shared");
    }

    #[test]
    fn test_load_roster_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_roster(
            &dir.path().join("users_account.txt"),
            RosterFormat::EmailToken,
            None,
        )
        .unwrap_err();

        assert!(err.to_string().contains("roster file"));
    }

    #[test]
    fn test_load_token_trims_and_rejects_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ghp_from_file").unwrap();
        assert_eq!(load_token(file.path()).unwrap().as_str(), "ghp_from_file");

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(load_token(empty.path()).is_err());
    }
}
