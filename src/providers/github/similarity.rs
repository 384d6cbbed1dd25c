use std::path::{Path, PathBuf};

use log::debug;
use similar::TextDiff;

use super::aggregate::round2;

/// Character-level match ratio on a 0-100 scale, rounded to 2 decimals.
pub fn similarity_ratio(local: &str, remote: &str) -> f64 {
    let ratio = TextDiff::from_chars(local, remote).ratio();
    round2(f64::from(ratio) * 100.0).clamp(0.0, 100.0)
}

/// Local reference solutions mirroring the tracked directory.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    root: PathBuf,
    directory: String,
}

impl ReferenceSet {
    pub fn new(root: &Path, directory: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            directory: directory.to_string(),
        }
    }

    pub fn reference_path(&self, remote_path: &str) -> Option<PathBuf> {
        let relative = remote_path.strip_prefix(&self.directory)?;
        Some(self.root.join(relative))
    }

    /// Score `remote` against the matching reference file.
    ///
    /// `None` when there is no reference file or no remote content; a score
    /// of zero means the comparison ran and nothing matched.
    pub async fn score(&self, remote_path: &str, remote: Option<&str>) -> Option<f64> {
        let path = self.reference_path(remote_path)?;
        let local = match tokio::fs::read_to_string(&path).await {
            Ok(local) => local,
            Err(e) => {
                debug!("No reference for {remote_path} at {}: {e}", path.display());
                return None;
            }
        };

        Some(similarity_ratio(&local, remote?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_inputs_score_100() {
        let code = "function add(a, b) {\n  return a + b;\n}\n";

        assert!((similarity_ratio(code, code) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_inputs_score_low() {
        let score = similarity_ratio("aaaaaaaa", "bbbbbbbb");

        assert!(score < 1.0);
        assert!(score >= 0.0);
    }

    #[test]
    fn test_partial_match_is_bounded() {
        let score = similarity_ratio("let x = 1;", "let y = 2;");

        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn test_empty_inputs_score_100() {
        assert!((similarity_ratio("", "") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reference_path_strips_tracked_directory() {
        let references = ReferenceSet::new(Path::new("lib"), "week08/");

        assert_eq!(
            references.reference_path("week08/nodescript/07_es6/es07.js"),
            Some(PathBuf::from("lib/nodescript/07_es6/es07.js"))
        );
        assert_eq!(references.reference_path("other/es07.js"), None);
    }

    #[tokio::test]
    async fn test_missing_reference_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let references = ReferenceSet::new(dir.path(), "W3/");

        let score = references.score("W3/absent.js", Some("code")).await;

        assert_eq!(score, None);
    }

    #[tokio::test]
    async fn test_missing_remote_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "code").unwrap();
        let references = ReferenceSet::new(dir.path(), "W3/");

        assert_eq!(references.score("W3/a.js", None).await, None);
        assert_eq!(references.score("W3/a.js", Some("code")).await, Some(100.0));
    }
}
