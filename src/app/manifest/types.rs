//! Core types for manifest processing
//!
//! A manifest is one list file found in one repository: a named set of
//! filter list subscription URLs together with where it came from.

use serde::{Deserialize, Serialize};

/// A named collection of filter list URLs sourced from one repository file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Display name derived from the file name
    pub name: String,

    /// Latest-release download link of the compiled filter file
    pub filter_file_url: String,

    /// Star count of the owning repository
    pub stars: u64,

    /// Account owning the repository
    pub repo_owner: String,

    /// Repository name
    pub repo_name: String,

    /// Raw download URL of the manifest file itself
    pub list_url: String,

    /// Unique subscription URLs, sorted
    pub urls: Vec<String>,
}

impl Manifest {
    /// "owner/name" of the repository this manifest came from
    pub fn repository(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Statistics about parsing one list manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Total lines read
    pub lines_processed: usize,
    /// Empty lines skipped
    pub empty_lines: usize,
    /// Comment lines skipped
    pub comment_lines: usize,
    /// Lines that were not valid URLs
    pub invalid_lines: usize,
    /// Repeated URLs dropped
    pub duplicate_urls: usize,
}

impl ParseStats {
    /// Number of URLs that made it into the result
    pub fn accepted(&self) -> usize {
        self.lines_processed - self.total_skipped()
    }

    /// Get total skipped lines
    pub fn total_skipped(&self) -> usize {
        self.empty_lines + self.comment_lines + self.invalid_lines + self.duplicate_urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_field_names() {
        let manifest = Manifest {
            name: "Bromite Extended".to_string(),
            filter_file_url: "https://github.com/o/r/releases/latest/download/x.dat".to_string(),
            stars: 3,
            repo_owner: "o".to_string(),
            repo_name: "r".to_string(),
            list_url: "https://raw.githubusercontent.com/o/r/master/lists/x.txt".to_string(),
            urls: vec!["https://example.com/a.txt".to_string()],
        };

        let value = serde_json::to_value(&manifest).unwrap();
        for key in [
            "name",
            "filter_file_url",
            "stars",
            "repo_owner",
            "repo_name",
            "list_url",
            "urls",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(manifest.repository(), "o/r");
    }

    #[test]
    fn test_parse_stats_accounting() {
        let stats = ParseStats {
            lines_processed: 10,
            empty_lines: 2,
            comment_lines: 3,
            invalid_lines: 1,
            duplicate_urls: 1,
        };
        assert_eq!(stats.total_skipped(), 7);
        assert_eq!(stats.accepted(), 3);
    }
}
