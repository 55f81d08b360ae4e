//! Run statistics

use std::path::PathBuf;
use std::time::Duration;

/// What a generation run produced
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Reference repository plus its forks
    pub repositories_checked: usize,
    /// Repositories that contributed at least one manifest
    pub repositories_used: usize,
    /// Manifests collected before deduplication
    pub manifests_collected: usize,
    /// Manifests left after deduplication
    pub manifests_retained: usize,
    /// Distinct filter list URLs
    pub unique_urls: usize,
    /// URLs that received a title
    pub titles_resolved: usize,
    /// Where the index was written
    pub output_path: PathBuf,
    /// Wall time of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Manifests dropped as duplicates
    pub fn duplicates_removed(&self) -> usize {
        self.manifests_collected - self.manifests_retained
    }

    /// URLs shown as "Unknown"
    pub fn untitled_urls(&self) -> usize {
        self.unique_urls.saturating_sub(self.titles_resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_counts() {
        let summary = RunSummary {
            manifests_collected: 7,
            manifests_retained: 5,
            unique_urls: 10,
            titles_resolved: 8,
            ..Default::default()
        };
        assert_eq!(summary.duplicates_removed(), 2);
        assert_eq!(summary.untitled_urls(), 2);
    }
}
