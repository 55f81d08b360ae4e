//! Manifest deduplication
//!
//! Many forks ship unchanged copies of the upstream manifests. Two
//! manifests are duplicates when they contain exactly the same URLs, in any
//! order; the first one in input order is kept.

use std::collections::HashSet;

use tracing::debug;

use super::types::Manifest;

/// Bidirectional containment of two URL sets
fn same_url_set(a: &HashSet<String>, b: &HashSet<String>) -> bool {
    a.is_subset(b) && b.is_subset(a)
}

/// Drop every manifest whose URL set equals that of an earlier one
///
/// Survivors keep their relative order, so callers that sort by popularity
/// first keep the most popular copy.
pub fn deduplicate(manifests: Vec<Manifest>) -> Vec<Manifest> {
    let mut accepted: Vec<(HashSet<String>, Manifest)> = Vec::with_capacity(manifests.len());

    for candidate in manifests {
        let urls: HashSet<String> = candidate.urls.iter().cloned().collect();

        let duplicate_of = accepted
            .iter()
            .find(|(kept, _)| same_url_set(kept, &urls))
            .map(|(_, kept)| kept);

        match duplicate_of {
            Some(kept) => {
                debug!(
                    "Dropping {:?} from {}: same lists as {:?} from {}",
                    candidate.name,
                    candidate.repository(),
                    kept.name,
                    kept.repository()
                );
            }
            None => accepted.push((urls, candidate)),
        }
    }

    accepted.into_iter().map(|(_, manifest)| manifest).collect()
}

/// Every URL of the given manifests, once, in first-seen order
pub fn unique_urls(manifests: &[Manifest]) -> Vec<String> {
    let mut seen = HashSet::new();
    manifests
        .iter()
        .flat_map(|manifest| manifest.urls.iter())
        .filter(|url| seen.insert(url.as_str()))
        .cloned()
        .collect()
}
