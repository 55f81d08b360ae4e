//! Rendering the index consumed by the web page
//!
//! The page loads a script that calls `jsonp(...)` with one JSON document
//! describing every manifest and the titles of the lists it contains.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::enrich::TitleMapping;
use crate::app::manifest::Manifest;
use crate::app::snapshot::write_atomic;
use crate::constants::files;
use crate::constants::titles::UNKNOWN_TITLE;
use crate::errors::{OutputError, OutputResult};

/// One filter list with its display title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTitle {
    pub url: String,
    pub title: String,
}

/// A manifest as presented on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentableList {
    pub display_name: String,
    /// Sorted by title, then URL
    pub urls: Vec<UrlTitle>,
    pub filter_file_url: String,
    pub stars: u64,
    pub repo_owner: String,
    pub repo_name: String,
    pub list_url: String,
}

/// The complete index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    /// Generation time
    pub date: DateTime<Utc>,
    pub lists: Vec<PresentableList>,
}

impl OutputDocument {
    /// Total number of list entries across all manifests
    pub fn entry_count(&self) -> usize {
        self.lists.iter().map(|list| list.urls.len()).sum()
    }
}

/// Build the presentable document, keeping the manifest order
///
/// URLs without a usable title are labelled "Unknown".
pub fn present(manifests: &[Manifest], titles: &TitleMapping, date: DateTime<Utc>) -> OutputDocument {
    let lists = manifests
        .iter()
        .map(|manifest| {
            let mut urls: Vec<UrlTitle> = manifest
                .urls
                .iter()
                .map(|url| UrlTitle {
                    url: url.clone(),
                    title: titles
                        .get(url)
                        .map(|title| title.trim())
                        .filter(|title| !title.is_empty())
                        .unwrap_or(UNKNOWN_TITLE)
                        .to_string(),
                })
                .collect();
            urls.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.url.cmp(&b.url)));

            PresentableList {
                display_name: manifest.name.clone(),
                urls,
                filter_file_url: manifest.filter_file_url.clone(),
                stars: manifest.stars,
                repo_owner: manifest.repo_owner.clone(),
                repo_name: manifest.repo_name.clone(),
                list_url: manifest.list_url.clone(),
            }
        })
        .collect();

    OutputDocument { date, lists }
}

/// Serialize the document wrapped in the JSONP callback
pub fn render_jsonp(document: &OutputDocument) -> OutputResult<String> {
    let json = serde_json::to_string(document)?;
    Ok(format!("{}{}{}", files::JSONP_PREFIX, json, files::JSONP_SUFFIX))
}

/// Render and atomically write the document to `path`
///
/// # Errors
///
/// Returns `OutputError::NoLists` for a document without lists, so a failed
/// run never replaces a previously published index with an empty one.
pub async fn write_output(path: &Path, document: &OutputDocument) -> OutputResult<()> {
    if document.lists.is_empty() {
        return Err(OutputError::NoLists);
    }

    let rendered = render_jsonp(document)?;
    write_atomic(path, rendered.as_bytes()).await?;

    tracing::info!(
        "Wrote {} lists with {} entries to {}",
        document.lists.len(),
        document.entry_count(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn manifest(name: &str, urls: &[&str]) -> Manifest {
        Manifest {
            name: name.to_string(),
            filter_file_url: format!("https://dl.example/{}.dat", name),
            stars: 2,
            repo_owner: "owner".to_string(),
            repo_name: "repo".to_string(),
            list_url: format!("https://raw.example/{}.txt", name),
            urls: urls.iter().map(|u| u.to_string()).collect(),
        }
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_present_sorts_by_title_then_url() {
        let manifests = vec![manifest(
            "Main",
            &["https://c.example/", "https://a.example/", "https://b.example/", "https://d.example/"],
        )];
        let mut titles = TitleMapping::new();
        titles.insert("https://a.example/".to_string(), "Zeta".to_string());
        titles.insert("https://b.example/".to_string(), "Alpha".to_string());
        titles.insert("https://c.example/".to_string(), "Alpha".to_string());
        titles.insert("https://d.example/".to_string(), "   ".to_string());

        let document = present(&manifests, &titles, date());
        let urls: Vec<(&str, &str)> = document.lists[0]
            .urls
            .iter()
            .map(|u| (u.title.as_str(), u.url.as_str()))
            .collect();

        assert_eq!(
            urls,
            vec![
                ("Alpha", "https://b.example/"),
                ("Alpha", "https://c.example/"),
                ("Unknown", "https://d.example/"),
                ("Zeta", "https://a.example/"),
            ]
        );
    }

    #[test]
    fn test_present_keeps_manifest_order_and_fields() {
        let manifests = vec![
            manifest("Second", &["https://x.example/"]),
            manifest("First", &["https://y.example/"]),
        ];
        let document = present(&manifests, &TitleMapping::new(), date());

        assert_eq!(document.lists[0].display_name, "Second");
        assert_eq!(document.lists[1].display_name, "First");
        assert_eq!(document.lists[0].urls[0].title, "Unknown");
        assert_eq!(document.lists[1].filter_file_url, "https://dl.example/First.dat");
        assert_eq!(document.entry_count(), 2);
    }

    #[test]
    fn test_render_jsonp_shape() {
        let document = present(&[manifest("One", &["https://x.example/"])], &TitleMapping::new(), date());
        let rendered = render_jsonp(&document).unwrap();

        assert!(rendered.starts_with("jsonp({"));
        assert!(rendered.ends_with("})"));

        let json: serde_json::Value =
            serde_json::from_str(&rendered["jsonp(".len()..rendered.len() - 1]).unwrap();
        assert_eq!(json["date"], "2024-01-02T03:04:05Z");
        assert_eq!(json["lists"][0]["display_name"], "One");
        assert_eq!(json["lists"][0]["urls"][0]["url"], "https://x.example/");
        assert_eq!(json["lists"][0]["stars"], 2);
    }

    #[tokio::test]
    async fn test_write_output_refuses_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");
        let document = OutputDocument {
            date: date(),
            lists: Vec::new(),
        };

        assert!(matches!(
            write_output(&path, &document).await,
            Err(OutputError::NoLists)
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_write_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.js");
        let document = present(&[manifest("One", &["https://x.example/"])], &TitleMapping::new(), date());

        write_output(&path, &document).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_jsonp(&document).unwrap());
    }
}
