//! End-to-end generation runs
//!
//! The first test drives the real GitHub and list clients against a local
//! HTTP server; the second uses the in-memory hosting provider and checks
//! the rendered document in detail.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use filterlist_index::app::hosting::{ContentEntry, Contents, Release, ReleaseAsset};
use filterlist_index::app::{
    Coordinator, CoordinatorConfig, GitHubClient, ListClient, ListSource, MockHosting, Repository,
};
use filterlist_index::errors::{FetchError, FetchResult};

fn read_document(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).unwrap();
    let json = text
        .strip_prefix("jsonp(")
        .and_then(|rest| rest.strip_suffix(')'))
        .expect("output is wrapped in jsonp(...)");
    serde_json::from_str(json).unwrap()
}

fn repo_json(owner: &str, stars: u64, license: &str) -> Value {
    json!({
        "name": "filtrite",
        "owner": { "login": owner },
        "license": { "spdx_id": license },
        "stargazers_count": stars,
        "created_at": (Utc::now() - Duration::days(90)).to_rfc3339()
    })
}

async fn serve(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn serve_text(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_generate_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();
    let fresh = (Utc::now() - Duration::hours(6)).to_rfc3339();

    serve(&server, "/repos/xarantolus/filtrite", repo_json("xarantolus", 30, "MIT")).await;
    Mock::given(method("GET"))
        .and(path("/repos/xarantolus/filtrite/forks"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("friend", 4, "MIT"),
            repo_json("stranger", 9, "GPL-3.0")
        ])))
        .mount(&server)
        .await;

    for owner in ["xarantolus", "friend"] {
        serve(
            &server,
            &format!("/repos/{}/filtrite/contents/lists", owner),
            json!([{
                "name": "bromite-extended.txt",
                "type": "file",
                "size": 64,
                "download_url": format!("{}/raw/{}/bromite-extended.txt", base, owner)
            }]),
        )
        .await;
        serve(
            &server,
            &format!("/repos/{}/filtrite/releases/latest", owner),
            json!({
                "tag_name": "latest",
                "assets": [{ "name": "bromite-extended.dat", "size": 2048, "updated_at": fresh }]
            }),
        )
        .await;
    }

    serve_text(
        &server,
        "/raw/xarantolus/bromite-extended.txt",
        &format!("# main lists\n{base}/f/easylist.txt\n{base}/f/untitled-list.txt\n"),
    )
    .await;
    serve_text(
        &server,
        "/raw/friend/bromite-extended.txt",
        &format!("{base}/f/untitled-list.txt\n\n{base}/f/easylist.txt\n"),
    )
    .await;
    serve_text(
        &server,
        "/f/easylist.txt",
        "[Adblock Plus 2.0]\n! Version: 1\n! Title: EasyList\n||ads.example^\n",
    )
    .await;
    serve_text(&server, "/f/untitled-list.txt", "||tracker.example^\n").await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("filterlists_jsonp.js");

    let hosting = Arc::new(
        GitHubClient::with_bases("test-token", base.as_str(), Url::parse(&base).unwrap()).unwrap(),
    );
    let source = Arc::new(ListClient::new().unwrap());
    let config = CoordinatorConfig::default()
        .with_output_path(&output)
        .with_snapshot_dir(dir.path().join("snapshots"))
        .with_worker_count(2);

    let summary = Coordinator::new(config, hosting, source).run().await.unwrap();
    assert_eq!(summary.repositories_checked, 3);
    assert_eq!(summary.manifests_collected, 2);
    assert_eq!(summary.manifests_retained, 1);
    assert_eq!(summary.unique_urls, 2);

    let document = read_document(&output);
    let lists = document["lists"].as_array().unwrap();
    assert_eq!(lists.len(), 1);

    let list = &lists[0];
    assert_eq!(list["display_name"], "Bromite Extended");
    assert_eq!(list["repo_owner"], "xarantolus");
    assert_eq!(list["stars"], 30);
    assert_eq!(
        list["filter_file_url"],
        format!("{}/xarantolus/filtrite/releases/latest/download/bromite-extended.dat", base)
    );

    let titles: Vec<&str> = list["urls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["EasyList", "Untitled List"]);

    for snapshot in ["lists.json", "lists_deduplicated.json", "titles.json"] {
        assert!(dir.path().join("snapshots").join(snapshot).exists());
    }
}

struct StaticSource {
    lists: HashMap<String, Vec<String>>,
    titles: HashMap<String, String>,
}

#[async_trait]
impl ListSource for StaticSource {
    async fn fetch_urls(&self, url: &str) -> FetchResult<Vec<String>> {
        self.lists.get(url).cloned().ok_or_else(|| FetchError::ServerError {
            url: url.to_string(),
            status: 404,
        })
    }

    async fn fetch_title(&self, url: &str) -> FetchResult<String> {
        self.titles.get(url).cloned().ok_or(FetchError::NoTitle)
    }
}

fn eligible(owner: &str, stars: u64) -> Repository {
    Repository::new(owner, "filtrite")
        .with_license("MIT")
        .with_stars(stars)
        .with_created_at(Utc::now() - Duration::days(60))
}

fn publish(hosting: MockHosting, owner: &str, files: &[&str], age: Duration) -> MockHosting {
    let entries = files
        .iter()
        .map(|file| ContentEntry::file(*file, 10, format!("https://raw.example/{}/{}", owner, file)))
        .collect();
    let assets = files
        .iter()
        .map(|file| ReleaseAsset {
            name: file.replace(".txt", ".dat"),
            size: 512,
            updated_at: Utc::now() - age,
        })
        .collect();

    hosting
        .with_contents(owner, "filtrite", "lists", Contents::Directory(entries))
        .with_release(
            owner,
            "filtrite",
            Release {
                tag_name: "latest".to_string(),
                assets,
            },
        )
}

#[tokio::test]
async fn test_generate_with_mock_hosting() {
    let hosting = MockHosting::new()
        .with_repository(eligible("xarantolus", 12))
        .with_fork("xarantolus", "filtrite", eligible("alpha", 1))
        .with_fork("xarantolus", "filtrite", eligible("beta", 7))
        .with_fork("xarantolus", "filtrite", eligible("stale", 99));
    let hosting = publish(hosting, "xarantolus", &["german.txt"], Duration::days(1));
    let hosting = publish(hosting, "alpha", &["privacy.txt"], Duration::days(2));
    let hosting = publish(hosting, "beta", &["german-copy.txt", "social.txt"], Duration::days(3));
    let hosting = publish(hosting, "stale", &["old.txt"], Duration::days(30));

    let lists: HashMap<String, Vec<String>> = [
        ("xarantolus/german.txt", vec!["https://l.example/de.txt", "https://l.example/ads.txt"]),
        ("alpha/privacy.txt", vec!["https://l.example/track.txt"]),
        ("beta/german-copy.txt", vec!["https://l.example/ads.txt", "https://l.example/de.txt"]),
        ("beta/social.txt", vec!["https://l.example/social.txt", "https://l.example/ads.txt"]),
        ("stale/old.txt", vec!["https://l.example/old.txt"]),
    ]
    .into_iter()
    .map(|(file, urls)| {
        (
            format!("https://raw.example/{}", file),
            urls.into_iter().map(String::from).collect(),
        )
    })
    .collect();
    let titles: HashMap<String, String> = [
        ("https://l.example/de.txt", "German Filters"),
        ("https://l.example/ads.txt", "Ads"),
        ("https://l.example/social.txt", "  "),
    ]
    .into_iter()
    .map(|(url, title)| (url.to_string(), title.to_string()))
    .collect();

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("index.js");
    let config = CoordinatorConfig::default().with_output_path(&output);

    let summary = Coordinator::new(
        config,
        Arc::new(hosting),
        Arc::new(StaticSource { lists, titles }),
    )
    .run()
    .await
    .unwrap();
    assert_eq!(summary.repositories_used, 3);
    assert_eq!(summary.duplicates_removed(), 1);

    let document = read_document(&output);
    assert!(document["date"].as_str().is_some());

    let names: Vec<&str> = document["lists"]
        .as_array()
        .unwrap()
        .iter()
        .map(|list| list["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["German", "Social", "Privacy"]);

    let german = &document["lists"][0]["urls"];
    assert_eq!(german[0]["title"], "Ads");
    assert_eq!(german[1]["title"], "German Filters");

    let social = &document["lists"][1]["urls"];
    assert_eq!(social[0]["title"], "Ads");
    assert_eq!(social[1]["title"], "Unknown");
    assert_eq!(social[1]["url"], "https://l.example/social.txt");

    let privacy = &document["lists"][2]["urls"];
    assert_eq!(privacy[0]["title"], "Track");
}
