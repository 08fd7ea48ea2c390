//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! cycle end-to-end: cache load, traversal, persistence and run artifacts.

use chrono::Utc;
use docs_mirror::config::{
    Config, CrawlerConfig, ExtractConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use docs_mirror::crawler::{Coordinator, HttpFetcher};
use docs_mirror::output::{Manifest, RunStats};
use docs_mirror::state::CrawlRecord;
use docs_mirror::storage::{FsStorage, Storage};
use docs_mirror::url::record_key;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at `entry_url`
fn create_test_config(
    entry_url: String,
    root_path: Option<&str>,
    output: &Path,
    max_pages: Option<u32>,
    stale_after_secs: Option<u64>,
) -> Config {
    Config {
        site: SiteConfig {
            entry_url,
            root_path: root_path.map(str::to_string),
        },
        crawler: CrawlerConfig {
            max_pages,
            stale_after_secs,
            base_timeout_ms: 2000,
            probe_timeout_ms: 1000,
            max_attempts: 2,
        },
        extract: ExtractConfig::default(),
        user_agent: UserAgentConfig {
            crawler_name: "TestMirror".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            directory: output.display().to_string(),
        },
    }
}

/// Builds a documentation page linking to `links`
fn doc_page(heading: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">{}</a></li>"#, href, href))
        .collect();
    format!(
        r#"<html><head><title>{0}</title></head><body>
        <nav>Site navigation</nav>
        <main><h1>{0}</h1><p>Content of {0}.</p><ul>{1}</ul></main>
        </body></html>"#,
        heading, anchors
    )
}

/// Mounts a page that must be requested exactly `expected` times
async fn mount_page(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected)
        .mount(server)
        .await;
}

async fn run_mirror(config: Config) -> RunStats {
    let fetcher = HttpFetcher::new(&config.user_agent).expect("Failed to build fetcher");
    let storage = FsStorage::from_config(&config.output);
    Coordinator::new(config, fetcher, storage)
        .run()
        .await
        .expect("Mirror run failed")
}

fn read_manifest(output: &Path) -> Manifest {
    let json = std::fs::read_to_string(output.join("manifest.json")).expect("No manifest");
    Manifest::from_json(&json).expect("Malformed manifest")
}

fn record_keys(output: &Path) -> Vec<String> {
    FsStorage::new(output).list_record_keys().unwrap()
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_the_entry() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &["/docs/intro"]), 1).await;
    mount_page(&server, "/docs/intro", doc_page("Intro", &[]), 0).await;

    let entry = format!("{}/docs", base);
    let config = create_test_config(entry.clone(), None, dir.path(), Some(1), None);
    let stats = run_mirror(config).await;

    assert_eq!(stats.fetched_pages, 1);
    assert_eq!(record_keys(dir.path()), vec![record_key(&entry)]);

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest.stats.total_pages, 1);
    assert_eq!(manifest.stats.cached_pages, 0);
    assert_eq!(manifest.visited_urls, vec![entry]);

    let corpus = std::fs::read_to_string(dir.path().join("corpus.md")).unwrap();
    assert!(corpus.contains("# Docs"));
    assert!(corpus.contains("Content of Docs."));
}

#[tokio::test]
async fn test_fresh_record_is_reused_and_its_links_followed() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let cached_url = format!("{}/docs/page1", base);
    let mut storage = FsStorage::new(dir.path());
    storage.initialize().unwrap();
    storage
        .save_page(
            &CrawlRecord {
                url: cached_url.clone(),
                final_url: None,
                title: "Page 1".to_string(),
                heading: "Page 1".to_string(),
                breadcrumb: vec![],
                text: "Cached body".to_string(),
                html: "<p>Cached body</p>".to_string(),
                crawled_at: Utc::now(),
            },
            &doc_page("Page 1", &["/docs/page2", "/docs/page3"]),
            "# Page 1\n\nCached body\n",
        )
        .unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &[]), 1).await;
    mount_page(&server, "/docs/page1", doc_page("Page 1", &[]), 0).await;
    mount_page(&server, "/docs/page2", doc_page("Page 2", &[]), 1).await;
    mount_page(&server, "/docs/page3", doc_page("Page 3", &[]), 1).await;

    let config = create_test_config(
        format!("{}/docs", base),
        None,
        dir.path(),
        Some(5),
        Some(86_400),
    );
    let stats = run_mirror(config).await;

    assert_eq!(stats.cached_pages, 1);
    assert_eq!(stats.fetched_pages, 3);

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest.stats.cached_pages, 1);
    assert!(manifest.visited_urls.contains(&cached_url));

    let corpus = std::fs::read_to_string(dir.path().join("corpus.md")).unwrap();
    let cached = corpus.find("Cached body").unwrap();
    let fetched = corpus.find("Content of Page 2.").unwrap();
    assert!(cached < fetched);
}

#[tokio::test]
async fn test_versioned_page_fetched_when_canonical_is_missing() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_status(&server, "/docs/page", 404, 1).await;
    mount_page(&server, "/docs/12/page", doc_page("Page v12", &["/docs/13/page"]), 1).await;
    mount_page(&server, "/docs/13/page", doc_page("Page v13", &[]), 0).await;

    let versioned = format!("{}/docs/12/page", base);
    let config =
        create_test_config(versioned.clone(), Some("/docs"), dir.path(), Some(10), None);
    let stats = run_mirror(config).await;

    assert_eq!(stats.fetched_pages, 1);
    assert_eq!(stats.suppressed_pages, 1);
    assert_eq!(record_keys(dir.path()), vec![record_key(&versioned)]);

    let manifest = read_manifest(dir.path());
    assert_eq!(manifest.visited_urls, vec![versioned]);
}

#[tokio::test]
async fn test_versioned_link_defers_to_existing_canonical() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &["/docs/12/guide"]), 1).await;
    // One probe plus one content fetch
    mount_page(&server, "/docs/guide", doc_page("Guide", &[]), 2).await;
    mount_page(&server, "/docs/12/guide", doc_page("Guide v12", &[]), 0).await;

    let config = create_test_config(format!("{}/docs", base), None, dir.path(), None, None);
    run_mirror(config).await;

    let keys = record_keys(dir.path());
    assert!(keys.contains(&record_key(&format!("{}/docs/guide", base))));
    assert!(!keys.contains(&record_key(&format!("{}/docs/12/guide", base))));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_the_run() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &["/docs/broken", "/docs/ok"]), 1).await;
    mount_status(&server, "/docs/broken", 503, 2).await;
    mount_page(&server, "/docs/ok", doc_page("Ok", &[]), 1).await;

    let config = create_test_config(format!("{}/docs", base), None, dir.path(), None, None);
    let stats = run_mirror(config).await;

    assert_eq!(stats.fetched_pages, 3);
    assert_eq!(stats.failed_pages, 1);
    assert_eq!(record_keys(dir.path()).len(), 2);

    let manifest = read_manifest(dir.path());
    assert!(manifest
        .visited_urls
        .contains(&format!("{}/docs/broken", base)));
}

#[tokio::test]
async fn test_second_run_is_served_from_cache() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &["/docs/a"]), 1).await;
    mount_page(&server, "/docs/a", doc_page("A", &[]), 1).await;

    let entry = format!("{}/docs", base);
    let first = run_mirror(create_test_config(entry.clone(), None, dir.path(), None, None)).await;
    let second = run_mirror(create_test_config(entry, None, dir.path(), None, None)).await;

    assert_eq!(first.fetched_pages, 2);
    assert_eq!(second.fetched_pages, 0);
    assert_eq!(second.cached_pages, 2);
}

#[tokio::test]
async fn test_zero_threshold_refetches_everything() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, "/docs", doc_page("Docs", &[]), 2).await;

    let entry = format!("{}/docs", base);
    run_mirror(create_test_config(entry.clone(), None, dir.path(), None, Some(0))).await;
    let second = run_mirror(create_test_config(entry, None, dir.path(), None, Some(0))).await;

    assert_eq!(second.fetched_pages, 1);
    assert_eq!(second.cached_pages, 0);
}

#[tokio::test]
async fn test_cached_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs/guide"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/guide/"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/guide/", doc_page("Guide", &["intro"]), 1).await;
    mount_page(&server, "/docs/guide/intro", doc_page("Intro", &[]), 1).await;
    mount_status(&server, "/docs/intro", 404, 0).await;

    let entry = format!("{}/docs/guide", base);
    let first =
        run_mirror(create_test_config(entry.clone(), Some("/docs"), dir.path(), None, None)).await;
    let second = run_mirror(create_test_config(entry, Some("/docs"), dir.path(), None, None)).await;

    assert_eq!(first.fetched_pages, 2);
    assert_eq!(second.fetched_pages, 0);
    assert_eq!(second.failed_pages, 0);
    assert_eq!(second.cached_pages, 2);
}

#[tokio::test]
async fn test_slow_canonical_falls_back_to_versioned_page() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    // Answers well after the 1s canonical check gives up
    Mock::given(method("GET"))
        .and(path("/docs/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(doc_page("Page", &[]), "text/html")
                .set_delay(std::time::Duration::from_millis(1500)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/12/page", doc_page("Page v12", &[]), 1).await;

    let versioned = format!("{}/docs/12/page", base);
    let config = create_test_config(versioned.clone(), Some("/docs"), dir.path(), None, None);
    let stats = run_mirror(config).await;

    assert_eq!(stats.fetched_pages, 1);
    assert_eq!(stats.failed_pages, 0);
    assert_eq!(record_keys(dir.path()), vec![record_key(&versioned)]);
}
