//! Integration tests for the crawler
//!
//! These tests run the full driver against wiremock HTTP servers through the
//! real HTTP renderer, covering crawl completion, scope filtering, resume
//! from checkpoint, and checkpoint corruption handling.

use site_corpus::checkpoint::CheckpointStore;
use site_corpus::config::Config;
use site_corpus::render::HttpRenderer;
use site_corpus::{CrawlDriver, CrawlPhase};
use tempfile::TempDir;
use tokio::sync::watch;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.renderer.timeout_secs = 2;
    config.checkpoint.path = dir.path().join("state.json").display().to_string();
    config.output.corpus_path = dir.path().join("llm.txt").display().to_string();
    config.output.visited_log_path = dir.path().join("links_visited.txt").display().to_string();
    config
}

fn new_driver(config: &Config, root: &str, fresh: bool) -> CrawlDriver<HttpRenderer> {
    let renderer = HttpRenderer::new(
        &config.renderer.user_agent,
        std::time::Duration::from_secs(config.renderer.timeout_secs),
    )
    .expect("failed to build renderer");
    let (_tx, rx) = watch::channel(false);
    CrawlDriver::new(
        config.clone(),
        Url::parse(root).expect("bad root"),
        renderer,
        fresh,
        rx,
    )
    .expect("failed to create driver")
}

fn html_page(title: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><h1>{}</h1>{}</body></html>",
        title, title, anchors
    )
}

async fn mount_page(server: &MockServer, at: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body).insert_header(
            "content-type",
            "text/html; charset=utf-8",
        ))
        .expect(expected_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_visits_every_reachable_page_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // / -> page1, page2 (relative and absolute, plus a fragment duplicate)
    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            &[
                "/page1".to_string(),
                format!("{}/page2", base),
                "/page1#section".to_string(),
            ],
        ),
        1,
    )
    .await;
    mount_page(&server, "/page1", html_page("One", &["/".to_string()]), 1).await;
    mount_page(&server, "/page2", html_page("Two", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut driver = new_driver(&config, &format!("{}/", base), false);
    driver.run().await.unwrap();

    assert_eq!(driver.phase(), CrawlPhase::Done);
    let (pending, visited) = driver.frontier().size();
    assert_eq!(pending, 0, "frontier must drain on a finite site");
    assert_eq!(visited, 3);

    // Corpus holds one record per page in breadth-first order
    let corpus = std::fs::read_to_string(dir.path().join("llm.txt")).unwrap();
    assert_eq!(corpus.matches("---\n").count(), 3);
    let home_at = corpus.find(&format!("URL: {}/\n", base)).unwrap();
    let one_at = corpus.find(&format!("URL: {}/page1\n", base)).unwrap();
    assert!(home_at < one_at);
    assert!(corpus.contains("Home"));
    assert!(corpus.contains("One"));
    assert!(corpus.contains("Two"));

    // Visited log has exactly one line per page
    let log = std::fs::read_to_string(dir.path().join("links_visited.txt")).unwrap();
    assert_eq!(log.lines().count(), 3);
}

#[tokio::test]
async fn test_offsite_links_are_excluded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            &[
                "https://definitely-elsewhere.invalid/x".to_string(),
                "/local".to_string(),
            ],
        ),
        1,
    )
    .await;
    mount_page(&server, "/local", html_page("Local", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut driver = new_driver(&config, &format!("{}/", base), false);
    driver.run().await.unwrap();

    let (_, visited) = driver.frontier().size();
    assert_eq!(visited, 2, "the off-site link must never enter the frontier");
}

#[tokio::test]
async fn test_failed_pages_are_recorded_visited_but_not_output() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", &["/missing".to_string(), "/ok".to_string()]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", html_page("Ok", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut driver = new_driver(&config, &format!("{}/", base), false);
    driver.run().await.unwrap();

    let (pending, visited) = driver.frontier().size();
    assert_eq!((pending, visited), (0, 3), "failure must not stop the crawl");

    let corpus = std::fs::read_to_string(dir.path().join("llm.txt")).unwrap();
    assert!(!corpus.contains("/missing"));
    let log = std::fs::read_to_string(dir.path().join("links_visited.txt")).unwrap();
    assert!(!log.contains("/missing"));
}

#[tokio::test]
async fn test_slow_page_times_out_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", &["/slow".to_string(), "/fast".to_string()]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Slow", &[]))
                .insert_header("content-type", "text/html")
                .set_delay(std::time::Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", html_page("Fast", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut driver = new_driver(&config, &format!("{}/", base), false);
    driver.run().await.unwrap();

    let (pending, visited) = driver.frontier().size();
    assert_eq!((pending, visited), (0, 3));

    let corpus = std::fs::read_to_string(dir.path().join("llm.txt")).unwrap();
    assert!(corpus.contains("Fast"));
    assert!(!corpus.contains("Slow"));
}

#[tokio::test]
async fn test_resume_does_not_refetch_visited_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    // expect(1) spans both runs: the resumed crawl must not re-request
    mount_page(&server, "/", html_page("Home", &["/page1".to_string()]), 1).await;
    mount_page(&server, "/page1", html_page("One", &[]), 1).await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut first = new_driver(&config, &format!("{}/", base), false);
    first.run().await.unwrap();

    let mut second = new_driver(&config, &format!("{}/", base), false);
    second.run().await.unwrap();

    let (pending, visited) = second.frontier().size();
    assert_eq!((pending, visited), (0, 2));

    // Output files were appended to, not rewritten
    let corpus = std::fs::read_to_string(dir.path().join("llm.txt")).unwrap();
    assert_eq!(corpus.matches("---\n").count(), 2);
}

#[tokio::test]
async fn test_checkpoint_round_trip_mid_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            &["/a".to_string(), "/b".to_string(), "/c".to_string()],
        ),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut driver = new_driver(&config, &format!("{}/", base), false);

    // Process only the root, then checkpoint
    assert!(driver.step().await.unwrap());
    let snapshot = driver.frontier().snapshot();
    let store = CheckpointStore::new(&config.checkpoint.path);
    store.save(&snapshot).unwrap();

    // The loaded snapshot preserves discovery order exactly
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(
        loaded.pending,
        vec![
            format!("{}/a", base),
            format!("{}/b", base),
            format!("{}/c", base)
        ]
    );
    assert_eq!(loaded.visited, vec![format!("{}/", base)]);
}

#[tokio::test]
async fn test_corrupt_checkpoint_refuses_to_resume() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    std::fs::write(&config.checkpoint.path, b"{ \"version\": 1, \"pend").unwrap();

    let renderer = HttpRenderer::new("test", std::time::Duration::from_secs(1)).unwrap();
    let (_tx, rx) = watch::channel(false);
    let result = CrawlDriver::new(
        config,
        Url::parse("https://a.test/").unwrap(),
        renderer,
        false,
        rx,
    );

    assert!(result.is_err(), "a torn checkpoint must not be resumed");
}

#[tokio::test]
async fn test_inconsistent_checkpoint_refuses_to_resume() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    // queued claims a URL that pending does not hold
    let bad = serde_json::json!({
        "version": 1,
        "saved_at": "2024-01-01T00:00:00Z",
        "root": "https://a.test/",
        "pending": ["https://a.test/x"],
        "visited": [],
        "queued": ["https://a.test/x", "https://a.test/ghost"],
    });
    std::fs::write(&config.checkpoint.path, bad.to_string()).unwrap();

    let renderer = HttpRenderer::new("test", std::time::Duration::from_secs(1)).unwrap();
    let (_tx, rx) = watch::channel(false);
    let result = CrawlDriver::new(
        config,
        Url::parse("https://a.test/").unwrap(),
        renderer,
        false,
        rx,
    );

    assert!(result.is_err());
}
