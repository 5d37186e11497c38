mod common;

use std::fs;
use std::path::Path;
use std::time::Duration;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{article_page, newsscan_cmd, rss_feed, Route, TestServer};

fn csv_lines(out_dir: &Path) -> Vec<String> {
    fs::read_to_string(out_dir.join("hits.csv"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn corpus_files(out_dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = fs::read_dir(out_dir.join("articles"))
        .unwrap()
        .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
        .collect();
    files.sort();
    files
}

#[test]
fn test_matching_entry_produces_row_and_file() {
    let server = TestServer::bind();
    let feed = rss_feed(&[(
        "Understanding Depression in Youth",
        server.url("/news/762983"),
    )]);
    let body = "Health workers say depression among secondary school students is rising.";
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/762983", &article_page(body)),
    ]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done. 1 matching articles saved"));

    let lines = csv_lines(out.path());
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "title,link,published,matched_keywords,category,text_file"
    );
    assert!(lines[1].starts_with("Understanding Depression in Youth,"));
    assert!(lines[1].contains(",depression,mental-health,articles/762983_"));

    let files = corpus_files(out.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].contains(body));
}

#[test]
fn test_non_matching_entry_produces_nothing() {
    let server = TestServer::bind();
    let feed = rss_feed(&[("Harimau Malaya draw", server.url("/news/1"))]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html(
            "/news/1",
            &article_page("The national side held Uruguay to a goalless draw."),
        ),
    ]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("No new matches found"));

    assert_eq!(csv_lines(out.path()).len(), 1);
    assert!(corpus_files(out.path()).is_empty());
}

#[test]
fn test_timed_out_article_is_skipped_and_run_continues() {
    let server = TestServer::bind();
    let feed = rss_feed(&[
        ("First story", server.url("/news/1")),
        ("Second story", server.url("/news/2")),
        ("Third story", server.url("/news/3")),
    ]);
    let page = article_page("Counselling services for anxiety were expanded this year.");
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/1", &page),
        Route::html("/news/2", &page).with_delay(Duration::from_secs(4)),
        Route::html("/news/3", &page),
    ]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .env("NEWSSCAN_TIMEOUT_SECS", "1")
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping article"))
        .stderr(predicate::str::contains("/news/2"))
        .stdout(predicate::str::contains("1 skipped"));

    let lines = csv_lines(out.path());
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("First story,"));
    assert!(lines[2].starts_with("Third story,"));
    assert_eq!(corpus_files(out.path()).len(), 2);
}

#[test]
fn test_http_error_article_is_skipped() {
    let server = TestServer::bind();
    let feed = rss_feed(&[
        ("Gone", server.url("/news/404")),
        ("Pride march", server.url("/news/5")),
    ]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/5", &article_page("A transgender activist spoke at the march.")),
    ]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("HTTP 404"));

    let lines = csv_lines(out.path());
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",transgender,lgbt,"));
}

#[test]
fn test_second_run_appends_without_duplicating() {
    let server = TestServer::bind();
    let feed = rss_feed(&[("Stress at work", server.url("/news/7"))]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/7", &article_page("Workplace stress is a growing concern.")),
    ]);

    let out = TempDir::new().unwrap();

    for _ in 0..2 {
        newsscan_cmd()
            .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
            .env("NEWSSCAN_BASE_URL", &base)
            .env("NEWSSCAN_OUTPUT_DIR", out.path())
            .arg("run")
            .assert()
            .success();
    }

    assert_eq!(csv_lines(out.path()).len(), 2);
    assert_eq!(corpus_files(out.path()).len(), 1);
}

#[test]
fn test_dry_run_writes_nothing() {
    let server = TestServer::bind();
    let feed = rss_feed(&[("Stress at work", server.url("/news/7"))]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/7", &article_page("Workplace stress is a growing concern.")),
    ]);

    let out = TempDir::new().unwrap();
    let out_dir = out.path().join("corpus");

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", &out_dir)
        .arg("run")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] [mental-health] Stress at work"))
        .stdout(predicate::str::contains("Would record 1 articles"));

    assert!(!out_dir.exists());
}

#[test]
fn test_dry_run_after_run_reports_nothing_new() {
    let server = TestServer::bind();
    let feed = rss_feed(&[("Stress at work", server.url("/news/7"))]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/7", &article_page("Workplace stress is a growing concern.")),
    ]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .assert()
        .success();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]").not())
        .stdout(predicate::str::contains("1 already recorded"))
        .stdout(predicate::str::contains("Would record 0 articles"));

    assert_eq!(csv_lines(out.path()).len(), 2);
}

#[test]
fn test_log_level_from_dotenv_file() {
    let server = TestServer::bind();
    let feed = rss_feed(&[("Stress at work", server.url("/news/7"))]);
    let base = server.serve(vec![
        Route::rss("/feed.rss", &feed),
        Route::html("/news/7", &article_page("Workplace stress is a growing concern.")),
    ]);

    let work = TempDir::new().unwrap();
    fs::write(work.path().join(".env"), "RUST_LOG=debug\n").unwrap();

    newsscan_cmd()
        .current_dir(work.path())
        .env_remove("RUST_LOG")
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_BASE_URL", &base)
        .env("NEWSSCAN_OUTPUT_DIR", work.path().join("corpus"))
        .arg("run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Fetched article"));
}

#[test]
fn test_feed_error_status_fails_run() {
    let server = TestServer::bind();
    let base = server.serve(vec![
        Route::rss("/feed.rss", "unavailable").with_status(503),
    ]);

    let out = TempDir::new().unwrap();
    let out_dir = out.path().join("corpus");

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_OUTPUT_DIR", &out_dir)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 503"));

    assert!(!out_dir.exists());
}

#[test]
fn test_unparseable_feed_fails_run() {
    let server = TestServer::bind();
    let base = server.serve(vec![Route::html(
        "/feed.rss",
        "<html><body>Not a feed</body></html>",
    )]);

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("{}/feed.rss", base))
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Feed parsing failed"));
}

#[test]
fn test_unreachable_feed_fails_run() {
    // Bind and drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let out = TempDir::new().unwrap();

    newsscan_cmd()
        .env("NEWSSCAN_FEED_URL", format!("http://127.0.0.1:{}/feed.rss", port))
        .env("NEWSSCAN_OUTPUT_DIR", out.path())
        .env("NEWSSCAN_TIMEOUT_SECS", "2")
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
