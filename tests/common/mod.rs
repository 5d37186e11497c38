#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use assert_cmd::Command;

#[derive(Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl Route {
    pub fn html(path: &str, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn rss(path: &str, body: &str) -> Self {
        Self {
            content_type: "application/rss+xml",
            ..Self::html(path, body)
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Minimal HTTP/1.1 server, one thread per connection, serving fixed routes
pub struct TestServer {
    listener: TcpListener,
    base: String,
}

impl TestServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        Self { listener, base }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn serve(self, routes: Vec<Route>) -> String {
        let routes = Arc::new(routes);
        let base = self.base.clone();
        let listener = self.listener;

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&routes);
                thread::spawn(move || handle(stream, &routes));
            }
        });

        base
    }
}

fn handle(mut stream: TcpStream, routes: &[Route]) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
            break;
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let route = routes.iter().find(|r| r.path == path).cloned().unwrap_or(Route {
        path: path.to_string(),
        status: 404,
        content_type: "text/plain",
        body: "not found".to_string(),
        delay: Duration::ZERO,
    });

    thread::sleep(route.delay);

    let response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        route.content_type,
        route.body.len(),
        route.body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// RSS document with one `<item>` per (title, link)
pub fn rss_feed(items: &[(&str, String)]) -> String {
    let items: String = items
        .iter()
        .map(|(title, link)| {
            format!(
                "<item><title>{}</title><link>{}</link><pubDate>Thu, 28 Dec 2023 00:00:00 +0000</pubDate></item>",
                title, link
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Test News</title><link>http://localhost/</link><description>Test</description>{}</channel></rss>"#,
        items
    )
}

pub fn article_page(paragraph: &str) -> String {
    format!(
        "<html><body><nav>Home | Sports</nav><article><h1>Story</h1><p>{}</p></article></body></html>",
        paragraph
    )
}

pub fn newsscan_cmd() -> Command {
    let mut cmd = Command::cargo_bin("newsscan").unwrap();
    cmd.env("NEWSSCAN_DELAY_MS", "0")
        .env("NEWSSCAN_CSV_NAME", "hits.csv")
        .env("NEWSSCAN_MATCH_MODE", "word")
        .env("NEWSSCAN_CSV_MODE", "append")
        .env("RUST_LOG", "info")
        .env_remove("NEWSSCAN_MAX_ITEMS");
    cmd
}
