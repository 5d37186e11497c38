pub mod traits;
pub mod rss_atom;
pub mod article_fetcher;

pub use traits::{ArticleFetcher, EntryIter, FeedReader};
pub use rss_atom::{FeedEntries, RssFeedReader};
pub use article_fetcher::HttpArticleFetcher;

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::errors::{ScanError, ScanResult};

/// Blocking client shared by the feed reader and the article fetcher
pub fn build_client(timeout: Duration, user_agent: &str) -> ScanResult<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

pub(crate) fn request_error(url: &Url, err: reqwest::Error) -> ScanError {
    let reason = if err.is_timeout() {
        format!("timed out ({})", err)
    } else {
        err.to_string()
    };

    ScanError::Fetch {
        url: url.to_string(),
        reason,
    }
}

/// GET a URL and return the body, treating non-2xx as a failure
pub(crate) fn get_success(client: &Client, url: &Url) -> ScanResult<reqwest::blocking::Response> {
    let response = client
        .get(url.clone())
        .send()
        .map_err(|e| request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScanError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}
