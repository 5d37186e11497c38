use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::errors::ScanResult;
use crate::sources::traits::ArticleFetcher;
use crate::sources::{get_success, request_error};

pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ArticleFetcher for HttpArticleFetcher {
    fn fetch(&self, url: &Url) -> ScanResult<String> {
        let response = get_success(&self.client, url)?;
        let html = response.text().map_err(|e| request_error(url, e))?;

        debug!(%url, bytes = html.len(), "Fetched article");
        Ok(html)
    }
}
