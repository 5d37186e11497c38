use feed_rs::model::Entry;
use feed_rs::parser;
use reqwest::blocking::Client;
use tracing::{info, warn};
use url::Url;

use crate::domain::FeedEntry;
use crate::errors::{ScanError, ScanResult};
use crate::sources::get_success;
use crate::sources::request_error;
use crate::sources::traits::{EntryIter, FeedReader};

/// Reads an RSS or Atom feed over HTTP
pub struct RssFeedReader {
    client: Client,
    feed_url: Url,
    base_url: Url,
}

impl RssFeedReader {
    pub fn new(client: Client, feed_url: Url, base_url: Url) -> Self {
        Self {
            client,
            feed_url,
            base_url,
        }
    }

    fn fetch_bytes(&self) -> ScanResult<Vec<u8>> {
        let response = get_success(&self.client, &self.feed_url)?;
        let bytes = response
            .bytes()
            .map_err(|e| request_error(&self.feed_url, e))?;

        Ok(bytes.to_vec())
    }

    /// Parse raw feed bytes. Relative entry links are resolved against `base_url`.
    pub fn parse_bytes(bytes: &[u8], base_url: &Url) -> ScanResult<FeedEntries> {
        let parsed = parser::parse(bytes).map_err(|e| ScanError::FeedParse(e.to_string()))?;

        Ok(FeedEntries {
            entries: parsed.entries.into_iter(),
            base_url: base_url.clone(),
        })
    }
}

impl FeedReader for RssFeedReader {
    fn entries(&self) -> ScanResult<EntryIter> {
        info!(url = %self.feed_url, "Fetching feed");

        let bytes = self.fetch_bytes()?;
        let entries = Self::parse_bytes(&bytes, &self.base_url)?;

        if entries.is_empty() {
            warn!(url = %self.feed_url, "Feed has no entries");
        } else {
            info!(count = entries.len(), "Parsed feed");
        }
        Ok(Box::new(entries))
    }
}

/// Feed entries converted to [`FeedEntry`] one at a time.
///
/// Entries without a usable link are logged and skipped.
pub struct FeedEntries {
    entries: std::vec::IntoIter<Entry>,
    base_url: Url,
}

impl FeedEntries {
    /// Raw entries left, including any that will be skipped
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }
}

impl Iterator for FeedEntries {
    type Item = FeedEntry;

    fn next(&mut self) -> Option<FeedEntry> {
        for entry in self.entries.by_ref() {
            if let Some(converted) = convert_entry(entry, &self.base_url) {
                return Some(converted);
            }
        }
        None
    }
}

fn convert_entry(entry: Entry, base_url: &Url) -> Option<FeedEntry> {
    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".to_string());

    // Prefer the alternate link; RSS <link> comes through without a rel
    let href = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .or_else(|| {
            // Some feeds only carry a permalink guid
            Url::parse(&entry.id)
                .ok()
                .filter(|u| matches!(u.scheme(), "http" | "https"))
                .map(|u| u.to_string())
        });

    let Some(href) = href else {
        warn!(%title, "Skipping feed entry without a link");
        return None;
    };

    let link = match base_url.join(href.trim()) {
        Ok(link) => link,
        Err(e) => {
            warn!(%title, %href, error = %e, "Skipping feed entry with an invalid link");
            return None;
        }
    };

    let published = entry.published.or(entry.updated);

    Some(FeedEntry::new(title, link).with_published(published))
}
