use chrono::{DateTime, Utc};
use url::Url;

/// One item from the feed, in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: Url,
    pub published: Option<DateTime<Utc>>,
}

impl FeedEntry {
    pub fn new(title: String, link: Url) -> Self {
        Self {
            title,
            link,
            published: None,
        }
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    /// RFC 3339 timestamp, or an empty string when the feed gave none
    pub fn published_display(&self) -> String {
        self.published
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    }
}
