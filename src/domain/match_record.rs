use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use url::Url;

use super::{Category, FeedEntry};

/// Separator used for the keyword column of the CSV summary
pub const KEYWORD_SEPARATOR: &str = ";";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub title: String,
    pub link: Url,
    pub published: Option<DateTime<Utc>>,
    pub matched_keywords: BTreeSet<String>,
    pub category: Category,
}

impl MatchRecord {
    pub fn new(entry: &FeedEntry, matched_keywords: BTreeSet<String>, category: Category) -> Self {
        Self {
            title: entry.title.clone(),
            link: entry.link.clone(),
            published: entry.published,
            matched_keywords,
            category,
        }
    }

    pub fn keywords_joined(&self) -> String {
        self.matched_keywords
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(KEYWORD_SEPARATOR)
    }

    pub fn published_display(&self) -> String {
        self.published
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default()
    }
}
