use url::Url;

use crate::domain::FeedEntry;
use crate::errors::ScanResult;

/// Lazily converted feed entries, in feed order
pub type EntryIter = Box<dyn Iterator<Item = FeedEntry>>;

#[cfg_attr(test, mockall::automock)]
pub trait FeedReader {
    /// Fetch and parse the feed. Errors here abort the run.
    fn entries(&self) -> ScanResult<EntryIter>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ArticleFetcher {
    /// Download the raw HTML behind an entry link
    fn fetch(&self, url: &Url) -> ScanResult<String>;
}
