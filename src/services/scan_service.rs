use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{ArticleDocument, FeedEntry};
use crate::errors::{ErrorKind, ScanResult};
use crate::extract;
use crate::matcher::KeywordMatcher;
use crate::sources::{ArticleFetcher, EntryIter, FeedReader};
use crate::storage::{CorpusSink, RecordOutcome};

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Stop after this many feed entries
    pub max_items: Option<usize>,
    /// Pause between article requests
    pub request_delay: Duration,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub duplicates: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub scanned: usize,
    pub matched: usize,
    pub written: usize,
    pub already_recorded: usize,
}

impl RunSummary {
    pub fn skipped(&self) -> usize {
        self.fetch_failures + self.parse_failures
    }
}

/// Feed → fetch → extract → match → record, one entry at a time.
pub struct ScanService<R: FeedReader, F: ArticleFetcher> {
    reader: R,
    fetcher: F,
    matcher: KeywordMatcher,
    options: ScanOptions,
}

impl<R: FeedReader, F: ArticleFetcher> ScanService<R, F> {
    pub fn new(reader: R, fetcher: F, matcher: KeywordMatcher, options: ScanOptions) -> Self {
        Self {
            reader,
            fetcher,
            matcher,
            options,
        }
    }

    /// Walk the whole feed.
    ///
    /// Feed failures and sink failures abort the run. Article fetch and
    /// extraction failures are logged and the entry is skipped.
    pub fn run<S: CorpusSink + ?Sized>(&self, sink: &mut S) -> ScanResult<RunSummary> {
        let entries = self.read_feed()?;
        self.process(entries, sink)
    }

    pub fn read_feed(&self) -> ScanResult<EntryIter> {
        self.reader.entries()
    }

    pub fn process<S: CorpusSink + ?Sized>(
        &self,
        entries: EntryIter,
        sink: &mut S,
    ) -> ScanResult<RunSummary> {
        let limit = self.options.max_items.unwrap_or(usize::MAX);

        let mut summary = RunSummary::default();
        let mut seen_links = HashSet::new();

        for entry in entries.take(limit) {
            summary.entries += 1;

            if !seen_links.insert(entry.link.clone()) {
                debug!(url = %entry.link, "Duplicate link in feed");
                summary.duplicates += 1;
                continue;
            }

            if summary.entries > 1 && !self.options.request_delay.is_zero() {
                thread::sleep(self.options.request_delay);
            }

            info!(n = summary.entries, title = %entry.title, url = %entry.link, "Fetching article");

            let document = match self.fetch_document(&entry) {
                Ok(document) => document,
                Err(e) if e.is_recoverable() => {
                    warn!(title = %entry.title, url = %entry.link, error = %e, "Skipping article");
                    match e.kind() {
                        ErrorKind::Parse => summary.parse_failures += 1,
                        _ => summary.fetch_failures += 1,
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };
            summary.scanned += 1;

            let hits = self.matcher.scan(&document.plain_text);
            let Some(record) = hits.into_record(&entry) else {
                debug!(url = %entry.link, "No relevant keywords");
                continue;
            };

            summary.matched += 1;
            info!(
                url = %entry.link,
                category = %record.category,
                keywords = %record.keywords_joined(),
                "Keyword hit"
            );

            match sink.record(&record, &document.plain_text)? {
                RecordOutcome::Written { .. } => summary.written += 1,
                RecordOutcome::AlreadyRecorded { text_file } => {
                    info!(url = %entry.link, path = %text_file.display(), "Already in corpus");
                    summary.already_recorded += 1;
                }
            }
        }

        Ok(summary)
    }

    fn fetch_document(&self, entry: &FeedEntry) -> ScanResult<ArticleDocument> {
        let raw_html = self.fetcher.fetch(&entry.link)?;
        let plain_text = extract::html_to_text(&raw_html)?;
        Ok(ArticleDocument::new(entry.link.clone(), raw_html, plain_text))
    }
}
