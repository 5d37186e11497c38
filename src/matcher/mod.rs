//! Case-insensitive keyword scanning over extracted article text.
//!
//! Two matching policies are supported:
//!
//! - [`MatchMode::WordBoundary`] (default): a term only matches when the
//!   characters on either side are not letters, digits or `_`. `gay` does not
//!   match inside `Uruguay`, while `lgbtq+` and `self-harm` match as written.
//! - [`MatchMode::Substring`]: any case-insensitive occurrence matches.
//!
//! Whitespace inside multi-word terms ("substance abuse") matches any run of
//! whitespace in the text.

use std::collections::BTreeSet;

use regex::{RegexSet, RegexSetBuilder};

use crate::domain::{Category, FeedEntry, KeywordList, MatchRecord};
use crate::errors::{ScanError, ScanResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    WordBoundary,
    Substring,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::WordBoundary => "word",
            MatchMode::Substring => "substring",
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word" | "word-boundary" | "word_boundary" => Ok(MatchMode::WordBoundary),
            "substring" => Ok(MatchMode::Substring),
            _ => Err(ScanError::Config(format!(
                "Unknown match mode '{}' (expected 'word' or 'substring')",
                s
            ))),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keywords found in one text, split by the list they came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub mental_health: BTreeSet<String>,
    pub lgbt: BTreeSet<String>,
}

impl KeywordHits {
    pub fn is_match(&self) -> bool {
        !self.mental_health.is_empty() || !self.lgbt.is_empty()
    }

    pub fn category(&self) -> Option<Category> {
        Category::from_hits(!self.mental_health.is_empty(), !self.lgbt.is_empty())
    }

    /// Union of both lists' hits, sorted
    pub fn keywords(&self) -> BTreeSet<String> {
        self.mental_health.union(&self.lgbt).cloned().collect()
    }

    pub fn into_record(self, entry: &FeedEntry) -> Option<MatchRecord> {
        let category = self.category()?;
        Some(MatchRecord::new(entry, self.keywords(), category))
    }
}

/// Unicode `\w` classes make word-boundary sets large
const PATTERN_SIZE_LIMIT: usize = 64 * (1 << 20);

struct CompiledList {
    terms: Vec<String>,
    set: RegexSet,
}

impl CompiledList {
    fn compile(list: &KeywordList, mode: MatchMode) -> ScanResult<Self> {
        let terms: Vec<String> = list.iter().map(String::from).collect();
        let set = RegexSetBuilder::new(terms.iter().map(|t| term_pattern(t, mode)))
            .case_insensitive(true)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()?;
        Ok(Self { terms, set })
    }

    fn scan(&self, text: &str) -> BTreeSet<String> {
        self.set
            .matches(text)
            .into_iter()
            .map(|i| self.terms[i].clone())
            .collect()
    }
}

fn term_pattern(term: &str, mode: MatchMode) -> String {
    let body = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    match mode {
        MatchMode::WordBoundary => format!(r"(?:^|[^\w])(?:{})(?:[^\w]|$)", body),
        MatchMode::Substring => body,
    }
}

pub struct KeywordMatcher {
    mental_health: CompiledList,
    lgbt: CompiledList,
    mode: MatchMode,
}

impl KeywordMatcher {
    pub fn new(mental_health: &KeywordList, lgbt: &KeywordList, mode: MatchMode) -> ScanResult<Self> {
        Ok(Self {
            mental_health: CompiledList::compile(mental_health, mode)?,
            lgbt: CompiledList::compile(lgbt, mode)?,
            mode,
        })
    }

    /// Matcher over the built-in mental-health and LGBT lists
    pub fn with_default_lists(mode: MatchMode) -> ScanResult<Self> {
        Self::new(&KeywordList::mental_health(), &KeywordList::lgbt(), mode)
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn scan(&self, text: &str) -> KeywordHits {
        KeywordHits {
            mental_health: self.mental_health.scan(text),
            lgbt: self.lgbt.scan(text),
        }
    }
}
