use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),

    // Network errors
    #[error("Request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("Text extraction failed: {0}")]
    Extract(String),

    // Output errors
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classes used to decide whether a failure aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Parse,
    Write,
    Config,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Fetch { .. } | ScanError::HttpStatus { .. } | ScanError::Http(_) => {
                ErrorKind::Fetch
            }
            ScanError::FeedParse(_) | ScanError::Extract(_) => ErrorKind::Parse,
            ScanError::Write { .. } | ScanError::Csv(_) | ScanError::Io(_) => ErrorKind::Write,
            ScanError::Config(_) | ScanError::InvalidUrl(_) | ScanError::Pattern(_) => {
                ErrorKind::Config
            }
        }
    }

    /// Article-level failures of these kinds skip the entry instead of aborting
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Fetch | ErrorKind::Parse)
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Write {
            path: path.into(),
            source,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
