use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::{ScanError, ScanResult};
use crate::matcher::MatchMode;

pub const DEFAULT_FEED_URL: &str = "https://www.malaysiakini.com/rss/en/news.rss";
pub const DEFAULT_BASE_URL: &str = "https://www.malaysiakini.com";
pub const DEFAULT_OUTPUT_DIR: &str = "malaysiakini_corpus";
pub const DEFAULT_CSV_NAME: &str = "malaysiakini_keyword_hits.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_USER_AGENT: &str = "AcademicKeywordScraper/1.0";

/// Name of the directory holding one `.txt` file per matching article
pub const ARTICLES_DIR_NAME: &str = "articles";

/// What happens to an existing CSV summary when a run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvMode {
    /// Keep existing rows and corpus files, add new ones after them
    #[default]
    Append,
    /// Start a fresh corpus: truncate the CSV and clear old corpus files
    Overwrite,
}

impl FromStr for CsvMode {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(CsvMode::Append),
            "overwrite" => Ok(CsvMode::Overwrite),
            _ => Err(ScanError::Config(format!(
                "Unknown CSV mode '{}' (expected 'append' or 'overwrite')",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: Url,
    pub base_url: Url,
    pub output_dir: PathBuf,
    pub csv_name: String,
    pub request_timeout: Duration,
    pub request_delay: Duration,
    pub max_items: Option<usize>,
    pub match_mode: MatchMode,
    pub csv_mode: CsvMode,
    pub user_agent: String,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Load `.env` into the process environment. Variables already set win.
    pub fn load_dotenv() {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();
    }

    pub fn from_env() -> ScanResult<Self> {
        Self::load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables take their defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> ScanResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed_url = parse_url(
            "NEWSSCAN_FEED_URL",
            &get("NEWSSCAN_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
        )?;
        let base_url = parse_url(
            "NEWSSCAN_BASE_URL",
            &get("NEWSSCAN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        )?;

        let output_dir = PathBuf::from(
            get("NEWSSCAN_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        );
        let csv_name = get("NEWSSCAN_CSV_NAME").unwrap_or_else(|| DEFAULT_CSV_NAME.to_string());

        let timeout_secs: u64 = match get("NEWSSCAN_TIMEOUT_SECS") {
            Some(v) => parse_value("NEWSSCAN_TIMEOUT_SECS", &v)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ScanError::Config(
                "NEWSSCAN_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        let delay_ms: u64 = match get("NEWSSCAN_DELAY_MS") {
            Some(v) => parse_value("NEWSSCAN_DELAY_MS", &v)?,
            None => DEFAULT_DELAY_MS,
        };

        let max_items = get("NEWSSCAN_MAX_ITEMS")
            .map(|v| parse_value::<usize>("NEWSSCAN_MAX_ITEMS", &v))
            .transpose()?;

        let match_mode = get("NEWSSCAN_MATCH_MODE")
            .map(|v| v.parse::<MatchMode>())
            .transpose()?
            .unwrap_or_default();

        let csv_mode = get("NEWSSCAN_CSV_MODE")
            .map(|v| v.parse::<CsvMode>())
            .transpose()?
            .unwrap_or_default();

        let user_agent =
            get("NEWSSCAN_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Self {
            feed_url,
            base_url,
            output_dir,
            csv_name,
            request_timeout: Duration::from_secs(timeout_secs),
            request_delay: Duration::from_millis(delay_ms),
            max_items,
            match_mode,
            csv_mode,
            user_agent,
        })
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv_name)
    }

    pub fn articles_dir(&self) -> PathBuf {
        self.output_dir.join(ARTICLES_DIR_NAME)
    }
}

fn parse_url(name: &str, value: &str) -> ScanResult<Url> {
    Url::parse(value.trim()).map_err(|e| ScanError::InvalidUrl(format!("{}={}: {}", name, value, e)))
}

fn parse_value<T>(name: &str, value: &str) -> ScanResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ScanError::Config(format!("{}={}: {}", name, value, e)))
}
