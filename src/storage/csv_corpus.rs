use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, CsvMode, ARTICLES_DIR_NAME};
use crate::domain::MatchRecord;
use crate::errors::{ScanError, ScanResult};
use crate::storage::traits::{CorpusSink, RecordOutcome};

/// Hex characters of the link hash kept in corpus file names
const HASH_LEN: usize = 16;

/// One line of the CSV summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    pub title: String,
    pub link: String,
    pub published: String,
    pub matched_keywords: String,
    pub category: String,
    pub text_file: String,
}

impl CsvRow {
    pub const HEADERS: [&'static str; 6] = [
        "title",
        "link",
        "published",
        "matched_keywords",
        "category",
        "text_file",
    ];

    pub fn from_record(record: &MatchRecord, text_file: &str) -> Self {
        Self {
            title: record.title.clone(),
            link: record.link.to_string(),
            published: record.published_display(),
            matched_keywords: record.keywords_joined(),
            category: record.category.as_str().to_string(),
            text_file: text_file.to_string(),
        }
    }
}

/// File stem for an article's corpus file.
///
/// `<id>_<hash>` for `/news/<id>` links, `<hash>` otherwise, where `<hash>` is
/// the start of the link's SHA-256.
pub fn corpus_file_stem(link: &Url) -> String {
    let digest = format!("{:x}", Sha256::digest(link.as_str().as_bytes()));
    let hash = &digest[..HASH_LEN];

    let news_id = link.path_segments().and_then(|segments| {
        let segments: Vec<&str> = segments.collect();
        segments
            .windows(2)
            .find(|w| w[0] == "news" && !w[1].is_empty() && w[1].bytes().all(|b| b.is_ascii_digit()))
            .map(|w| w[1].to_string())
    });

    match news_id {
        Some(id) => format!("{}_{}", id, hash),
        None => hash.to_string(),
    }
}

/// Read back a CSV summary written by [`CsvCorpusWriter`]
pub fn read_rows(csv_path: &Path) -> ScanResult<Vec<CsvRow>> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let rows = reader.deserialize().collect::<Result<Vec<CsvRow>, _>>()?;
    Ok(rows)
}

/// `text_file` values already listed in a CSV summary. Empty when the CSV
/// does not exist yet.
pub fn recorded_files(csv_path: &Path) -> ScanResult<HashSet<String>> {
    match fs::metadata(csv_path) {
        Ok(meta) if meta.len() > 0 => {}
        Ok(_) => return Ok(HashSet::new()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(ScanError::write(csv_path, e)),
    }

    Ok(read_rows(csv_path)?
        .into_iter()
        .map(|row| row.text_file)
        .collect())
}

/// Encode one CSV line in memory so it reaches the file in a single write
fn encode_line<F>(write: F) -> ScanResult<Vec<u8>>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write(&mut writer)?;
    writer.into_inner().map_err(|e| ScanError::Io(e.into_error()))
}

/// Append-only writer for the CSV summary and the per-article text files.
///
/// Opened once per run. Rows are encoded in memory and written to the CSV
/// whole, so nothing is left buffered once `record` returns.
pub struct CsvCorpusWriter {
    output_dir: PathBuf,
    articles_dir: PathBuf,
    csv_path: PathBuf,
    file: File,
    /// `text_file` values the CSV already has a row for
    recorded: HashSet<String>,
}

impl CsvCorpusWriter {
    pub fn from_config(config: &Config) -> ScanResult<Self> {
        Self::open(&config.output_dir, &config.csv_name, config.csv_mode)
    }

    pub fn open(output_dir: &Path, csv_name: &str, mode: CsvMode) -> ScanResult<Self> {
        let articles_dir = output_dir.join(ARTICLES_DIR_NAME);
        let csv_path = output_dir.join(csv_name);

        fs::create_dir_all(&articles_dir).map_err(|e| ScanError::write(&articles_dir, e))?;

        let (file, recorded) = match mode {
            CsvMode::Append => {
                let recorded = recorded_files(&csv_path)?;
                let file = OpenOptions::new().create(true).append(true).open(&csv_path);
                (file, recorded)
            }
            CsvMode::Overwrite => {
                clear_corpus_files(&articles_dir)?;
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(&csv_path);
                (file, HashSet::new())
            }
        };
        let mut file = file.map_err(|e| ScanError::write(&csv_path, e))?;

        let needs_header = file
            .metadata()
            .map_err(|e| ScanError::write(&csv_path, e))?
            .len()
            == 0;

        if needs_header {
            let header = encode_line(|w| w.write_record(CsvRow::HEADERS))?;
            file.write_all(&header)
                .map_err(|e| ScanError::write(&csv_path, e))?;
        }

        info!(
            csv = %csv_path.display(),
            mode = ?mode,
            rows = recorded.len(),
            "Opened corpus output"
        );

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            articles_dir,
            csv_path,
            file,
            recorded,
        })
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn articles_dir(&self) -> &Path {
        &self.articles_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn append_row(&mut self, row: &CsvRow) -> ScanResult<()> {
        let line = encode_line(|w| w.serialize(row))?;
        self.file
            .write_all(&line)
            .map_err(|e| ScanError::write(&self.csv_path, e))
    }
}

impl CorpusSink for CsvCorpusWriter {
    fn record(&mut self, record: &MatchRecord, text: &str) -> ScanResult<RecordOutcome> {
        let file_name = format!("{}.txt", corpus_file_stem(&record.link));
        let path = self.articles_dir.join(&file_name);
        let relative = format!("{}/{}", ARTICLES_DIR_NAME, file_name);

        if self.recorded.contains(&relative) {
            debug!(path = %path.display(), "Corpus file already recorded");
            return Ok(RecordOutcome::AlreadyRecorded { text_file: path });
        }

        let created = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let written = file.write_all(text.as_bytes()).and_then(|_| file.sync_all());
                drop(file);
                if let Err(e) = written {
                    discard(&path);
                    return Err(ScanError::write(&path, e));
                }
                true
            }
            // Left by an earlier run without a row in this CSV; keep it as is
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                warn!(path = %path.display(), "Corpus file has no CSV row, adding one");
                false
            }
            Err(e) => return Err(ScanError::write(&path, e)),
        };

        // The row goes in only once its text file is complete
        if let Err(e) = self.append_row(&CsvRow::from_record(record, &relative)) {
            if created {
                discard(&path);
            }
            return Err(e);
        }

        self.recorded.insert(relative);
        Ok(RecordOutcome::Written { text_file: path })
    }
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %e, "Failed to remove partial corpus file");
    }
}

fn clear_corpus_files(articles_dir: &Path) -> ScanResult<()> {
    let entries = fs::read_dir(articles_dir).map_err(|e| ScanError::write(articles_dir, e))?;

    for entry in entries {
        let path = entry.map_err(|e| ScanError::write(articles_dir, e))?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            fs::remove_file(&path).map_err(|e| ScanError::write(&path, e))?;
        }
    }

    Ok(())
}
