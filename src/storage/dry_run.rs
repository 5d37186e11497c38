use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{Config, CsvMode, ARTICLES_DIR_NAME};
use crate::domain::MatchRecord;
use crate::errors::ScanResult;
use crate::storage::traits::{CorpusSink, RecordOutcome};
use crate::storage::{corpus_file_stem, recorded_files};

/// Keeps matches in memory instead of writing them out.
///
/// Links the existing CSV already lists come back as
/// [`RecordOutcome::AlreadyRecorded`], the same as a real append run.
#[derive(Debug, Default)]
pub struct DryRunSink {
    recorded: HashSet<String>,
    records: Vec<(MatchRecord, PathBuf)>,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> ScanResult<Self> {
        Self::open(&config.output_dir, &config.csv_name, config.csv_mode)
    }

    /// Read-only view of the corpus a real run would write to
    pub fn open(output_dir: &Path, csv_name: &str, mode: CsvMode) -> ScanResult<Self> {
        let recorded = match mode {
            CsvMode::Append => recorded_files(&output_dir.join(csv_name))?,
            CsvMode::Overwrite => HashSet::new(),
        };
        Ok(Self {
            recorded,
            records: Vec::new(),
        })
    }

    /// Matches a real run would write, with the corpus file each would go to
    pub fn records(&self) -> &[(MatchRecord, PathBuf)] {
        &self.records
    }
}

impl CorpusSink for DryRunSink {
    fn record(&mut self, record: &MatchRecord, _text: &str) -> ScanResult<RecordOutcome> {
        let file_name = format!("{}.txt", corpus_file_stem(&record.link));
        let relative = format!("{}/{}", ARTICLES_DIR_NAME, file_name);
        let text_file = Path::new(ARTICLES_DIR_NAME).join(file_name);

        if !self.recorded.insert(relative) {
            return Ok(RecordOutcome::AlreadyRecorded { text_file });
        }

        self.records.push((record.clone(), text_file.clone()));
        Ok(RecordOutcome::Written { text_file })
    }
}
