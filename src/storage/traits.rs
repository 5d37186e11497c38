use std::path::PathBuf;

use crate::domain::MatchRecord;
use crate::errors::ScanResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A new CSV row and corpus file were written
    Written { text_file: PathBuf },
    /// The corpus file for this link already exists; nothing was written
    AlreadyRecorded { text_file: PathBuf },
}

/// Destination for matching articles. Every failure is a write failure.
#[cfg_attr(test, mockall::automock)]
pub trait CorpusSink {
    fn record(&mut self, record: &MatchRecord, text: &str) -> ScanResult<RecordOutcome>;
}
