pub mod traits;
pub mod csv_corpus;
pub mod dry_run;

pub use traits::{CorpusSink, RecordOutcome};
pub use csv_corpus::{corpus_file_stem, read_rows, recorded_files, CsvCorpusWriter, CsvRow};
pub use dry_run::DryRunSink;
