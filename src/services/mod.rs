pub mod scan_service;

pub use scan_service::{RunSummary, ScanOptions, ScanService};
