//! Benchmark records and their CSV / JSON reports.

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Column header of the CSV report.
pub const CSV_HEADER: &str = "algorithm,n,mean_ms,min_ms,max_ms,rss_kb,estimated_kb,verified";

/// Measurements for one strategy at one size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Strategy name.
    pub algorithm: String,
    /// Matrix dimension.
    pub n: usize,
    /// Mean wall time over the timed repetitions.
    pub mean_ms: f64,
    /// Fastest repetition.
    pub min_ms: f64,
    /// Slowest repetition.
    pub max_ms: f64,
    /// Resident-memory growth across the timed loop.
    pub rss_kb: u64,
    /// Estimated peak working set of the strategy.
    pub estimated_kb: u64,
    /// Output matched the naive reference within tolerance.
    pub verified: bool,
    /// Largest absolute difference from the reference.
    pub max_diff: f64,
}

impl BenchmarkRecord {
    /// One CSV line, without a trailing newline.
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{:.3},{:.3},{:.3},{},{},{}",
            self.algorithm,
            self.n,
            self.mean_ms,
            self.min_ms,
            self.max_ms,
            self.rss_kb,
            self.estimated_kb,
            self.verified
        )
    }
}

/// Write the CSV report (header plus one line per record).
pub fn write_csv<W: Write>(records: &[BenchmarkRecord], mut out: W) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for record in records {
        writeln!(out, "{}", record.to_csv_line())?;
    }
    out.flush()
}

/// Write the CSV report to `path`, replacing any existing file.
pub fn write_csv_file(records: &[BenchmarkRecord], path: &Path) -> io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(records, io::BufWriter::new(file))
}

/// Serialize records as pretty JSON.
pub fn to_json(records: &[BenchmarkRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
