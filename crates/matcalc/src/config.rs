//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use matcalc_bench::calibration::DEFAULT_CALIBRATION_SIZE;
use matcalc_core::constants::{DEFAULT_REPEATS, DEFAULT_TOLERANCE};
use matcalc_core::error::MatError;

/// MatCalc-rs — benchmark naive, blocked, and Strassen matrix multiplication.
#[derive(Parser, Debug)]
#[command(name = "matcalc", version, about)]
pub struct AppConfig {
    /// Matrix sizes to benchmark, comma separated.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "128,256,512,1024",
        env = "MATCALC_SIZES"
    )]
    pub sizes: Vec<usize>,

    /// Algorithm to run: naive, blocked, strassen, or all.
    #[arg(short, long, default_value = "all", env = "MATCALC_ALGO")]
    pub algo: String,

    /// Timed repetitions per algorithm and size.
    #[arg(short, long, default_value_t = DEFAULT_REPEATS, env = "MATCALC_REPEATS")]
    pub repeats: u32,

    /// Strassen base-case threshold (0 = calibrated profile or default).
    #[arg(short, long, default_value = "0", env = "MATCALC_THRESHOLD")]
    pub threshold: usize,

    /// Tile size of the blocked algorithm (0 = calibrated profile or default).
    #[arg(long, default_value = "0", env = "MATCALC_BLOCK_SIZE")]
    pub block_size: usize,

    /// Absolute tolerance when verifying against the naive reference.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE, env = "MATCALC_TOLERANCE")]
    pub tolerance: f64,

    /// Seed of the random operand generator.
    #[arg(long, default_value = "42", env = "MATCALC_SEED")]
    pub seed: u64,

    /// Generated values: unit ([0, 1)) or int (0..10).
    #[arg(long, default_value = "unit")]
    pub values: String,

    /// Evaluate the seven Strassen products in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Smallest Strassen frame evaluated in parallel (0 = default).
    #[arg(long, default_value = "0")]
    pub parallel_threshold: usize,

    /// Leaf kernel used by Strassen: naive, vectorized, or blocked.
    #[arg(long, default_value = "vectorized")]
    pub kernel: String,

    /// Timeout for the whole run (e.g., "500ms", "30s", "5m", "1h"; "none" disables).
    #[arg(long, default_value = "1h", env = "MATCALC_TIMEOUT")]
    pub timeout: String,

    /// Write the CSV report to this path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Calibrate the Strassen threshold and save a profile.
    #[arg(long)]
    pub calibrate: bool,

    /// Matrix size used by calibration.
    #[arg(long, default_value_t = DEFAULT_CALIBRATION_SIZE)]
    pub calibration_size: usize,

    /// Quiet mode (no table, no progress bar).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Memory limit (e.g., "8G", "512M").
    #[arg(long, default_value = "", env = "MATCALC_MEMORY_LIMIT")]
    pub memory_limit: String,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse the timeout flag; `None` means no deadline.
    pub fn timeout_duration(&self) -> Result<Option<Duration>, MatError> {
        let s = self.timeout.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        let timeout =
            parse_duration(s).ok_or_else(|| MatError::Config(format!("invalid timeout: {s}")))?;
        if Instant::now().checked_add(timeout).is_none() {
            return Err(MatError::Config(format!("timeout too large: {s}")));
        }
        Ok(Some(timeout))
    }
}

/// Parse a duration string like "500ms", "30s", "5m", "1h".
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let n: u64 = ms.parse().ok()?;
        Some(Duration::from_millis(n))
    } else if let Some(mins) = s.strip_suffix('m') {
        let n: u64 = mins.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(60)?))
    } else if let Some(hours) = s.strip_suffix('h') {
        let n: u64 = hours.parse().ok()?;
        Some(Duration::from_secs(n.checked_mul(3600)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        let n: u64 = secs.parse().ok()?;
        Some(Duration::from_secs(n))
    } else {
        let n: u64 = s.parse().ok()?;
        Some(Duration::from_secs(n))
    }
}
