//! Strassen threshold calibration.
//!
//! Times the Strassen engine at one size for each candidate threshold and
//! keeps the candidate with the fastest median.

use std::time::Duration;

use tracing::info;

use matcalc_core::error::MatError;
use matcalc_core::options::Options;
use matcalc_core::progress::CancellationToken;
use matcalc_core::strassen::{StrassenConfig, StrassenEngine};

use crate::generator::{MatrixGenerator, ValueDistribution};
use crate::profile::{self, CalibrationProfile, PROFILE_VERSION};
use crate::runner::{measure, millis};

/// Thresholds tried by default.
pub const DEFAULT_CANDIDATES: [usize; 5] = [16, 32, 64, 128, 256];

/// Matrix size calibrated on by default.
pub const DEFAULT_CALIBRATION_SIZE: usize = 512;

/// Progress callback for calibration.
pub type ProgressCallback = Box<dyn Fn(CalibrationProgress) + Send>;

/// Progress information during calibration.
#[derive(Debug, Clone)]
pub struct CalibrationProgress {
    /// Current step name.
    pub step: String,
    /// Current step number (1-based).
    pub current: usize,
    /// Total number of steps.
    pub total: usize,
}

/// Timing of one candidate threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSample {
    /// Candidate threshold.
    pub threshold: usize,
    /// Median wall time.
    pub median: Duration,
}

/// Calibration engine that determines the fastest Strassen threshold.
pub struct CalibrationEngine {
    size: usize,
    candidates: Vec<usize>,
    repeats: u32,
    seed: u64,
    options: Options,
    progress_cb: Option<ProgressCallback>,
}

impl CalibrationEngine {
    /// Create a calibration engine with the default size and candidates.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            size: DEFAULT_CALIBRATION_SIZE,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            repeats: 3,
            seed: 42,
            options: options.normalize(),
            progress_cb: None,
        }
    }

    /// Calibrate on `size x size` operands.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Replace the candidate thresholds.
    #[must_use]
    pub fn with_candidates(mut self, candidates: Vec<usize>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Timed repetitions per candidate.
    #[must_use]
    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    /// Set a progress callback.
    #[must_use]
    pub fn with_progress(mut self, cb: ProgressCallback) -> Self {
        self.progress_cb = Some(cb);
        self
    }

    fn report_progress(&self, step: &str, current: usize, total: usize) {
        if let Some(cb) = &self.progress_cb {
            cb(CalibrationProgress {
                step: step.to_string(),
                current,
                total,
            });
        }
    }

    /// Time every candidate and return the resulting profile with the raw samples.
    pub fn calibrate(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(CalibrationProfile, Vec<ThresholdSample>), MatError> {
        if self.size == 0 {
            return Err(MatError::Config("calibration size must be positive".into()));
        }
        if self.candidates.is_empty() || self.candidates.contains(&0) {
            return Err(MatError::Config(
                "calibration needs positive candidate thresholds".into(),
            ));
        }

        let (a, b) = MatrixGenerator::new(self.seed, ValueDistribution::Unit).pair(self.size);
        let total = self.candidates.len();
        let mut samples = Vec::with_capacity(total);

        for (i, &threshold) in self.candidates.iter().enumerate() {
            self.report_progress(&format!("threshold {threshold}"), i + 1, total);
            let engine = StrassenEngine::new(StrassenConfig {
                threshold,
                ..StrassenConfig::from(&self.options)
            });
            let (timing, _) = measure(1, self.repeats, || {
                engine.multiply_with_cancel(&a, &b, cancel)
            })?;
            info!(
                threshold,
                n = self.size,
                median_ms = millis(timing.median),
                "calibration sample"
            );
            samples.push(ThresholdSample {
                threshold,
                median: timing.median,
            });
        }

        let best = samples
            .iter()
            .min_by_key(|s| s.median)
            .map_or(self.options.strassen_threshold, |s| s.threshold);
        info!(threshold = best, n = self.size, "calibration result");

        let profile = CalibrationProfile {
            version: PROFILE_VERSION,
            strassen_threshold: best,
            block_size: self.options.block_size,
            cpu_model: profile::cpu_model(),
            num_cores: profile::num_cores(),
            timestamp: profile::current_timestamp(),
        };
        Ok((profile, samples))
    }
}
