//! Benchmark orchestration: sizes x strategies, verified against naive.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use matcalc_core::constants::{DEFAULT_BENCH_SIZES, DEFAULT_REPEATS, DEFAULT_TOLERANCE};
use matcalc_core::error::MatError;
use matcalc_core::matrix::Matrix;
use matcalc_core::progress::CancellationToken;
use matcalc_core::strategy::{Multiplier, NaiveStrategy};
use matcalc_core::verify::{equal_within, max_abs_diff};

use crate::generator::{MatrixGenerator, ValueDistribution};
use crate::memory::{rss_delta_kb, RssSampler};
use crate::output::format_bytes;
use crate::report::BenchmarkRecord;
use crate::runner::{measure, millis};

/// Settings of one benchmark session.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Matrix dimensions to run, in order.
    pub sizes: Vec<usize>,
    /// Timed repetitions per strategy and size.
    pub repeats: u32,
    /// Untimed runs before the timed loop.
    pub warmup: u32,
    /// Seed of the operand generator.
    pub seed: u64,
    /// Absolute tolerance against the naive reference.
    pub tolerance: f64,
    /// Distribution of generated values.
    pub distribution: ValueDistribution,
    /// Draw a progress bar on stderr.
    pub show_progress: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_BENCH_SIZES.to_vec(),
            repeats: DEFAULT_REPEATS,
            warmup: 1,
            seed: 42,
            tolerance: DEFAULT_TOLERANCE,
            distribution: ValueDistribution::Unit,
            show_progress: false,
        }
    }
}

impl HarnessConfig {
    /// Reject empty or zero sizes.
    pub fn validate(&self) -> Result<(), MatError> {
        if self.sizes.is_empty() {
            return Err(MatError::Config("no matrix sizes given".into()));
        }
        if self.sizes.contains(&0) {
            return Err(MatError::Config("matrix sizes must be positive".into()));
        }
        Ok(())
    }
}

/// Runs every strategy on every size and records timings and verification.
pub struct BenchmarkHarness {
    config: HarnessConfig,
    strategies: Vec<Arc<dyn Multiplier>>,
    reference: NaiveStrategy,
}

impl BenchmarkHarness {
    /// Create a harness running `strategies` in order under `config`.
    #[must_use]
    pub fn new(config: HarnessConfig, strategies: Vec<Arc<dyn Multiplier>>) -> Self {
        Self {
            config,
            strategies,
            reference: NaiveStrategy::new(),
        }
    }

    /// Refuse runs whose estimated working set exceeds `limit` bytes.
    pub fn check_memory_budget(&self, limit: Option<usize>) -> Result<(), MatError> {
        for &n in &self.config.sizes {
            for strategy in &self.strategies {
                let estimate = strategy.estimate(n);
                if !estimate.fits_in(limit) {
                    return Err(MatError::Config(format!(
                        "{} at n={n} needs an estimated {}, above the memory limit of {}",
                        strategy.name(),
                        format_bytes(estimate.total_bytes as u64),
                        format_bytes(limit.unwrap_or_default() as u64),
                    )));
                }
            }
        }
        Ok(())
    }

    /// Run the session. Stops at the first cancellation or strategy error.
    pub fn run(&self, cancel: &CancellationToken) -> Result<Vec<BenchmarkRecord>, MatError> {
        self.config.validate()?;

        let total = (self.config.sizes.len() * self.strategies.len()) as u64;
        let bar = progress_bar(total, self.config.show_progress);
        let mut generator = MatrixGenerator::new(self.config.seed, self.config.distribution);
        let mut sampler = RssSampler::new();
        let mut records = Vec::with_capacity(total as usize);

        for &n in &self.config.sizes {
            let (a, b) = generator.pair(n);
            bar.set_message(format!("reference n={n}"));
            let reference = self.reference.multiply_with_cancel(&a, &b, cancel)?;

            for strategy in &self.strategies {
                bar.set_message(format!("{} n={n}", strategy.name()));
                let record =
                    self.run_one(strategy.as_ref(), &a, &b, &reference, &mut sampler, cancel)?;
                records.push(record);
                bar.inc(1);
            }
        }

        bar.finish_and_clear();
        Ok(records)
    }

    fn run_one(
        &self,
        strategy: &dyn Multiplier,
        a: &Matrix,
        b: &Matrix,
        reference: &Matrix,
        sampler: &mut RssSampler,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkRecord, MatError> {
        let n = a.dim();
        let before = sampler.sample_kb();
        let (timing, c) = measure(self.config.warmup, self.config.repeats, || {
            strategy.multiply_with_cancel(a, b, cancel)
        })?;
        let after = sampler.sample_kb();

        let max_diff = max_abs_diff(&c, reference).unwrap_or(f64::INFINITY);
        let verified = equal_within(&c, reference, self.config.tolerance);
        if !verified {
            warn!(
                algorithm = strategy.name(),
                n,
                max_diff,
                tolerance = self.config.tolerance,
                "result differs from naive reference"
            );
        }

        let record = BenchmarkRecord {
            algorithm: strategy.name().to_string(),
            n,
            mean_ms: millis(timing.mean),
            min_ms: millis(timing.min),
            max_ms: millis(timing.max),
            rss_kb: rss_delta_kb(before, after),
            estimated_kb: (strategy.estimate(n).total_bytes / 1024) as u64,
            verified,
            max_diff,
        };
        info!(
            algorithm = %record.algorithm,
            n,
            mean_ms = record.mean_ms,
            rss_kb = record.rss_kb,
            verified,
            "benchmark sample"
        );
        Ok(record)
    }
}

/// Surface the first unverified record as a mismatch.
pub fn analyze_results(records: &[BenchmarkRecord]) -> Result<(), MatError> {
    if records.is_empty() {
        return Err(MatError::InvalidInput("no benchmark results".into()));
    }
    match records.iter().find(|r| !r.verified) {
        Some(r) => Err(MatError::Mismatch {
            algorithm: r.algorithm.clone(),
            max_diff: r.max_diff,
        }),
        None => Ok(()),
    }
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    let style =
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcalc_core::memory_budget::MemoryEstimate;
    use matcalc_core::registry::DefaultFactory;

    fn small_config() -> HarnessConfig {
        HarnessConfig {
            sizes: vec![4, 9, 33],
            repeats: 2,
            ..HarnessConfig::default()
        }
    }

    /// Adds one to every cell of the correct product.
    struct OffByOne;

    impl Multiplier for OffByOne {
        fn multiply_with_cancel(
            &self,
            a: &Matrix,
            b: &Matrix,
            cancel: &CancellationToken,
        ) -> Result<Matrix, MatError> {
            let c = NaiveStrategy::new().multiply_with_cancel(a, b, cancel)?;
            let data = c.as_slice().iter().map(|v| v + 1.0).collect();
            Matrix::from_vec(a.dim(), data)
        }

        fn name(&self) -> &'static str {
            "off-by-one"
        }

        fn estimate(&self, n: usize) -> MemoryEstimate {
            MemoryEstimate::direct(n)
        }
    }

    #[test]
    fn every_strategy_verified() {
        let factory = DefaultFactory::new();
        let harness = BenchmarkHarness::new(small_config(), factory.resolve("all").unwrap());
        let records = harness.run(&CancellationToken::new()).unwrap();
        assert_eq!(records.len(), 9);
        assert!(records.iter().all(|r| r.verified), "{records:?}");
        assert!(analyze_results(&records).is_ok());
        assert_eq!(records[0].algorithm, "naive");
        assert_eq!(records[8].n, 33);
    }

    #[test]
    fn mismatch_surfaces_through_analysis() {
        let harness = BenchmarkHarness::new(small_config(), vec![Arc::new(OffByOne)]);
        let records = harness.run(&CancellationToken::new()).unwrap();
        assert!(records.iter().all(|r| !r.verified));
        match analyze_results(&records) {
            Err(MatError::Mismatch {
                algorithm,
                max_diff,
            }) => {
                assert_eq!(algorithm, "off-by-one");
                assert!((max_diff - 1.0).abs() < 1e-12);
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_run_stops() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let factory = DefaultFactory::new();
        let harness = BenchmarkHarness::new(small_config(), factory.resolve("strassen").unwrap());
        assert_eq!(harness.run(&cancel).unwrap_err(), MatError::Cancelled);
    }

    #[test]
    fn memory_budget_refuses_large_sizes() {
        let factory = DefaultFactory::new();
        let harness = BenchmarkHarness::new(
            HarnessConfig {
                sizes: vec![1024],
                ..HarnessConfig::default()
            },
            factory.resolve("all").unwrap(),
        );
        assert!(harness.check_memory_budget(None).is_ok());
        let err = harness.check_memory_budget(Some(1024 * 1024)).unwrap_err();
        assert!(matches!(err, MatError::Config(_)));
    }

    #[test]
    fn invalid_sizes_rejected() {
        let harness = BenchmarkHarness::new(
            HarnessConfig {
                sizes: vec![8, 0],
                ..HarnessConfig::default()
            },
            vec![Arc::new(NaiveStrategy::new())],
        );
        assert!(matches!(
            harness.run(&CancellationToken::new()),
            Err(MatError::Config(_))
        ));
    }

    #[test]
    fn empty_results_are_an_error() {
        assert!(analyze_results(&[]).is_err());
    }
}
