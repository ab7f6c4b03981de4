//! # matcalc-bench
//!
//! Benchmark harness for the matcalc strategies: seeded input generation,
//! timing, resident-memory sampling, verification against the naive
//! reference, reports and threshold calibration.

pub mod calibration;
pub mod generator;
pub mod harness;
pub mod io;
pub mod memory;
pub mod output;
pub mod profile;
pub mod report;
pub mod runner;

pub use calibration::{CalibrationEngine, ThresholdSample};
pub use generator::{MatrixGenerator, ValueDistribution};
pub use harness::{analyze_results, BenchmarkHarness, HarnessConfig};
pub use profile::CalibrationProfile;
pub use report::BenchmarkRecord;
