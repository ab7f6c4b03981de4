//! Application entry point and dispatch.

use anyhow::{Context, Result};
use tracing::{debug, warn};

use matcalc_bench::calibration::CalibrationEngine;
use matcalc_bench::generator::ValueDistribution;
use matcalc_bench::harness::{analyze_results, BenchmarkHarness, HarnessConfig};
use matcalc_bench::io::{load_validated_profile, save_profile};
use matcalc_bench::output::{format_duration, render_table};
use matcalc_bench::report::{to_json, write_csv_file};
use matcalc_core::error::MatError;
use matcalc_core::kernel::BaseKernel;
use matcalc_core::memory_budget::parse_memory_limit;
use matcalc_core::options::Options;
use matcalc_core::progress::CancellationToken;
use matcalc_core::registry::DefaultFactory;

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    let opts = build_options(config)?;
    opts.validate()?;

    let cancel = match config.timeout_duration()? {
        Some(timeout) => CancellationToken::with_timeout(timeout),
        None => CancellationToken::new(),
    };
    ctrlc_handler(cancel.clone());

    if config.calibrate {
        return run_calibration(config, &opts, &cancel);
    }
    run_benchmark(config, opts, &cancel)
}

/// Engine options: defaults, then a saved calibration profile, then CLI flags.
pub fn build_options(config: &AppConfig) -> Result<Options, MatError> {
    let mut opts = Options::default();
    if let Some(profile) = load_validated_profile() {
        debug!(
            threshold = profile.strassen_threshold,
            block = profile.block_size,
            "using calibrated profile"
        );
        profile.apply(&mut opts);
    }

    if config.threshold > 0 {
        opts.strassen_threshold = config.threshold;
    }
    if config.block_size > 0 {
        opts.block_size = config.block_size;
    }
    if config.parallel_threshold > 0 {
        opts.parallel_threshold = config.parallel_threshold;
    }
    opts.tolerance = config.tolerance;
    opts.parallel = config.parallel;
    opts.kernel = match BaseKernel::from_name(&config.kernel) {
        Some(BaseKernel::Blocked { .. }) => BaseKernel::Blocked {
            block: opts.block_size,
        },
        Some(kernel) => kernel,
        None => {
            return Err(MatError::Config(format!(
                "unknown kernel: {}",
                config.kernel
            )))
        }
    };

    Ok(opts.normalize())
}

fn memory_limit(config: &AppConfig) -> Result<Option<usize>, MatError> {
    let limit = parse_memory_limit(&config.memory_limit).map_err(MatError::Config)?;
    Ok((limit > 0).then_some(limit))
}

fn run_benchmark(config: &AppConfig, opts: Options, cancel: &CancellationToken) -> Result<()> {
    let distribution: ValueDistribution = config.values.parse().map_err(MatError::Config)?;
    if config.verbose {
        eprintln!(
            "threshold={} block={} kernel={} parallel={} tolerance={:e}",
            opts.strassen_threshold,
            opts.block_size,
            opts.kernel.name(),
            opts.parallel,
            opts.tolerance
        );
    }

    let harness_config = HarnessConfig {
        sizes: config.sizes.clone(),
        repeats: config.repeats,
        seed: config.seed,
        tolerance: opts.tolerance,
        distribution,
        show_progress: !config.quiet && !config.json,
        ..HarnessConfig::default()
    };
    let factory = DefaultFactory::with_options(opts);
    let strategies = factory.resolve(&config.algo)?;
    let harness = BenchmarkHarness::new(harness_config, strategies);

    harness.check_memory_budget(memory_limit(config)?)?;
    let records = harness.run(cancel)?;

    if config.json {
        println!("{}", to_json(&records)?);
    } else if !config.quiet {
        print!("{}", render_table(&records));
        if config.verbose {
            for r in &records {
                println!("  {} n={} max |diff| = {:e}", r.algorithm, r.n, r.max_diff);
            }
        }
    }

    if let Some(path) = &config.output {
        write_csv_file(&records, path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    analyze_results(&records)?;
    Ok(())
}

fn run_calibration(config: &AppConfig, opts: &Options, cancel: &CancellationToken) -> Result<()> {
    let mut engine = CalibrationEngine::new(opts.clone())
        .with_size(config.calibration_size)
        .with_repeats(config.repeats);
    if !config.quiet {
        engine = engine.with_progress(Box::new(|p| {
            eprintln!("[{}/{}] {}", p.current, p.total, p.step);
        }));
    }

    let (profile, samples) = engine.calibrate(cancel)?;

    if !config.quiet {
        println!("Calibration complete (n = {}):", config.calibration_size);
        for s in &samples {
            println!("  threshold {:>4}: {}", s.threshold, format_duration(s.median));
        }
        println!("  Strassen threshold: {}", profile.strassen_threshold);
    }

    let path = save_profile(&profile).context("failed to save calibration profile")?;
    if !config.quiet {
        println!("Profile saved to {}", path.display());
    }
    Ok(())
}

fn ctrlc_handler(cancel: CancellationToken) {
    if let Err(e) = ctrlc::set_handler(move || {
        cancel.cancel();
    }) {
        warn!("could not install Ctrl+C handler: {e}");
    }
}
