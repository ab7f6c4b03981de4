//! Console formatting for benchmark results.

use std::fmt::Write as _;
use std::time::Duration;

use crate::report::BenchmarkRecord;

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a byte count with a binary unit.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes}B")
    } else {
        format!("{value:.1}{}", UNITS[unit])
    }
}

/// Render records as an aligned console table.
#[must_use]
pub fn render_table(records: &[BenchmarkRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>6} {:>12} {:>12} {:>12} {:>10} {:>10}  {}",
        "algorithm", "n", "mean", "min", "max", "rss", "estimate", "ok"
    );
    let _ = writeln!(out, "{:-<88}", "");
    for r in records {
        let _ = writeln!(
            out,
            "{:<10} {:>6} {:>12} {:>12} {:>12} {:>10} {:>10}  {}",
            r.algorithm,
            r.n,
            format_duration(Duration::from_secs_f64(r.mean_ms / 1000.0)),
            format_duration(Duration::from_secs_f64(r.min_ms / 1000.0)),
            format_duration(Duration::from_secs_f64(r.max_ms / 1000.0)),
            format_bytes(r.rss_kb * 1024),
            format_bytes(r.estimated_kb * 1024),
            if r.verified { "yes" } else { "NO" },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_micro() {
        let s = format_duration(Duration::from_nanos(500));
        assert!(s.contains("µs"));
    }

    #[test]
    fn format_duration_milli() {
        assert_eq!(format_duration(Duration::from_millis(42)), "42.00ms");
    }

    #[test]
    fn format_duration_minutes() {
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30.0s");
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.0KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0MB");
    }

    #[test]
    fn table_lists_every_record() {
        let records = vec![
            BenchmarkRecord {
                algorithm: "naive".into(),
                n: 64,
                mean_ms: 1.5,
                min_ms: 1.0,
                max_ms: 2.0,
                rss_kb: 0,
                estimated_kb: 96,
                verified: true,
                max_diff: 0.0,
            },
            BenchmarkRecord {
                algorithm: "strassen".into(),
                n: 64,
                mean_ms: 1.2,
                min_ms: 1.1,
                max_ms: 1.3,
                rss_kb: 4,
                estimated_kb: 192,
                verified: false,
                max_diff: 0.5,
            },
        ];
        let table = render_table(&records);
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("strassen"));
        assert!(table.contains("NO"));
    }
}
