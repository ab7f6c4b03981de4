#![no_main]

use libfuzzer_sys::fuzz_target;

use matcalc_core::matrix::Matrix;
use matcalc_core::strassen::{StrassenConfig, StrassenEngine};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks n in 1..=48, second the threshold in 1..=16
    let n = usize::from(data[0] % 48) + 1;
    let threshold = usize::from(data[1] % 16) + 1;
    let cells = &data[2..];

    // Arbitrary finite values, including ones that overflow to infinity
    let values: Vec<f64> = (0..2 * n * n)
        .map(|i| {
            let byte = cells.get(i % cells.len().max(1)).copied().unwrap_or(0);
            f64::from(i8::from_ne_bytes([byte])) * 1e300
        })
        .collect();
    let a = Matrix::from_vec(n, values[..n * n].to_vec()).unwrap();
    let b = Matrix::from_vec(n, values[n * n..].to_vec()).unwrap();

    let engine = StrassenEngine::new(StrassenConfig::with_threshold(threshold));
    // Should not panic, and the output keeps the caller's dimension
    let c = engine.multiply(&a, &b).unwrap();
    assert_eq!(c.dim(), n);
});
