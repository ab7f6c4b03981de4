#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use matcalc_core::matrix::Matrix;
use matcalc_core::options::Options;
use matcalc_core::registry::{DefaultFactory, StrategyFactory};
use matcalc_core::strategy::Multiplier;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    // n in 1..=40, threshold and tile in 1..=8 so small inputs still recurse
    let n = usize::from(data[0] % 40) + 1;
    let threshold = usize::from(data[1] % 8) + 1;
    let block = usize::from(data[2] % 8) + 1;
    let cells = &data[3..];

    // Small integers keep every product and partial sum exact
    let values: Vec<f64> = (0..2 * n * n)
        .map(|i| {
            let byte = cells.get(i % cells.len().max(1)).copied().unwrap_or(0);
            f64::from(byte % 17) - 8.0
        })
        .collect();
    let a = Matrix::from_vec(n, values[..n * n].to_vec()).unwrap();
    let b = Matrix::from_vec(n, values[n * n..].to_vec()).unwrap();

    let factory = DefaultFactory::with_options(Options {
        strassen_threshold: threshold,
        block_size: block,
        ..Options::default()
    });
    let naive: Arc<dyn Multiplier> = factory.get("naive").unwrap();
    let blocked: Arc<dyn Multiplier> = factory.get("blocked").unwrap();
    let strassen: Arc<dyn Multiplier> = factory.get("strassen").unwrap();

    let reference = naive.multiply(&a, &b).unwrap();
    assert_eq!(
        blocked.multiply(&a, &b).unwrap(),
        reference,
        "blocked != naive at n={n}, block={block}"
    );
    assert_eq!(
        strassen.multiply(&a, &b).unwrap(),
        reference,
        "strassen != naive at n={n}, threshold={threshold}"
    );
});
