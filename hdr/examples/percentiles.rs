//! Records a synthetic latency distribution and prints the percentile table.
//!
//! Run with `RUST_LOG=debug` to see the histogram layout.

use hdr::{Error, Histogram};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Error> {
    env_logger::init();

    // latencies in microseconds, reported in milliseconds
    let mut histogram = Histogram::builder()
        .highest_trackable_value(60_000_000)
        .significant_figures(3)
        .conversion_ratio(0.001)
        .standard()?;

    let mut rng = StdRng::seed_from_u64(2022);
    for _ in 0..100_000 {
        let base: u64 = rng.gen_range(200..2_000);
        let value = if rng.gen_ratio(1, 100) {
            base * rng.gen_range(10..200)
        } else {
            base
        };
        histogram.record(value)?;
    }

    println!(
        "{:>12} {:>14} {:>10} {:>14}",
        "Value", "Percentile", "TotalCount", "1/(1-Percentile)"
    );

    for step in histogram.iter_percentiles(5)? {
        let level = step.percentile_level_iterated_to() / 100.0;
        let inverse = if level < 1.0 {
            format!("{:>14.2}", 1.0 / (1.0 - level))
        } else {
            format!("{:>14}", "")
        };

        println!(
            "{:>12.3} {:>14.12} {:>10} {}",
            step.value_iterated_to_scaled(),
            level,
            step.total_count_to_this_value(),
            inverse
        );
    }

    println!(
        "#[Mean = {:>12.3}, StdDeviation = {:>12.3}]",
        histogram.mean() * histogram.conversion_ratio(),
        histogram.stdev() * histogram.conversion_ratio()
    );
    println!(
        "#[Max = {:>12.3}, Total count = {:>12}]",
        histogram.max() as f64 * histogram.conversion_ratio(),
        histogram.total_count()
    );

    Ok(())
}
