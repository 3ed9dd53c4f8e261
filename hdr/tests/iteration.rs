use hdr::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random(seed: u64, samples: usize, highest: u64) -> Histogram {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut histogram = Histogram::new(1, highest, 3).unwrap();

    for _ in 0..samples {
        // spread the samples across many orders of magnitude
        let magnitude = rng.gen_range(0..40);
        let value = rng.gen_range(1..=(1u64 << magnitude)).min(highest);
        histogram.record(value).unwrap();
    }

    histogram
}

#[test]
fn all_values_cover_every_count() {
    for seed in 0..8 {
        let histogram = random(seed, 10_000, 3_600_000_000_000);

        let mut steps = 0;
        let mut total = 0;
        for step in histogram.iter_all() {
            steps += 1;
            total += step.count_added_in_this_iter_step();
            assert_eq!(step.count_added_in_this_iter_step(), step.count_at_value_iterated_to());
        }

        assert_eq!(steps, histogram.counts_len());
        assert_eq!(total, histogram.total_count());
    }
}

#[test]
fn recorded_is_subset_of_all_values() {
    for seed in 0..8 {
        let histogram = random(seed, 5_000, 1 << 32);

        let all: Vec<IterationValue> = histogram
            .iter_all()
            .filter(|v| v.count_at_value_iterated_to() != 0)
            .collect();
        let recorded: Vec<IterationValue> = histogram.iter_recorded().collect();

        assert_eq!(all.len(), recorded.len());
        for (a, r) in all.iter().zip(recorded.iter()) {
            assert_eq!(a.value_iterated_to(), r.value_iterated_to());
            assert_eq!(a.count_at_value_iterated_to(), r.count_at_value_iterated_to());
            assert_eq!(a.total_count_to_this_value(), r.total_count_to_this_value());
            assert_eq!(a.total_value_to_this_value(), r.total_value_to_this_value());
        }

        let total: u64 = recorded.iter().map(|v| v.count_added_in_this_iter_step()).sum();
        assert_eq!(total, histogram.total_count());
        assert_eq!(
            recorded.last().map(|v| v.value_iterated_to()),
            Some(histogram.max())
        );
    }
}

#[test]
fn running_totals_are_monotonic() {
    let histogram = random(42, 10_000, 1 << 36);

    let mut previous: Option<IterationValue> = None;
    for step in histogram.iter_recorded() {
        if let Some(previous) = previous {
            assert!(step.value_iterated_to() > previous.value_iterated_to());
            assert_eq!(step.value_iterated_from(), previous.value_iterated_to());
            assert!(step.total_count_to_this_value() > previous.total_count_to_this_value());
            assert!(step.total_value_to_this_value() >= previous.total_value_to_this_value());
            assert!(step.percentile() >= previous.percentile());
        } else {
            assert_eq!(step.value_iterated_from(), 0);
        }
        previous = Some(step);
    }

    assert_eq!(previous.map(|v| v.percentile()), Some(100.0));
}

#[test]
fn percentile_levels() {
    for ticks in [1, 2, 5, 10] {
        let histogram = random(ticks as u64, 10_000, 1 << 36);

        let steps: Vec<IterationValue> = histogram.iter_percentiles(ticks).unwrap().collect();

        assert_eq!(steps.first().map(|v| v.percentile_level_iterated_to()), Some(0.0));
        assert!(steps
            .windows(2)
            .all(|w| w[0].percentile_level_iterated_to() <= w[1].percentile_level_iterated_to()));
        assert!(steps
            .windows(2)
            .all(|w| w[0].value_iterated_to() <= w[1].value_iterated_to()));

        let last = steps.last().unwrap();
        assert_eq!(last.percentile_level_iterated_to(), 100.0);
        assert_eq!(last.percentile(), 100.0);
        assert_eq!(last.value_iterated_to(), histogram.max());
        assert_eq!(
            steps
                .iter()
                .filter(|v| v.percentile_level_iterated_to() == 100.0)
                .count(),
            1
        );

        // every step reports a value whose cumulative share covers its level
        for step in &steps {
            assert!(step.percentile() >= step.percentile_level_iterated_to());
        }
    }
}

#[test]
fn small_distribution() {
    let mut histogram = Histogram::new(1, 3_600_000_000, 3).unwrap();
    for value in [1, 1, 1, 2, 3] {
        histogram.record(value).unwrap();
    }

    let recorded: Vec<(u64, u64, u64)> = histogram
        .iter_recorded()
        .map(|v| {
            (
                v.value_iterated_to(),
                v.count_at_value_iterated_to(),
                v.total_count_to_this_value(),
            )
        })
        .collect();
    assert_eq!(recorded, vec![(1, 3, 3), (2, 1, 4), (3, 1, 5)]);

    let all = histogram.iter_all();
    assert!(all.has_next());
    let all: Vec<IterationValue> = all.collect();
    assert_eq!(all.len(), 23552);
    assert_eq!(all[0].count_at_value_iterated_to(), 0);
    assert_eq!(all[1].count_at_value_iterated_to(), 3);
}

#[test]
fn empty_histogram() {
    let histogram = Histogram::new(1, 1_000_000, 3).unwrap();

    let mut all = histogram.iter_all();
    assert!(!all.has_next());
    assert!(all.advance().is_none());
    assert!(all.is_completed());

    assert_eq!(histogram.iter_recorded().count(), 0);
    assert_eq!(histogram.iter_percentiles(5).unwrap().count(), 0);
    assert_eq!(histogram.value_at_percentile(50.0), Err(Error::Empty));
    assert_eq!(histogram.mean(), 0.0);
}

#[test]
fn out_of_range() {
    let mut histogram = Histogram::new(1, 1_000_000, 3).unwrap();
    assert_eq!(histogram.record(1_000_001), Err(Error::OutOfRange));
    assert!(histogram.is_empty());
    assert_eq!(histogram.iter_recorded().count(), 0);

    let mut histogram = Histogram::builder()
        .highest_trackable_value(1_000_000)
        .overflow(Overflow::Clamp)
        .standard()
        .unwrap();
    histogram.record(u64::MAX).unwrap();
    assert_eq!(
        histogram.iter_recorded().map(|v| v.value_iterated_to()).last(),
        Some(histogram.highest_equivalent_value(1_000_000))
    );
}

#[test]
fn full_range() {
    let mut histogram = Histogram::new(1, u64::MAX, 3).unwrap();
    histogram.record(u64::MAX).unwrap();
    histogram.record(1).unwrap();

    let recorded: Vec<u64> = histogram.iter_recorded().map(|v| v.value_iterated_to()).collect();
    assert_eq!(recorded, vec![1, u64::MAX]);

    let total: u64 = histogram
        .iter_all()
        .map(|v| v.count_added_in_this_iter_step())
        .sum();
    assert_eq!(total, 2);
}

#[test]
fn traversals_are_independent() {
    let histogram = random(7, 1_000, 1 << 20);

    let mut a = histogram.iter_recorded();
    let b: Vec<IterationValue> = histogram.iter_recorded().collect();

    a.advance();
    let rest: Vec<IterationValue> = a.collect();
    assert_eq!(rest.as_slice(), &b[1..]);
}
