use crate::{Builder, Config, Error, Histogram, Overflow};
use core::sync::atomic::{AtomicU64, Ordering};
use log::trace;

/// A histogram that uses atomic 64bit counters for each bucket.
///
/// Unlike the non-atomic variant, it cannot be traversed directly. Instead, a
/// snapshot must be taken which captures the counters at a point in time and
/// can then be queried and traversed while recording carries on.
pub struct AtomicHistogram {
    pub(crate) config: Config,
    pub(crate) overflow: Overflow,
    pub(crate) conversion_ratio: f64,
    total_count: AtomicU64,
    counts: Box<[AtomicU64]>,
}

impl AtomicHistogram {
    /// Construct a new atomic histogram from the provided parameters. See the
    /// documentation for [`crate::Parameters`] to understand their meaning.
    pub fn new(
        lowest_discernible_value: u64,
        highest_trackable_value: u64,
        significant_figures: u8,
    ) -> Result<Self, Error> {
        Builder::new()
            .lowest_discernible_value(lowest_discernible_value)
            .highest_trackable_value(highest_trackable_value)
            .significant_figures(significant_figures)
            .atomic()
    }

    /// Creates a new atomic histogram using a provided [`crate::Config`].
    pub fn with_config(config: &Config) -> Self {
        let mut counts = Vec::with_capacity(config.total_buckets());
        counts.resize_with(config.total_buckets(), || AtomicU64::new(0));

        Self {
            config: *config,
            overflow: Overflow::default(),
            conversion_ratio: 1.0,
            total_count: AtomicU64::new(0),
            counts: counts.into(),
        }
    }

    /// Increment the counter for the bucket corresponding to the provided
    /// value by one.
    pub fn record(&self, value: u64) -> Result<(), Error> {
        self.record_n(value, 1)
    }

    /// Add some count to the counter for the bucket corresponding to the
    /// provided value. Returns an error, without recording anything, if the
    /// total count would overflow.
    pub fn record_n(&self, value: u64, count: u64) -> Result<(), Error> {
        let value = self.overflow.admit(value, &self.config)?;
        let index = self.config.value_to_index(value);

        // no counter can exceed the total, so reserving against the total
        // keeps every counter from wrapping
        self.total_count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                total.checked_add(count)
            })
            .map_err(|_| Error::Overflow)?;

        self.counts[index].fetch_add(count, Ordering::Relaxed);

        Ok(())
    }

    /// Returns the bucket configuration of the histogram.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Zero all counters.
    pub fn reset(&self) {
        for counter in self.counts.iter() {
            counter.store(0, Ordering::Relaxed);
        }
        self.total_count.store(0, Ordering::Relaxed);
    }

    /// Produce a snapshot from this histogram. The total count of the
    /// snapshot is the sum of the counters it copied, so it is consistent
    /// even if recording happens while the counters are copied.
    pub fn snapshot(&self) -> Histogram {
        let mut histogram = Histogram::with_config(&self.config);
        histogram.overflow = self.overflow;
        histogram.conversion_ratio = self.conversion_ratio;

        for (index, counter) in self.counts.iter().enumerate() {
            let count = counter.load(Ordering::Relaxed);
            if count != 0 {
                histogram.counts[index] = count;
                histogram.total_count = histogram.total_count.saturating_add(count);
                histogram.update_min_max(self.config.index_to_value(index));
            }
        }

        trace!(
            "snapshot of atomic histogram with {} values",
            histogram.total_count
        );

        histogram
    }
}
