use crate::iter::{AllValues, Iter, Percentiles, Recorded};
use crate::{Builder, Config, Error, Overflow};

/// A histogram that uses plain 64bit counters for each bucket.
///
/// Recording requires exclusive access, so a histogram can never be recorded
/// into while one of its traversals is alive. Use an
/// [`crate::AtomicHistogram`] to record from many threads and take snapshots
/// for reporting.
#[derive(Clone, Debug)]
pub struct Histogram {
    pub(crate) config: Config,
    pub(crate) overflow: Overflow,
    pub(crate) conversion_ratio: f64,
    pub(crate) total_count: u64,
    // any value within the range of the highest recorded value
    pub(crate) max_value: u64,
    // any value within the range of the lowest recorded value above the unit
    pub(crate) min_non_zero_value: u64,
    pub(crate) counts: Box<[u64]>,
}

impl Histogram {
    /// Construct a new histogram from the provided parameters. See the
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
            .standard()
    }

    /// Returns a [`Builder`] for configuring a histogram.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Creates a new histogram using a provided [`crate::Config`].
    pub fn with_config(config: &Config) -> Self {
        let counts: Box<[u64]> = vec![0; config.total_buckets()].into();

        Self {
            config: *config,
            overflow: Overflow::default(),
            conversion_ratio: 1.0,
            total_count: 0,
            max_value: 0,
            min_non_zero_value: u64::MAX,
            counts,
        }
    }

    /// Rebuild a histogram from counters that were kept elsewhere, for
    /// example by a collaborator that serialized a previous histogram.
    ///
    /// Returns an error if the number of counters does not match the layout or
    /// if their sum does not fit in 64 bits.
    ///
    /// The histogram uses the default [`Overflow::Reject`] policy and a
    /// conversion ratio of 1.0. Use [`Builder::restore`] to rebuild it
    /// with a different policy or ratio.
    pub fn from_counts(config: &Config, counts: Vec<u64>) -> Result<Self, Error> {
        if counts.len() != config.total_buckets() {
            return Err(Error::LayoutMismatch);
        }

        let mut histogram = Self::with_config(config);

        for (index, count) in counts.iter().enumerate().filter(|(_, count)| **count != 0) {
            histogram.total_count = histogram
                .total_count
                .checked_add(*count)
                .ok_or(Error::Overflow)?;
            histogram.update_min_max(config.index_to_value(index));
        }

        histogram.counts = counts.into();

        Ok(histogram)
    }

    /// Increment the counter for the bucket corresponding to the provided
    /// value by one.
    pub fn record(&mut self, value: u64) -> Result<(), Error> {
        self.record_n(value, 1)
    }

    /// Add some count to the counter for the bucket corresponding to the
    /// provided value.
    ///
    /// Values above the highest trackable value are handled according to the
    /// [`Overflow`] policy. If the counter or the total count would overflow,
    /// nothing is recorded and an error is returned.
    pub fn record_n(&mut self, value: u64, count: u64) -> Result<(), Error> {
        let value = self.overflow.admit(value, &self.config)?;
        let index = self.config.value_to_index(value);

        let counter = self.counts[index]
            .checked_add(count)
            .ok_or(Error::Overflow)?;
        let total_count = self
            .total_count
            .checked_add(count)
            .ok_or(Error::Overflow)?;

        self.counts[index] = counter;
        self.total_count = total_count;

        if count > 0 {
            self.update_min_max(value);
        }

        Ok(())
    }

    /// Record a scaled value. The value is divided by the conversion ratio and
    /// truncated to the integer which is then recorded.
    pub fn record_scaled(&mut self, value: f64) -> Result<(), Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::OutOfRange);
        }

        // float to int casts saturate, leaving huge values to the overflow
        // policy
        self.record((value / self.conversion_ratio) as u64)
    }

    pub(crate) fn update_min_max(&mut self, value: u64) {
        let mask = self.config.unit_magnitude_mask();

        let internal_value = value | mask;
        if internal_value > self.max_value {
            self.max_value = internal_value;
        }

        // values within the first unit are equivalent to zero
        if value > mask {
            let internal_value = value & !mask;
            if internal_value < self.min_non_zero_value {
                self.min_non_zero_value = internal_value;
            }
        }
    }

    /// Adds the counts of the other histogram into this histogram.
    ///
    /// Histograms with the same layout are merged counter by counter. For
    /// different layouts, each recorded bucket of the other histogram is
    /// recorded at its lowest equivalent value, subject to the overflow policy
    /// of this histogram. On error, this histogram is left unchanged.
    pub fn add(&mut self, other: &Histogram) -> Result<(), Error> {
        let mut merged = self.clone();

        if self.config == other.config {
            for (this, other) in merged.counts.iter_mut().zip(other.counts.iter()) {
                *this = this.checked_add(*other).ok_or(Error::Overflow)?;
            }

            merged.total_count = merged
                .total_count
                .checked_add(other.total_count)
                .ok_or(Error::Overflow)?;

            if other.total_count > 0 {
                merged.max_value = merged.max_value.max(other.max_value);
                merged.min_non_zero_value =
                    merged.min_non_zero_value.min(other.min_non_zero_value);
            }
        } else {
            for (index, count) in other.counts.iter().enumerate() {
                if *count != 0 {
                    merged.record_n(other.value_at(index), *count)?;
                }
            }
        }

        *self = merged;

        Ok(())
    }

    /// Clear all counters and statistics.
    pub fn reset(&mut self) {
        self.counts.fill(0);
        self.total_count = 0;
        self.max_value = 0;
        self.min_non_zero_value = u64::MAX;
    }

    /// Get a reference to the raw counters.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }

    /// Returns the bucket configuration of the histogram.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Returns the handling of values above the highest trackable value.
    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Returns the ratio which converts recorded integers to scaled values.
    pub fn conversion_ratio(&self) -> f64 {
        self.conversion_ratio
    }

    /// Returns the number of counters.
    pub fn counts_len(&self) -> usize {
        self.counts.len()
    }

    /// Returns the number of recorded values.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns the count held by the counter at the index. Indices past the
    /// last counter hold nothing.
    pub fn count_at(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Returns the lowest value counted by the counter at the index.
    pub fn value_at(&self, index: usize) -> u64 {
        self.config.index_to_value(index)
    }

    /// Returns the count of values equivalent to the value. Values above the
    /// trackable range are looked up in the last counter.
    pub fn count_at_value(&self, value: u64) -> u64 {
        let index = self.config.value_to_index(value).min(self.counts.len() - 1);
        self.counts[index]
    }

    pub fn lowest_equivalent_value(&self, value: u64) -> u64 {
        self.config.lowest_equivalent(value)
    }

    /// Returns the highest value that is counted together with the value. This
    /// is what gets reported in place of the values recorded in a bucket.
    pub fn highest_equivalent_value(&self, value: u64) -> u64 {
        self.config.highest_equivalent(value)
    }

    pub fn median_equivalent_value(&self, value: u64) -> u64 {
        self.config.median_equivalent(value)
    }

    pub fn next_non_equivalent_value(&self, value: u64) -> u64 {
        self.config.next_non_equivalent(value)
    }

    pub fn equivalent_range_len(&self, value: u64) -> u64 {
        self.config.equivalent_range_len(value)
    }

    /// Returns true if both values are counted by the same counter.
    pub fn values_are_equivalent(&self, a: u64, b: u64) -> bool {
        self.config.lowest_equivalent(a) == self.config.lowest_equivalent(b)
    }

    /// Returns the lowest recorded value, or 0 if nothing was recorded.
    pub fn min(&self) -> u64 {
        if self.total_count == 0 || self.counts[0] != 0 {
            0
        } else {
            self.config.lowest_equivalent(self.min_non_zero_value)
        }
    }

    /// Returns the highest recorded value, or 0 if nothing was recorded.
    pub fn max(&self) -> u64 {
        if self.max_value == 0 {
            0
        } else {
            self.config.highest_equivalent(self.max_value)
        }
    }

    /// Returns the mean of the recorded values, where each value is taken as
    /// the middle of its equivalence range.
    pub fn mean(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }

        let total: f64 = self
            .iter_recorded()
            .map(|v| {
                self.median_equivalent_value(v.value_iterated_to()) as f64
                    * v.count_at_value_iterated_to() as f64
            })
            .sum();

        total / self.total_count as f64
    }

    /// Returns the standard deviation of the recorded values.
    pub fn stdev(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }

        let mean = self.mean();

        let total: f64 = self
            .iter_recorded()
            .map(|v| {
                let deviation = self.median_equivalent_value(v.value_iterated_to()) as f64 - mean;
                deviation * deviation * v.count_at_value_iterated_to() as f64
            })
            .sum();

        (total / self.total_count as f64).sqrt()
    }

    /// Return the value at a percentile.
    ///
    /// The percentile should be in the inclusive range `0.0..=100.0`. For
    /// example, the 50th percentile (median) can be found using `50.0`. The
    /// result is the highest value equivalent to the one the percentile falls
    /// on, except for `0.0` which reports the lowest equivalent value.
    pub fn value_at_percentile(&self, percentile: f64) -> Result<u64, Error> {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(Error::InvalidPercentile);
        }

        if self.total_count == 0 {
            return Err(Error::Empty);
        }

        // step one ulp down so that exact percentiles land on the value they
        // were recorded at instead of the next one
        let requested = if percentile > 0.0 {
            f64::from_bits(percentile.to_bits() - 1)
        } else {
            0.0
        };

        let count_at_percentile =
            (((requested / 100.0) * self.total_count as f64).ceil() as u64).max(1);

        let mut total = 0;
        for (index, count) in self.counts.iter().enumerate() {
            total += count;
            if total >= count_at_percentile {
                let value = self.value_at(index);
                return Ok(if percentile == 0.0 {
                    self.lowest_equivalent_value(value)
                } else {
                    self.highest_equivalent_value(value)
                });
            }
        }

        Ok(self.max())
    }

    /// Returns the percentage of recorded values which are smaller than or
    /// equivalent to the value. An empty histogram reports 100.0.
    pub fn percentile_below(&self, value: u64) -> f64 {
        if self.total_count == 0 {
            return 100.0;
        }

        let index = self.config.value_to_index(value).min(self.counts.len() - 1);
        let total: u64 = self.counts[..=index].iter().sum();

        (100.0 * total as f64) / self.total_count as f64
    }

    /// Returns a traversal which steps through every counter, including the
    /// empty ones.
    pub fn iter_all(&self) -> Iter<'_, AllValues> {
        Iter::new(self, AllValues::new())
    }

    /// Returns a traversal which steps through every counter that holds a
    /// count.
    pub fn iter_recorded(&self) -> Iter<'_, Recorded> {
        Iter::new(self, Recorded::new())
    }

    /// Returns a traversal which steps through percentile ticks that get
    /// closer together as they approach 100. See [`Percentiles`] for the tick
    /// schedule.
    pub fn iter_percentiles(
        &self,
        ticks_per_half_distance: u32,
    ) -> Result<Iter<'_, Percentiles>, Error> {
        Ok(Iter::new(self, Percentiles::new(ticks_per_half_distance)?))
    }
}

impl<'a> IntoIterator for &'a Histogram {
    type Item = crate::IterationValue;
    type IntoIter = Iter<'a, Recorded>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_recorded()
    }
}
