use crate::{AtomicHistogram, Config, Error, Histogram};
use log::{debug, trace};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Determines what happens when a value above the highest trackable value is
/// recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub enum Overflow {
    /// The value is not recorded and [`Error::OutOfRange`] is returned.
    #[default]
    Reject,
    /// The value is recorded as the highest trackable value.
    Clamp,
}

impl Overflow {
    /// Returns the value that should be recorded in place of `value`.
    pub(crate) fn admit(self, value: u64, config: &Config) -> Result<u64, Error> {
        let highest = config.highest_trackable_value();

        if value <= highest {
            return Ok(value);
        }

        match self {
            Self::Reject => Err(Error::OutOfRange),
            Self::Clamp => {
                trace!("clamping {value} to highest trackable value {highest}");
                Ok(highest)
            }
        }
    }
}

/// A builder that can be used to construct a histogram.
///
/// By using the `Builder` you can pick the layout, the handling of values that
/// exceed the trackable range, and the ratio used to report scaled values.
pub struct Builder {
    lowest_discernible_value: u64,
    highest_trackable_value: u64,
    significant_figures: u8,
    overflow: Overflow,
    conversion_ratio: f64,
}

impl Builder {
    /// Create a new builder. The defaults track values from 1 up to one hour
    /// in nanoseconds with 3 significant figures and reject larger values.
    pub fn new() -> Self {
        Self {
            lowest_discernible_value: 1,
            highest_trackable_value: 3_600_000_000_000,
            significant_figures: 3,
            overflow: Overflow::Reject,
            conversion_ratio: 1.0,
        }
    }

    /// Set the smallest value that can be told apart from zero.
    pub fn lowest_discernible_value(mut self, value: u64) -> Self {
        self.lowest_discernible_value = value;
        self
    }

    /// Set the largest value that can be recorded.
    pub fn highest_trackable_value(mut self, value: u64) -> Self {
        self.highest_trackable_value = value;
        self
    }

    /// Set the number of significant decimal figures that values are kept
    /// apart by.
    pub fn significant_figures(mut self, figures: u8) -> Self {
        self.significant_figures = figures;
        self
    }

    /// Set the handling of values above the highest trackable value.
    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the ratio which converts the recorded integers back to the units
    /// of the scaled values they represent. For example, recording
    /// milliseconds with microsecond precision as integer microseconds would
    /// use a ratio of `0.001`.
    pub fn conversion_ratio(mut self, ratio: f64) -> Self {
        self.conversion_ratio = ratio;
        self
    }

    /// Returns the layout this builder would produce.
    pub fn config(&self) -> Result<Config, Error> {
        Config::new(
            self.lowest_discernible_value,
            self.highest_trackable_value,
            self.significant_figures,
        )
    }

    /// Consume the builder and produce a histogram.
    pub fn standard(self) -> Result<Histogram, Error> {
        let config = self.checked_config()?;

        let mut histogram = Histogram::with_config(&config);
        histogram.overflow = self.overflow;
        histogram.conversion_ratio = self.conversion_ratio;

        Ok(histogram)
    }

    /// Consume the builder and produce a histogram that uses atomic counters
    /// and can be recorded into from many threads.
    pub fn atomic(self) -> Result<AtomicHistogram, Error> {
        let config = self.checked_config()?;

        let mut histogram = AtomicHistogram::with_config(&config);
        histogram.overflow = self.overflow;
        histogram.conversion_ratio = self.conversion_ratio;

        Ok(histogram)
    }

    /// Consume the builder and rebuild a histogram from counters that were
    /// kept elsewhere, keeping the overflow policy and conversion ratio of
    /// the builder. See [`Histogram::from_counts`].
    pub fn restore(self, counts: Vec<u64>) -> Result<Histogram, Error> {
        let config = self.checked_config()?;

        let mut histogram = Histogram::from_counts(&config, counts)?;
        histogram.overflow = self.overflow;
        histogram.conversion_ratio = self.conversion_ratio;

        Ok(histogram)
    }

    fn checked_config(&self) -> Result<Config, Error> {
        if !self.conversion_ratio.is_finite() || self.conversion_ratio <= 0.0 {
            return Err(Error::InvalidConversionRatio);
        }

        let config = self.config()?;

        debug!(
            "histogram layout: {} buckets of {} sub-buckets in {} counters, unit magnitude {}, {:?} on overflow",
            config.bucket_count(),
            config.sub_bucket_count(),
            config.total_buckets(),
            config.unit_magnitude(),
            self.overflow,
        );

        Ok(config)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
