use crate::{Error, Parameters};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The derived bucket layout of a histogram.
///
/// Counters are organized into buckets which each cover twice the value range
/// of the previous bucket. Every bucket is divided into `sub_bucket_count`
/// equally wide sub-buckets, so the width of a counter grows with the
/// magnitude of the values it counts while the relative error stays bounded.
///
/// Bucket 0 uses all of its sub-buckets. For every later bucket, the bottom
/// half of its range is already covered by the previous buckets, so only the
/// top half of its sub-buckets are given counters. For 3 significant figures
/// and a lowest discernible value of 1 this looks like:
///
/// ```text
/// bucket 0 covers 0..2048 in steps of 1, using all 2048 sub-buckets
/// bucket 1 covers 2048..4096 in steps of 2, using the top 1024 sub-buckets
/// bucket 2 covers 4096..8192 in steps of 4, using the top 1024 sub-buckets
/// ...
/// ```
///
/// See [`crate::Parameters`] for how to choose the parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(Serialize, Deserialize),
    serde(try_from = "Parameters", into = "Parameters")
)]
pub struct Config {
    lowest_discernible_value: u64,
    highest_trackable_value: u64,
    significant_figures: u8,
    unit_magnitude: u32,
    unit_magnitude_mask: u64,
    sub_bucket_half_count_magnitude: u32,
    sub_bucket_count: u32,
    sub_bucket_half_count: u32,
    sub_bucket_mask: u64,
    leading_zero_count_base: u32,
    bucket_count: u32,
    counts_len: usize,
}

impl Config {
    /// Create a new layout from the lowest discernible value, the highest
    /// trackable value and the number of significant decimal figures.
    pub fn new(
        lowest_discernible_value: u64,
        highest_trackable_value: u64,
        significant_figures: u8,
    ) -> Result<Self, Error> {
        if lowest_discernible_value < 1 {
            return Err(Error::LowestDiscernibleValueTooLow);
        }

        if significant_figures > 5 {
            return Err(Error::InvalidSignificantFigures);
        }

        match lowest_discernible_value.checked_mul(2) {
            Some(min) if highest_trackable_value >= min => {}
            _ => return Err(Error::HighestTrackableValueTooLow),
        }

        // we need single unit resolution up to 2 * 10^significant_figures to
        // keep values apart to the requested number of decimal figures
        let largest_value_with_single_unit_resolution = 2 * 10_u64.pow(significant_figures.into());

        let unit_magnitude = 63 - lowest_discernible_value.leading_zeros();
        let unit_magnitude_mask = (1_u64 << unit_magnitude) - 1;

        // ceil(log2()) of the single unit resolution range, which is always at
        // least 2
        let sub_bucket_count_magnitude =
            64 - (largest_value_with_single_unit_resolution - 1).leading_zeros();
        let sub_bucket_half_count_magnitude = sub_bucket_count_magnitude.max(1) - 1;

        if unit_magnitude + sub_bucket_half_count_magnitude > 61 {
            return Err(Error::ResolutionTooHigh);
        }

        let sub_bucket_count = 1_u32 << (sub_bucket_half_count_magnitude + 1);
        let sub_bucket_half_count = sub_bucket_count / 2;
        let sub_bucket_mask = (sub_bucket_count as u64 - 1) << unit_magnitude;

        // the bits used by the largest value in bucket 0
        let leading_zero_count_base = 64 - unit_magnitude - sub_bucket_half_count_magnitude - 1;

        let bucket_count =
            buckets_to_cover(highest_trackable_value, sub_bucket_count, unit_magnitude);
        let counts_len = (bucket_count as usize + 1) * sub_bucket_half_count as usize;

        Ok(Self {
            lowest_discernible_value,
            highest_trackable_value,
            significant_figures,
            unit_magnitude,
            unit_magnitude_mask,
            sub_bucket_half_count_magnitude,
            sub_bucket_count,
            sub_bucket_half_count,
            sub_bucket_mask,
            leading_zero_count_base,
            bucket_count,
            counts_len,
        })
    }

    /// Returns the parameters this layout was derived from.
    pub fn params(&self) -> Parameters {
        Parameters {
            lowest_discernible_value: self.lowest_discernible_value,
            highest_trackable_value: self.highest_trackable_value,
            significant_figures: self.significant_figures,
        }
    }

    pub fn lowest_discernible_value(&self) -> u64 {
        self.lowest_discernible_value
    }

    pub fn highest_trackable_value(&self) -> u64 {
        self.highest_trackable_value
    }

    pub fn significant_figures(&self) -> u8 {
        self.significant_figures
    }

    /// Returns log2 of the smallest unit that can be discerned.
    pub fn unit_magnitude(&self) -> u32 {
        self.unit_magnitude
    }

    pub(crate) fn unit_magnitude_mask(&self) -> u64 {
        self.unit_magnitude_mask
    }

    /// Returns the number of sub-buckets each bucket is divided into.
    pub fn sub_bucket_count(&self) -> u32 {
        self.sub_bucket_count
    }

    /// Returns the number of buckets needed to cover the trackable range.
    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    /// Returns the total number of counters in the layout.
    pub fn total_buckets(&self) -> usize {
        self.counts_len
    }

    /// Returns the counter index for a value. Values below the smallest
    /// discernible unit map to index 0.
    ///
    /// The index is only backed by a counter for values within the trackable
    /// range, callers must check against [`Config::total_buckets`] or the
    /// highest trackable value before using it.
    pub fn value_to_index(&self, value: u64) -> usize {
        let bucket_index = self.bucket_index_of(value);
        let sub_bucket_index = self.sub_bucket_index_of(value, bucket_index);

        // bucket 0 contributes all of its sub-buckets, every later bucket only
        // the top half
        ((bucket_index as usize) << self.sub_bucket_half_count_magnitude) + sub_bucket_index
    }

    /// Returns the lowest value that is counted by the counter at the index.
    pub fn index_to_value(&self, index: usize) -> u64 {
        let half = self.sub_bucket_half_count as usize;
        let mask = half - 1;

        let (bucket_index, sub_bucket_index) =
            match (index >> self.sub_bucket_half_count_magnitude).checked_sub(1) {
                Some(bucket_index) => (bucket_index, (index & mask) + half),
                None => (0, index & mask),
            };

        // saturate for indices past the end of the layout
        match u32::try_from(bucket_index)
            .ok()
            .and_then(|b| b.checked_add(self.unit_magnitude))
            .filter(|shift| *shift < 64)
        {
            Some(shift) => ((sub_bucket_index as u128) << shift).min(u64::MAX as u128) as u64,
            None => u64::MAX,
        }
    }

    /// Returns the lowest value in the equivalence range of the value.
    pub fn lowest_equivalent(&self, value: u64) -> u64 {
        let bucket_index = self.bucket_index_of(value);
        let sub_bucket_index = self.sub_bucket_index_of(value, bucket_index);

        (sub_bucket_index as u64) << (bucket_index + self.unit_magnitude)
    }

    /// Returns the highest value in the equivalence range of the value.
    pub fn highest_equivalent(&self, value: u64) -> u64 {
        self.lowest_equivalent(value) + (self.equivalent_range_len(value) - 1)
    }

    /// Returns the value in the middle (rounded up) of the equivalence range
    /// of the value.
    pub fn median_equivalent(&self, value: u64) -> u64 {
        self.lowest_equivalent(value)
            .saturating_add(self.equivalent_range_len(value) >> 1)
    }

    /// Returns the lowest value above the equivalence range of the value.
    pub fn next_non_equivalent(&self, value: u64) -> u64 {
        self.lowest_equivalent(value)
            .saturating_add(self.equivalent_range_len(value))
    }

    /// Returns the number of distinct values which are counted together with
    /// the value.
    pub fn equivalent_range_len(&self, value: u64) -> u64 {
        let bucket_index = self.bucket_index_of(value);
        let sub_bucket_index = self.sub_bucket_index_of(value, bucket_index);

        let magnitude = if sub_bucket_index >= self.sub_bucket_count as usize {
            bucket_index + 1
        } else {
            bucket_index
        };

        1 << (self.unit_magnitude + magnitude)
    }

    // the number of powers of two by which the value exceeds the largest value
    // in bucket 0. The mask maps small values to bucket 0.
    fn bucket_index_of(&self, value: u64) -> u32 {
        self.leading_zero_count_base - (value | self.sub_bucket_mask).leading_zeros()
    }

    // for buckets above 0 this always lands in the top half of the
    // sub-buckets, otherwise the value would belong to the previous bucket
    fn sub_bucket_index_of(&self, value: u64, bucket_index: u32) -> usize {
        (value >> (bucket_index + self.unit_magnitude)) as usize
    }
}

fn buckets_to_cover(value: u64, sub_bucket_count: u32, unit_magnitude: u32) -> u32 {
    // bucket k covers 0..(sub_bucket_count * 2^k) in units of 2^k
    let mut smallest_untrackable_value = (sub_bucket_count as u64) << unit_magnitude;

    let mut buckets = 1;
    while smallest_untrackable_value <= value {
        if smallest_untrackable_value > u64::MAX / 2 {
            // the next bucket reaches past u64::MAX and is the last one
            return buckets + 1;
        }
        smallest_untrackable_value <<= 1;
        buckets += 1;
    }

    buckets
}

impl TryFrom<Parameters> for Config {
    type Error = Error;

    fn try_from(params: Parameters) -> Result<Self, Error> {
        Self::new(
            params.lowest_discernible_value,
            params.highest_trackable_value,
            params.significant_figures,
        )
    }
}

impl From<Config> for Parameters {
    fn from(config: Config) -> Self {
        config.params()
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for Config {
    fn schema_name() -> String {
        Parameters::schema_name()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        Parameters::json_schema(gen)
    }
}
