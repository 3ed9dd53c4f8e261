#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The parameters that determine the histogram bucketing.
/// * `lowest_discernible_value` - the smallest value that can be told apart
///   from zero. It is rounded down to a power of two internally, so values
///   within the same power-of-two unit are counted together. Nanosecond
///   latencies that only need microsecond accuracy would use `1000` here.
/// * `highest_trackable_value` - the largest value the histogram must be able
///   to count. Recording anything larger is handled according to the
///   [`crate::Overflow`] policy of the histogram.
/// * `significant_figures` - the number of significant decimal digits to
///   which values are kept apart. With `3`, values below 2,048 are tracked
///   exactly and every larger value is reported to within 0.1%.
///
/// # How to choose parameters for your data
/// The relative error of any reported value is bounded by
/// `10^(-1 * significant_figures)`. Memory grows with the number of sub-buckets
/// needed for the significant figures and logarithmically with the ratio
/// `highest_trackable_value / lowest_discernible_value`.
///
/// |  sig figs | sub-buckets | counters for 1ns..1h |
/// |-----------|-------------|----------------------|
/// |         0 |           2 |                   43 |
/// |         1 |          32 |                  624 |
/// |         2 |         256 |                4,608 |
/// |         3 |       2,048 |               33,792 |
/// |         4 |      32,768 |              475,136 |
/// |         5 |     262,144 |            3,407,872 |
///
/// # Constraints:
/// * `lowest_discernible_value` must be at least `1`
/// * `highest_trackable_value` must be at least twice the
///   `lowest_discernible_value`
/// * `significant_figures` must be in the range `0..=5`
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Parameters {
    pub lowest_discernible_value: u64,
    pub highest_trackable_value: u64,
    pub significant_figures: u8,
}
