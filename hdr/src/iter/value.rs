use super::State;

/// The result of one traversal step, describing the counters crossed since the
/// previous step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IterationValue {
    value_iterated_to: u64,
    value_iterated_from: u64,
    count_at_value_iterated_to: u64,
    count_added_in_this_iter_step: u64,
    total_count_to_this_value: u64,
    total_value_to_this_value: u128,
    percentile: f64,
    percentile_level_iterated_to: f64,
    int_to_double_conversion_ratio: f64,
}

impl IterationValue {
    pub(super) fn new(state: &State<'_>, value_iterated_to: u64, percentile_level: f64) -> Self {
        Self {
            value_iterated_to,
            value_iterated_from: state.prev_value_iterated_to,
            count_at_value_iterated_to: state.count_at_this_value,
            count_added_in_this_iter_step: state.total_count_to_current_index
                - state.total_count_to_prev_index,
            total_count_to_this_value: state.total_count_to_current_index,
            total_value_to_this_value: state.value_to_index,
            percentile: state.percentile_iterated_to(),
            percentile_level_iterated_to: percentile_level,
            int_to_double_conversion_ratio: state.histogram.conversion_ratio(),
        }
    }

    /// Returns the highest value equivalent to the counter this step reached.
    pub fn value_iterated_to(&self) -> u64 {
        self.value_iterated_to
    }

    /// Returns the value reached by the previous step, or 0 for the first.
    pub fn value_iterated_from(&self) -> u64 {
        self.value_iterated_from
    }

    /// Returns the count held by the counter this step reached.
    pub fn count_at_value_iterated_to(&self) -> u64 {
        self.count_at_value_iterated_to
    }

    /// Returns the count accumulated since the previous step.
    pub fn count_added_in_this_iter_step(&self) -> u64 {
        self.count_added_in_this_iter_step
    }

    /// Returns the count of all values up to and including this step.
    pub fn total_count_to_this_value(&self) -> u64 {
        self.total_count_to_this_value
    }

    /// Returns the sum of all values up to and including this step, with each
    /// value taken as the highest value of its equivalence range.
    pub fn total_value_to_this_value(&self) -> u128 {
        self.total_value_to_this_value
    }

    /// Returns the percentage of all counts up to and including this step.
    pub fn percentile(&self) -> f64 {
        self.percentile
    }

    /// Returns the percentile level this step was emitted for. For percentile
    /// traversals this is the tick that was reached, otherwise it is the same
    /// as [`IterationValue::percentile`].
    pub fn percentile_level_iterated_to(&self) -> f64 {
        self.percentile_level_iterated_to
    }

    pub fn int_to_double_conversion_ratio(&self) -> f64 {
        self.int_to_double_conversion_ratio
    }

    /// Returns [`IterationValue::value_iterated_to`] in scaled units.
    pub fn value_iterated_to_scaled(&self) -> f64 {
        self.value_iterated_to as f64 * self.int_to_double_conversion_ratio
    }

    /// Returns [`IterationValue::value_iterated_from`] in scaled units.
    pub fn value_iterated_from_scaled(&self) -> f64 {
        self.value_iterated_from as f64 * self.int_to_double_conversion_ratio
    }
}
