use super::{Policy, State};
use crate::Error;

/// Emits steps at percentile levels that get closer together as they approach
/// 100.
///
/// The distance from the current level to 100 is split into halves, and each
/// half is covered by `ticks_per_half_distance` steps. After the last recorded
/// value has been reached one more step is emitted at exactly 100.
#[derive(Clone, Debug)]
pub struct Percentiles {
    ticks_per_half_distance: u32,
    percentile_to_iterate_to: f64,
    percentile_to_iterate_from: f64,
    reached_last_recorded_value: bool,
}

impl Percentiles {
    /// Create a percentile policy. Returns [`Error::InvalidTicks`] if
    /// `ticks_per_half_distance` is zero.
    pub fn new(ticks_per_half_distance: u32) -> Result<Self, Error> {
        if ticks_per_half_distance == 0 {
            return Err(Error::InvalidTicks);
        }

        Ok(Self {
            ticks_per_half_distance,
            percentile_to_iterate_to: 0.0,
            percentile_to_iterate_from: 0.0,
            reached_last_recorded_value: false,
        })
    }

    pub fn ticks_per_half_distance(&self) -> u32 {
        self.ticks_per_half_distance
    }

    /// Returns the level the next step will be emitted at.
    pub fn percentile_to_iterate_to(&self) -> f64 {
        self.percentile_to_iterate_to
    }

    /// Returns the level of the most recently emitted step.
    pub fn percentile_to_iterate_from(&self) -> f64 {
        self.percentile_to_iterate_from
    }
}

impl Policy for Percentiles {
    fn has_final_step(&self, state: &State<'_>) -> bool {
        !self.reached_last_recorded_value && state.total_count() > 0
    }

    fn begin_final_step(&mut self, state: &State<'_>) -> bool {
        if !self.has_final_step(state) {
            return false;
        }

        self.percentile_to_iterate_to = 100.0;
        self.reached_last_recorded_value = true;
        true
    }

    fn reached_iteration_level(&self, state: &State<'_>) -> bool {
        if state.count_at_this_value() == 0 {
            return false;
        }

        state.percentile_iterated_to() >= self.percentile_to_iterate_to
    }

    fn increment_iteration_level(&mut self, _state: &State<'_>) {
        self.percentile_to_iterate_from = self.percentile_to_iterate_to;

        let gap = 100.0 - self.percentile_to_iterate_to;
        if gap != 0.0 {
            let half_distance = 2f64.powf((100.0 / gap).ln() / 2f64.ln() + 1.0);
            let ticks = self.ticks_per_half_distance as f64 * half_distance;
            self.percentile_to_iterate_to += 100.0 / ticks;
        }
    }

    fn percentile_iterated_to(&self, _state: &State<'_>) -> f64 {
        self.percentile_to_iterate_to
    }
}
