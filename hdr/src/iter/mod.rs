//! Traversals over the counters of a [`Histogram`].
//!
//! A traversal is an [`Iter`] driven by a [`Policy`]. The iterator walks the
//! counters from the lowest index upwards, folding each counter into running
//! totals, and asks the policy after every counter whether a step should be
//! emitted. Each pull produces at most one [`IterationValue`].
//!
//! ```
//! use hdr::Histogram;
//!
//! let mut histogram = Histogram::new(1, 1000, 3).unwrap();
//! for value in [1, 1, 1, 2, 3] {
//!     histogram.record(value).unwrap();
//! }
//!
//! let steps: Vec<(u64, u64)> = histogram
//!     .iter_recorded()
//!     .map(|v| (v.value_iterated_to(), v.count_at_value_iterated_to()))
//!     .collect();
//!
//! assert_eq!(steps, vec![(1, 3), (2, 1), (3, 1)]);
//! ```

mod all;
mod percentile;
mod recorded;
mod value;

pub use all::AllValues;
pub use percentile::Percentiles;
pub use recorded::Recorded;
pub use value::IterationValue;

use crate::Histogram;
use core::iter::FusedIterator;

/// Decides where a traversal emits its steps.
///
/// The defaults implement a traversal that ends once every recorded count has
/// been folded into the running totals and reports count-derived percentiles.
pub trait Policy {
    /// Returns true while the traversal has more counters to visit.
    fn has_next(&self, state: &State<'_>) -> bool {
        state.has_next()
    }

    /// Returns true if the policy will take one more step once
    /// [`Policy::has_next`] turns false.
    fn has_final_step(&self, _state: &State<'_>) -> bool {
        false
    }

    /// Called once [`Policy::has_next`] turns false. Returns true if the
    /// policy has prepared one more step.
    fn begin_final_step(&mut self, _state: &State<'_>) -> bool {
        false
    }

    /// Returns true if the traversal should emit a step at the current
    /// counter.
    fn reached_iteration_level(&self, state: &State<'_>) -> bool;

    /// Called after a step has been emitted to move on to the next level.
    fn increment_iteration_level(&mut self, state: &State<'_>);

    /// The percentile level reported for the current step.
    fn percentile_iterated_to(&self, state: &State<'_>) -> f64 {
        state.percentile_iterated_to()
    }
}

/// The position of a traversal and the running totals accumulated so far.
#[derive(Clone, Debug)]
pub struct State<'a> {
    histogram: &'a Histogram,
    total_count: u64,
    current_index: usize,
    value_at_index: u64,
    value_at_next_index: u64,
    prev_value_iterated_to: u64,
    count_at_this_value: u64,
    total_count_to_current_index: u64,
    total_count_to_prev_index: u64,
    value_to_index: u128,
    fresh_sub_bucket: bool,
}

impl<'a> State<'a> {
    fn new(histogram: &'a Histogram) -> Self {
        Self {
            histogram,
            total_count: histogram.total_count(),
            current_index: 0,
            value_at_index: 0,
            value_at_next_index: 1 << histogram.config().unit_magnitude(),
            prev_value_iterated_to: 0,
            count_at_this_value: 0,
            total_count_to_current_index: 0,
            total_count_to_prev_index: 0,
            value_to_index: 0,
            fresh_sub_bucket: true,
        }
    }

    /// Returns the histogram being traversed.
    pub fn histogram(&self) -> &'a Histogram {
        self.histogram
    }

    /// Returns true while some recorded count has not been reached yet.
    pub fn has_next(&self) -> bool {
        self.total_count_to_current_index < self.total_count
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the lowest value counted at the current index.
    pub fn value_at_index(&self) -> u64 {
        self.value_at_index
    }

    /// Returns the lowest value counted at the next index.
    pub fn value_at_next_index(&self) -> u64 {
        self.value_at_next_index
    }

    pub fn count_at_this_value(&self) -> u64 {
        self.count_at_this_value
    }

    pub fn total_count_to_current_index(&self) -> u64 {
        self.total_count_to_current_index
    }

    /// Returns the value that is reported for the current index.
    pub fn value_iterated_to(&self) -> u64 {
        self.histogram.highest_equivalent_value(self.value_at_index)
    }

    /// Returns the percentage of all counts at or below the current index.
    pub fn percentile_iterated_to(&self) -> f64 {
        (100.0 * self.total_count_to_current_index as f64) / self.total_count as f64
    }

    fn increment_sub_bucket(&mut self) {
        self.fresh_sub_bucket = true;
        self.current_index += 1;
        self.value_at_index = self.histogram.value_at(self.current_index);
        self.value_at_next_index = self.histogram.value_at(self.current_index + 1);
    }
}

/// A traversal over a histogram, emitting steps where its [`Policy`] says so.
///
/// The traversal borrows the histogram, which therefore cannot be recorded
/// into while the traversal is alive. A traversal over an empty histogram
/// starts out completed.
pub struct Iter<'a, P> {
    state: State<'a>,
    policy: P,
    current: IterationValue,
    completed: bool,
}

impl<'a, P: Policy> Iter<'a, P> {
    /// Create a traversal over the histogram.
    pub fn new(histogram: &'a Histogram, policy: P) -> Self {
        debug_assert_eq!(histogram.counts_len(), histogram.config().total_buckets());

        Self {
            state: State::new(histogram),
            policy,
            current: IterationValue::default(),
            completed: histogram.total_count() == 0,
        }
    }

    /// Returns true while the policy still has counters to visit or a final
    /// step to take. A pull may still end the traversal without a step, for
    /// example when the remaining counters hold no counts.
    pub fn has_next(&self) -> bool {
        !self.completed
            && (self.policy.has_next(&self.state) || self.policy.has_final_step(&self.state))
    }

    /// Returns true once the traversal has run out of steps.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the policy driving this traversal.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Advance to the next step. The returned value is updated in place by
    /// each call, `None` marks the transition to the completed state.
    pub fn advance(&mut self) -> Option<&IterationValue> {
        if self.completed {
            return None;
        }

        loop {
            if !self.policy.has_next(&self.state) && !self.policy.begin_final_step(&self.state) {
                self.completed = true;
                return None;
            }

            let state = &mut self.state;

            state.count_at_this_value = state.histogram.count_at(state.current_index);

            if state.fresh_sub_bucket {
                state.total_count_to_current_index += state.count_at_this_value;
                state.value_to_index +=
                    state.count_at_this_value as u128 * state.value_iterated_to() as u128;
                state.fresh_sub_bucket = false;
            }

            if self.policy.reached_iteration_level(&self.state) {
                let value_iterated_to = self.state.value_iterated_to();
                let percentile_level = self.policy.percentile_iterated_to(&self.state);

                self.current = IterationValue::new(&self.state, value_iterated_to, percentile_level);

                self.state.prev_value_iterated_to = value_iterated_to;
                self.state.total_count_to_prev_index = self.state.total_count_to_current_index;

                self.policy.increment_iteration_level(&self.state);

                return Some(&self.current);
            }

            self.state.increment_sub_bucket();
        }
    }
}

impl<P: Policy> Iterator for Iter<'_, P> {
    type Item = IterationValue;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().copied()
    }
}

impl<P: Policy> FusedIterator for Iter<'_, P> {}

/// Traversals compare equal only when both have completed, which allows a live
/// traversal to be checked against an exhausted one.
impl<P, Q> PartialEq<Iter<'_, Q>> for Iter<'_, P> {
    fn eq(&self, other: &Iter<'_, Q>) -> bool {
        self.completed && other.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(values: &[u64]) -> Histogram {
        let mut histogram = Histogram::new(1, 1000, 3).unwrap();
        for value in values {
            histogram.record(*value).unwrap();
        }
        histogram
    }

    #[test]
    fn empty() {
        let histogram = histogram(&[]);

        let mut all = histogram.iter_all();
        assert!(!all.has_next());
        assert!(all.is_completed());
        assert!(all.advance().is_none());

        let mut recorded = histogram.iter_recorded();
        assert!(!recorded.has_next());
        assert!(recorded.next().is_none());

        let mut percentiles = histogram.iter_percentiles(5).unwrap();
        assert!(!percentiles.has_next());
        assert!(percentiles.next().is_none());
    }

    #[test]
    fn advance_in_place() {
        let histogram = histogram(&[1, 1, 1, 2, 3]);
        let mut iter = histogram.iter_recorded();

        assert!(iter.has_next());
        let step = iter.advance().unwrap();
        assert_eq!(step.value_iterated_to(), 1);
        assert_eq!(step.value_iterated_from(), 0);
        assert_eq!(step.count_added_in_this_iter_step(), 3);

        let step = iter.advance().unwrap();
        assert_eq!(step.value_iterated_to(), 2);
        assert_eq!(step.value_iterated_from(), 1);
        assert_eq!(step.total_count_to_this_value(), 4);
        assert_eq!(step.total_value_to_this_value(), 5);

        let step = iter.advance().unwrap();
        assert_eq!(step.value_iterated_to(), 3);
        assert_eq!(step.total_value_to_this_value(), 8);
        assert_eq!(step.percentile(), 100.0);

        assert!(iter.advance().is_none());
        assert!(iter.is_completed());
        assert!(!iter.has_next());
        assert!(iter.advance().is_none());
    }

    #[test]
    fn has_next_before_trailing_counters() {
        let histogram = histogram(&[5]);
        let mut iter = histogram.iter_recorded();

        assert_eq!(iter.advance().map(|v| v.value_iterated_to()), Some(5));

        // empty counters remain above the recorded value
        assert!(iter.has_next());
        assert!(!iter.is_completed());
        assert!(iter.advance().is_none());
        assert!(!iter.has_next());
        assert!(iter.is_completed());
    }

    #[test]
    fn equality() {
        let histogram = histogram(&[1, 2]);
        let empty = self::histogram(&[]);

        let mut live = histogram.iter_recorded();
        let end = empty.iter_recorded();
        let other = histogram.iter_all();

        assert!(live != end);
        assert!(live != other);

        while live.advance().is_some() {}

        assert!(live == end);
        assert!(end == empty.iter_percentiles(1).unwrap());
    }

    struct EveryOther {
        emitted: usize,
    }

    impl Policy for EveryOther {
        fn reached_iteration_level(&self, state: &State<'_>) -> bool {
            state.count_at_this_value() != 0 && state.current_index() >= self.emitted
        }

        fn increment_iteration_level(&mut self, state: &State<'_>) {
            self.emitted = state.current_index() + 2;
        }
    }

    #[test]
    fn custom_policy() {
        let histogram = histogram(&[1, 2, 3, 4, 5]);

        let values: Vec<u64> = Iter::new(&histogram, EveryOther { emitted: 0 })
            .map(|v| v.value_iterated_to())
            .collect();

        assert_eq!(values, vec![1, 3, 5]);
    }
}
