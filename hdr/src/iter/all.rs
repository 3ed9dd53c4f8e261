use super::{Policy, State};

/// Emits one step for every counter, including the empty ones.
#[derive(Clone, Debug, Default)]
pub struct AllValues {
    visited_index: Option<usize>,
}

impl AllValues {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Walks every index up to and including the last counter, regardless of
/// where the recorded counts end.
pub(super) fn has_next_index(visited_index: Option<usize>, state: &State<'_>) -> bool {
    let last_index = state.histogram().counts_len() - 1;
    let current_index = state.current_index();

    current_index < last_index
        || (current_index == last_index && visited_index != Some(current_index))
}

impl Policy for AllValues {
    fn has_next(&self, state: &State<'_>) -> bool {
        has_next_index(self.visited_index, state)
    }

    fn reached_iteration_level(&self, state: &State<'_>) -> bool {
        self.visited_index != Some(state.current_index())
    }

    fn increment_iteration_level(&mut self, state: &State<'_>) {
        self.visited_index = Some(state.current_index());
    }
}

#[cfg(test)]
mod tests {
    use crate::Histogram;

    #[test]
    fn every_index() {
        let mut histogram = Histogram::new(1, 1000, 1).unwrap();
        for value in [1, 1, 1, 2, 3] {
            histogram.record(value).unwrap();
        }

        let steps: Vec<_> = histogram.iter_all().collect();
        assert_eq!(steps.len(), histogram.counts_len());

        for (index, step) in steps.iter().enumerate() {
            assert_eq!(
                step.value_iterated_to(),
                histogram.highest_equivalent_value(histogram.value_at(index))
            );
            assert_eq!(step.count_at_value_iterated_to(), histogram.count_at(index));
            assert_eq!(step.count_added_in_this_iter_step(), histogram.count_at(index));
        }

        assert_eq!(steps[1].total_count_to_this_value(), 3);
        assert_eq!(steps[3].total_count_to_this_value(), 5);
        assert_eq!(steps.last().map(|s| s.total_count_to_this_value()), Some(5));
        assert_eq!(steps.last().map(|s| s.percentile()), Some(100.0));
    }

    #[test]
    fn last_counter() {
        let mut histogram = Histogram::new(1, 1000, 1).unwrap();
        histogram.record(1000).unwrap();
        let last_index = histogram.counts_len() - 1;
        assert_eq!(histogram.config().value_to_index(1000), last_index);

        let total: u64 = histogram
            .iter_all()
            .map(|s| s.count_added_in_this_iter_step())
            .sum();
        assert_eq!(total, 1);
    }
}
