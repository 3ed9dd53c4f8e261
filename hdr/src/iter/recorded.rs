use super::all::has_next_index;
use super::{Policy, State};

/// Emits one step for every counter that holds a count.
#[derive(Clone, Debug, Default)]
pub struct Recorded {
    visited_index: Option<usize>,
}

impl Recorded {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for Recorded {
    fn has_next(&self, state: &State<'_>) -> bool {
        has_next_index(self.visited_index, state)
    }

    fn reached_iteration_level(&self, state: &State<'_>) -> bool {
        state.count_at_this_value() != 0 && self.visited_index != Some(state.current_index())
    }

    fn increment_iteration_level(&mut self, state: &State<'_>) {
        self.visited_index = Some(state.current_index());
    }
}

#[cfg(test)]
mod tests {
    use crate::Histogram;

    #[test]
    fn recorded() {
        let mut histogram = Histogram::new(1, 1000, 3).unwrap();
        for value in [1, 1, 1, 2, 3] {
            histogram.record(value).unwrap();
        }

        let steps: Vec<(u64, u64, u64)> = histogram
            .iter_recorded()
            .map(|v| {
                (
                    v.value_iterated_to(),
                    v.count_at_value_iterated_to(),
                    v.total_count_to_this_value(),
                )
            })
            .collect();

        assert_eq!(steps, vec![(1, 3, 3), (2, 1, 4), (3, 1, 5)]);
    }

    #[test]
    fn reports_highest_equivalent() {
        let mut histogram = Histogram::new(1, 1 << 20, 2).unwrap();
        histogram.record(1000).unwrap();
        histogram.record(1001).unwrap();
        histogram.record(100_000).unwrap();

        let mut steps = Vec::new();
        for v in &histogram {
            steps.push((v.value_iterated_to(), v.count_at_value_iterated_to()));
        }

        assert_eq!(
            steps,
            vec![
                (histogram.highest_equivalent_value(1000), 2),
                (histogram.highest_equivalent_value(100_000), 1),
            ]
        );
    }
}
