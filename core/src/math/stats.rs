pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean; empty input yields 0.0 rather than dividing by zero.
    pub fn mean(values: &[f32]) -> f32 {
        if values.is_empty() {
            return 0.0;
        }
        let sum: f32 = values.iter().sum();
        sum / values.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
    }

    #[test]
    fn mean_handles_single_value() {
        assert_eq!(StatsHelper::mean(&[4.0]), 4.0);
    }

    #[test]
    fn mean_averages_values() {
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
