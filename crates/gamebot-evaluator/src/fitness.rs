/// Running average of fight scores.
///
/// Every recorded fight carries the same weight `1/n` in [`value`](Self::value), so an
/// individual that happens to be drawn as an opponent more often is not rewarded for the
/// extra fights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitnessAccumulator {
    value: f32,
    count: usize,
}

impl FitnessAccumulator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: 0.0,
            count: 0,
        }
    }

    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Number of fights recorded since the last reset.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn record(&mut self, score: f32) {
        let n = self.count as f32;
        self.value = (n * self.value + score) / (n + 1.0);
        self.count += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_average() {
        let mut fitness = FitnessAccumulator::new();
        fitness.record(1.0);
        assert_eq!(fitness.value(), 1.0);
        fitness.record(0.0);
        assert_eq!(fitness.value(), 0.5);
        fitness.record(0.5);
        assert!((fitness.value() - 0.5).abs() < 1e-6);
        fitness.record(2.0);
        assert!((fitness.value() - 0.875).abs() < 1e-6);
        assert_eq!(fitness.count(), 4);
    }

    #[test]
    fn test_reset() {
        let mut fitness = FitnessAccumulator::new();
        fitness.record(3.0);
        fitness.reset();
        assert_eq!(fitness, FitnessAccumulator::default());
        fitness.record(0.25);
        assert_eq!(fitness.value(), 0.25);
    }
}
