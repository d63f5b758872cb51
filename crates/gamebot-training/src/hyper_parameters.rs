use serde::{Deserialize, Serialize};

/// Out-of-range hyper-parameter.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid hyper-parameter `{name}` = {value}: {expected}")]
pub struct HyperParameterError {
    pub name: &'static str,
    pub value: f64,
    pub expected: &'static str,
}

/// Genetic algorithm settings for a whole training run.
///
/// Every field has a default, so a partial JSON document only overrides what it names:
///
/// ```
/// use gamebot_training::hyper_parameters::HyperParameters;
///
/// let params: HyperParameters = serde_json::from_str(r#"{"crossover_prob": 0.5}"#).unwrap();
/// assert_eq!(params.crossover_prob, 0.5);
/// assert_eq!(params.mutation_prob, HyperParameters::default().mutation_prob);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParameters {
    /// Probability that a child is produced by crossover rather than cloned.
    pub crossover_prob: f32,
    /// BLX-α range expansion factor.
    pub blx_alpha: f32,
    /// Per-gene mutation probability.
    pub mutation_prob: f32,
    /// Exponent `b` of the non-uniform mutation magnitude.
    pub mutation_shape: f32,
    /// Fraction of the population carried over unchanged, rounded down.
    pub elitism_fraction: f64,
    /// Distinct opponents each individual fights per generation.
    pub opponents_per_generation: usize,
    /// A generation is logged when its index is a multiple of this value.
    pub log_cadence: usize,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            crossover_prob: 0.25,
            blx_alpha: 0.5,
            mutation_prob: 0.5,
            mutation_shape: 2.0,
            elitism_fraction: 0.01,
            opponents_per_generation: 5,
            log_cadence: 5,
        }
    }
}

impl HyperParameters {
    pub fn validate(&self) -> Result<(), HyperParameterError> {
        let checks: [(&'static str, f64, bool, &'static str); 7] = [
            (
                "crossover_prob",
                self.crossover_prob.into(),
                (0.0..=1.0).contains(&self.crossover_prob),
                "a probability in [0, 1]",
            ),
            (
                "blx_alpha",
                self.blx_alpha.into(),
                self.blx_alpha.is_finite() && self.blx_alpha >= 0.0,
                "a finite non-negative value",
            ),
            (
                "mutation_prob",
                self.mutation_prob.into(),
                (0.0..=1.0).contains(&self.mutation_prob),
                "a probability in [0, 1]",
            ),
            (
                "mutation_shape",
                self.mutation_shape.into(),
                self.mutation_shape.is_finite() && self.mutation_shape > 0.0,
                "a finite positive value",
            ),
            (
                "elitism_fraction",
                self.elitism_fraction,
                (0.0..1.0).contains(&self.elitism_fraction),
                "a fraction in [0, 1)",
            ),
            (
                "opponents_per_generation",
                usize_value(self.opponents_per_generation),
                self.opponents_per_generation > 0,
                "at least 1",
            ),
            (
                "log_cadence",
                usize_value(self.log_cadence),
                self.log_cadence > 0,
                "at least 1",
            ),
        ];
        match checks.into_iter().find(|(_, _, ok, _)| !ok) {
            Some((name, value, _, expected)) => Err(HyperParameterError {
                name,
                value,
                expected,
            }),
            None => Ok(()),
        }
    }

    /// Number of individuals carried over unchanged, `floor(size · elitism_fraction)`.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    #[must_use]
    pub fn elite_count(&self, size: usize) -> usize {
        ((size as f64) * self.elitism_fraction).floor() as usize
    }

    #[must_use]
    pub fn is_log_generation(&self, generation: usize) -> bool {
        generation % self.log_cadence == 0
    }
}

#[expect(clippy::cast_precision_loss)]
fn usize_value(value: usize) -> f64 {
    value as f64
}
