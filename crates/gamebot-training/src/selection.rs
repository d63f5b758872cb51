//! Fitness-proportional (roulette wheel) parent selection.
//!
//! Individual `i` is drawn with probability `fitness_i / Σ fitness`. When every fitness is
//! zero the wheel degrades to a uniform draw instead of dividing by zero.

use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    #[display("cannot select from an empty population")]
    Empty,
    #[display("fitness of individual #{index} is {fitness}, expected a finite non-negative value")]
    InvalidFitness { index: usize, fitness: f32 },
    #[display("cannot build the selection wheel")]
    Weights(rand::distr::weighted::Error),
}

#[derive(Debug, Clone)]
enum Wheel {
    Uniform(usize),
    Weighted(WeightedIndex<f64>),
}

/// Roulette wheel over a fitness vector.
#[derive(Debug, Clone)]
pub struct SelectionWheel {
    wheel: Wheel,
}

impl SelectionWheel {
    /// Builds the wheel, rejecting negative or non-finite fitness values.
    pub fn new(fitness: &[f32]) -> Result<Self, SelectionError> {
        if fitness.is_empty() {
            return Err(SelectionError::Empty);
        }
        if let Some((index, fitness)) = fitness
            .iter()
            .enumerate()
            .find(|(_, f)| !(f.is_finite() && **f >= 0.0))
        {
            return Err(SelectionError::InvalidFitness {
                index,
                fitness: *fitness,
            });
        }

        let wheel = if fitness.iter().all(|f| *f == 0.0) {
            Wheel::Uniform(fitness.len())
        } else {
            // summed in f64 so that large finite values cannot overflow the total
            let weights = fitness.iter().map(|f| f64::from(*f));
            Wheel::Weighted(WeightedIndex::new(weights).map_err(SelectionError::Weights)?)
        };
        Ok(Self { wheel })
    }

    /// Returns `true` when every individual has the same chance (zero total fitness).
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        matches!(self.wheel, Wheel::Uniform(_))
    }

    /// Draws the index of one individual.
    pub fn sample<R>(&self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        match &self.wheel {
            Wheel::Uniform(len) => rng.random_range(0..*len),
            Wheel::Weighted(index) => index.sample(rng),
        }
    }
}
