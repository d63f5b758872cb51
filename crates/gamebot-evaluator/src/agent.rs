//! Trainable game-playing agent.
//!
//! An [`Agent`] owns a [`ScoringModel`], a search depth and a running fitness. The
//! genetic trainer only sees its parameter vector, normalized to `[-1, 1]`:
//!
//! ```text
//! normalized = raw / weight_bound        raw ∈ [-weight_bound, weight_bound]
//! ```
//!
//! With the default bound of `1.0` both ranges coincide.

use gamebot_engine::GameState;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    fitness::FitnessAccumulator,
    scoring_model::{ParameterLengthError, ScoringModel, ShapeError},
    search::AdversarialSearch,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum AgentError {
    #[display("search depth must be at least 1")]
    InvalidDepth,
    #[display("weight bound must be positive and finite, got {bound}")]
    InvalidWeightBound { bound: f32 },
    #[display("model expects {actual} features but the game produces {expected}")]
    InputWidth { expected: usize, actual: usize },
    #[display("invalid model shape")]
    Shape(ShapeError),
    #[display("invalid parameter vector")]
    Parameters(ParameterLengthError),
}

/// How agents of a training run or a saved model are built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Scoring model layer widths, `[inputs, hidden..., 1]`.
    pub shape: Vec<usize>,
    /// Search depth in plies.
    pub depth: usize,
    /// Half-width of the raw weight range.
    pub weight_bound: f32,
}

impl AgentConfig {
    /// Creates an agent whose normalized parameters are drawn from Uniform(-1, 1).
    pub fn spawn<R>(&self, feature_count: usize, rng: &mut R) -> Result<Agent, AgentError>
    where
        R: Rng + ?Sized,
    {
        let model = ScoringModel::random(&self.shape, rng).map_err(AgentError::Shape)?;
        let normalized = model.encode();
        let mut agent = Agent::new(model, self.depth, self.weight_bound, feature_count)?;
        agent
            .set_parameters(&normalized)
            .map_err(AgentError::Parameters)?;
        Ok(agent)
    }

    /// Rebuilds an agent from raw (non-normalized) model parameters.
    pub fn build(&self, feature_count: usize, raw_parameters: &[f32]) -> Result<Agent, AgentError> {
        let mut model = ScoringModel::zeros(&self.shape).map_err(AgentError::Shape)?;
        model
            .decode(raw_parameters)
            .map_err(AgentError::Parameters)?;
        Agent::new(model, self.depth, self.weight_bound, feature_count)
    }
}

/// A scoring model searched to a fixed depth, with its accumulated fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    model: ScoringModel,
    depth: usize,
    weight_bound: f32,
    fitness: FitnessAccumulator,
}

impl Agent {
    /// Creates an agent for a game whose states produce `feature_count` features.
    pub fn new(
        model: ScoringModel,
        depth: usize,
        weight_bound: f32,
        feature_count: usize,
    ) -> Result<Self, AgentError> {
        if depth == 0 {
            return Err(AgentError::InvalidDepth);
        }
        if !(weight_bound.is_finite() && weight_bound > 0.0) {
            return Err(AgentError::InvalidWeightBound {
                bound: weight_bound,
            });
        }
        if model.input_width() != feature_count {
            return Err(AgentError::InputWidth {
                expected: feature_count,
                actual: model.input_width(),
            });
        }
        Ok(Self {
            model,
            depth,
            weight_bound,
            fitness: FitnessAccumulator::new(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn weight_bound(&self) -> f32 {
        self.weight_bound
    }

    #[must_use]
    pub fn config(&self) -> AgentConfig {
        AgentConfig {
            shape: self.model.shape(),
            depth: self.depth,
            weight_bound: self.weight_bound,
        }
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.model.parameter_count()
    }

    /// Model parameters mapped to `[-1, 1]`.
    #[must_use]
    pub fn parameters(&self) -> Vec<f32> {
        self.model
            .encode()
            .into_iter()
            .map(|raw| raw / self.weight_bound)
            .collect()
    }

    /// Replaces the model parameters from normalized values.
    pub fn set_parameters(&mut self, normalized: &[f32]) -> Result<(), ParameterLengthError> {
        let raw: Vec<f32> = normalized.iter().map(|n| n * self.weight_bound).collect();
        self.model.decode(&raw)
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness.value()
    }

    #[must_use]
    pub fn fight_count(&self) -> usize {
        self.fitness.count()
    }

    pub fn record_fight_result(&mut self, score: f32) {
        self.fitness.record(score);
    }

    pub fn reset_fitness(&mut self) {
        self.fitness.reset();
    }

    /// Chooses a move for the player to move, `None` if the game is over.
    ///
    /// # Panics
    ///
    /// Panics if `S` does not produce as many features as the model expects.
    #[must_use]
    pub fn run<S>(&self, state: &S) -> Option<S::Move>
    where
        S: GameState,
    {
        AdversarialSearch::new(&self.model).select_move(state, self.depth)
    }
}
