//! Scoring of a single flattened position.
//!
//! A state evaluator receives the feature vector produced by
//! [`GameState::features`](gamebot_engine::GameState::features) and returns a heuristic
//! value. The value is expressed from the point of view of the player who made the move
//! leading to the position (the *next* player of that state), which is the convention
//! [`AdversarialSearch`](crate::search::AdversarialSearch) expects at its leaves.

use std::fmt;

/// Evaluates positions by assigning scores.
///
/// Implementations must return finite values; the search clamps them so that a forced
/// win or loss always outranks any heuristic score.
pub trait StateEvaluator: fmt::Debug + Send + Sync {
    /// Number of features this evaluator expects.
    fn input_width(&self) -> usize;

    /// Scores a feature vector (higher is better for the player who just moved).
    ///
    /// # Panics
    ///
    /// Implementations may panic if `features.len() != self.input_width()`.
    fn evaluate_state(&self, features: &[f32]) -> f32;
}

impl<E> StateEvaluator for &E
where
    E: StateEvaluator + ?Sized,
{
    fn input_width(&self) -> usize {
        (**self).input_width()
    }

    fn evaluate_state(&self, features: &[f32]) -> f32 {
        (**self).evaluate_state(features)
    }
}
