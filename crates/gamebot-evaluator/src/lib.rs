//! Position scoring and move selection for two-player board games.
//!
//! This crate turns a [`GameState`](gamebot_engine::GameState) into a move choice:
//!
//! 1. **State Evaluation** ([`state_evaluator`]) - Scores a flattened position with a
//!    [`ScoringModel`](scoring_model::ScoringModel) (small fully-connected network) or
//!    with the hand-written tic-tac-toe [`PatternEvaluator`](pattern_evaluator::PatternEvaluator).
//!
//! 2. **Search** ([`search`]) - Explores the game tree with depth-bounded negamax and
//!    single-bound pruning, using the state evaluator at the leaves.
//!
//! 3. **Agent** ([`agent`]) - Couples a scoring model, a depth bound and a running fitness
//!    so the genetic trainer can treat it as an individual.
//!
//! # Architecture
//!
//! ```text
//! Agent (parameters, fitness)
//!     ↓ owns
//! ScoringModel ──implements──> StateEvaluator <──implements── PatternEvaluator
//!     ↑ used by
//! AdversarialSearch (negamax, select move)
//! ```
//!
//! # Example
//!
//! ```rust
//! use gamebot_engine::{GameState, TicTacToeState};
//! use gamebot_evaluator::{pattern_evaluator::PatternEvaluator, search::AdversarialSearch};
//!
//! let evaluator = PatternEvaluator::new();
//! let search = AdversarialSearch::new(&evaluator);
//!
//! // X holds 0 and 1; the winning move is 2.
//! let state = TicTacToeState::new()
//!     .after_move(0)
//!     .after_move(4)
//!     .after_move(1)
//!     .after_move(8);
//! assert_eq!(search.select_move(&state, 2), Some(2));
//! ```

pub mod agent;
pub mod fitness;
pub mod pattern_evaluator;
pub mod scoring_model;
pub mod search;
pub mod state_evaluator;
