//! Depth-bounded negamax search.
//!
//! # Sign Convention
//!
//! [`AdversarialSearch::value`] returns the value of a position *for the player who made
//! the move leading to it* (the state's [`next_player`](GameState::next_player)). A
//! child's value is therefore already expressed for the parent's player to move, so the
//! parent keeps the maximum of its children as is and negates exactly once, when it
//! returns.
//!
//! # Scores
//!
//! | Position                       | Value                        |
//! |--------------------------------|------------------------------|
//! | the player who just moved won  | `WIN_SCORE + remaining_depth` |
//! | the player to move has won     | `-(WIN_SCORE + remaining_depth)` |
//! | tie                            | `0`                          |
//! | depth exhausted                | heuristic, clamped to `±WIN_SCORE / 2` |
//!
//! Adding the remaining depth makes the search prefer the fastest win and the slowest
//! loss. The clamp guarantees that a forced result always outranks any heuristic score.
//!
//! # Pruning
//!
//! Every node receives its parent's best value so far as a single bound. Once a node's
//! own running value can no longer beat that bound, the remaining siblings are skipped
//! (fail-soft: the partial value is returned). Because ties between children are broken
//! with a strict `>` (first child in enumeration order wins), pruning never changes the
//! selected move.

use gamebot_engine::GameState;

use crate::state_evaluator::StateEvaluator;

/// Base score of a forced win.
pub const WIN_SCORE: f32 = 1.0e6;

const HEURISTIC_LIMIT: f32 = WIN_SCORE / 2.0;

/// Negamax searcher using a [`StateEvaluator`] at the leaves.
#[derive(Debug, Clone, Copy)]
pub struct AdversarialSearch<'a> {
    evaluator: &'a dyn StateEvaluator,
}

impl<'a> AdversarialSearch<'a> {
    #[must_use]
    pub fn new(evaluator: &'a dyn StateEvaluator) -> Self {
        Self { evaluator }
    }

    /// Selects the best move for the player to move, looking `max_depth` plies ahead.
    ///
    /// Returns `None` when `max_depth` is zero (pure heuristic, nothing to choose from) or
    /// when `state` is terminal.
    #[must_use]
    pub fn select_move<S>(&self, state: &S, max_depth: usize) -> Option<S::Move>
    where
        S: GameState,
    {
        if max_depth == 0 || state.is_terminal() {
            return None;
        }

        let mut best_score = f32::NEG_INFINITY;
        let mut best_move = None;
        for child in state.possible_next_states() {
            let score = self.negamax(&child, max_depth - 1, best_score);
            if score > best_score {
                best_score = score;
                best_move = child.last_move();
            }
        }
        best_move
    }

    /// Value of `state` for the player who moved into it, searched `depth` plies deep.
    #[must_use]
    pub fn value<S>(&self, state: &S, depth: usize) -> f32
    where
        S: GameState,
    {
        self.negamax(state, depth, f32::NEG_INFINITY)
    }

    #[expect(clippy::cast_precision_loss)]
    fn negamax<S>(&self, state: &S, depth: usize, bound: f32) -> f32
    where
        S: GameState,
    {
        if state.has_won(state.player()) {
            return -(WIN_SCORE + depth as f32);
        }
        if state.has_won(state.next_player()) {
            return WIN_SCORE + depth as f32;
        }
        if state.is_tie() {
            return 0.0;
        }
        if depth == 0 {
            return self.heuristic(state);
        }

        let mut best = f32::NEG_INFINITY;
        for child in state.possible_next_states() {
            let score = self.negamax(&child, depth - 1, best);
            if score > best {
                best = score;
                if -best <= bound {
                    return -best;
                }
            }
        }
        -best
    }

    fn heuristic<S>(&self, state: &S) -> f32
    where
        S: GameState,
    {
        let features: Vec<f32> = state.features().collect();
        self.evaluator
            .evaluate_state(&features)
            .clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
    }
}
