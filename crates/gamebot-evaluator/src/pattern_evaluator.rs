//! Hand-written tic-tac-toe heuristic.
//!
//! Counts the two-in-a-line patterns on the board: every pair of cells that share a
//! row, a column or a diagonal and are owned by the same player. Pairs of the player who
//! just moved count `+1`, pairs of the player to move count `-1`.
//!
//! It gives very basic hints, enough to beat a beginner, and serves as a fixed sparring
//! partner and as the `pattern` bot of the CLI.

use gamebot_engine::{GameState as _, TICTACTOE_LINES, TicTacToeState};

use crate::state_evaluator::StateEvaluator;

const PATTERN_COUNT: usize = TICTACTOE_LINES.len() * 3;

const fn two_piece_patterns() -> [(usize, usize); PATTERN_COUNT] {
    let mut patterns = [(0, 0); PATTERN_COUNT];
    let mut i = 0;
    while i < TICTACTOE_LINES.len() {
        let [a, b, c] = TICTACTOE_LINES[i];
        patterns[i * 3] = (a, b);
        patterns[i * 3 + 1] = (a, c);
        patterns[i * 3 + 2] = (b, c);
        i += 1;
    }
    patterns
}

const TWO_PIECE_PATTERNS: [(usize, usize); PATTERN_COUNT] = two_piece_patterns();

/// Two-in-a-line pattern counter for [`TicTacToeState`] feature vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEvaluator {}

impl PatternEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self {}
    }
}

impl StateEvaluator for PatternEvaluator {
    fn input_width(&self) -> usize {
        TicTacToeState::FEATURE_COUNT
    }

    #[expect(clippy::float_cmp)]
    fn evaluate_state(&self, features: &[f32]) -> f32 {
        assert_eq!(features.len(), TicTacToeState::FEATURE_COUNT);
        let to_move = features[0];
        let mover = 1.0 - to_move;
        let cells = &features[1..];

        let mut score = 0.0;
        for (i, j) in TWO_PIECE_PATTERNS {
            if cells[i] != cells[j] {
                continue;
            }
            if cells[i] == mover {
                score += 1.0;
            } else if cells[i] == to_move {
                score -= 1.0;
            }
        }
        score
    }
}
