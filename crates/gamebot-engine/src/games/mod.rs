//! Concrete game rules.
//!
//! - [`TicTacToe`] / [`TicTacToeState`] - 3×3 board, a move is a cell index `0..9` in
//!   row-major order, three in a row wins.
//! - [`Connect4`] / [`Connect4State`] - 6 rows × 7 columns with gravity, a move is a
//!   column index `0..7`, four in a row (any direction) wins.
//!
//! Both boards are small `Copy` arrays, so every successor produced during search is an
//! independent value and siblings never alias each other.

use serde::{Deserialize, Serialize};

pub use self::{connect4::*, tictactoe::*};

mod connect4;
mod tictactoe;

/// Identifies one of the bundled games.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::FromStr,
    derive_more::Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    #[default]
    #[display("tictactoe")]
    TicTacToe,
    #[display("connect4")]
    Connect4,
}

impl GameKind {
    /// Length of the feature vector produced by this game's states.
    #[must_use]
    pub const fn feature_count(self) -> usize {
        use crate::GameState as _;
        match self {
            Self::TicTacToe => TicTacToeState::FEATURE_COUNT,
            Self::Connect4 => Connect4State::FEATURE_COUNT,
        }
    }
}
