//! Two-player perfect-information board games for the gamebot agents.
//!
//! The crate exposes two layers:
//!
//! - [`GameState`] - an immutable position that can enumerate its successors, report
//!   terminal conditions and flatten itself into a feature vector for scoring.
//! - [`GameEngine`] - a mutable game in progress that validates and applies moves.
//!
//! Search and training code only ever talk to these traits. The concrete rules live in
//! [`games`]: [`TicTacToe`] (three-in-a-row on 3×3) and [`Connect4`] (four-in-a-row on
//! 6×7 with gravity).
//!
//! # Example
//!
//! ```
//! use gamebot_engine::{GameEngine, GameState, Outcome, Player, TicTacToe};
//!
//! let mut game = TicTacToe::new();
//! for cell in [0, 3, 1, 4, 2] {
//!     game.play(cell).unwrap();
//! }
//!
//! assert!(game.is_over());
//! assert_eq!(game.winner(), Some(Outcome::Win(Player::First)));
//! assert!(game.state().has_won(Player::First));
//! ```

pub use self::{games::*, player::*, state::*};

pub mod games;
mod player;
mod state;

/// A move was rejected by a [`GameEngine`].
///
/// Automated players never produce illegal moves unless the search or the game rules are
/// broken, so training treats this error as fatal.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("illegal move {mv} by player {player}")]
pub struct IllegalMoveError {
    player: Player,
    mv: String,
}

impl IllegalMoveError {
    #[must_use]
    pub fn new<M>(player: Player, mv: M) -> Self
    where
        M: std::fmt::Display,
    {
        Self {
            player,
            mv: mv.to_string(),
        }
    }

    #[must_use]
    pub fn player(&self) -> Player {
        self.player
    }
}
