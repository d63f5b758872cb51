use std::{fmt, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{IllegalMoveError, Player};

/// An immutable game position.
///
/// Implementations must uphold the following invariants, which the search relies on:
///
/// - [`possible_next_states`](Self::possible_next_states) yields a finite sequence in a
///   deterministic order, and calling it again yields the same sequence.
/// - Generating, exploring and dropping a successor never changes `self`.
/// - On a terminal position, [`is_tie`](Self::is_tie) and [`has_won`](Self::has_won) are
///   mutually exclusive, and at least one of them holds once the board is full.
/// - [`features`](Self::features) yields exactly [`FEATURE_COUNT`](Self::FEATURE_COUNT)
///   values: the player to move, then every board cell.
pub trait GameState: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// Engine-specific move identifier.
    type Move: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync;

    /// Length of the flattened feature vector.
    const FEATURE_COUNT: usize;

    /// The player whose turn it is.
    fn player(&self) -> Player;

    /// The player who moves after [`player`](Self::player), i.e. the one who made
    /// [`last_move`](Self::last_move).
    fn next_player(&self) -> Player {
        self.player().opponent()
    }

    /// The move that produced this position, `None` for a position that was not reached by
    /// a move.
    fn last_move(&self) -> Option<Self::Move>;

    fn possible_next_states(&self) -> impl Iterator<Item = Self> + '_;

    fn has_won(&self, player: Player) -> bool;

    /// Returns `true` when the board is full and nobody has won.
    fn is_tie(&self) -> bool;

    fn features(&self) -> impl Iterator<Item = f32> + '_;

    fn outcome(&self) -> Option<Outcome> {
        Player::ALL
            .into_iter()
            .find(|player| self.has_won(*player))
            .map(Outcome::Win)
            .or_else(|| self.is_tie().then_some(Outcome::Tie))
    }

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Tie,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(player) => write!(f, "player {} ({}) won", player, player.symbol()),
            Self::Tie => f.write_str("tie"),
        }
    }
}

/// A game in progress.
///
/// The engine owns the current [`GameState`] and applies validated moves to it. Automated
/// players submit their moves through [`algo_play`](Self::algo_play), humans through
/// [`play`](Self::play); the two only differ when an engine needs extra bookkeeping
/// around the automated side's turn.
pub trait GameEngine {
    type State: GameState;

    fn state(&self) -> &Self::State;

    /// Number of moves played since the last reset.
    fn turn(&self) -> usize;

    /// Applies `mv` for the player to move.
    fn play(&mut self, mv: <Self::State as GameState>::Move) -> Result<(), IllegalMoveError>;

    /// Restores the initial position.
    fn reset(&mut self);

    fn algo_play(
        &mut self,
        mv: <Self::State as GameState>::Move,
    ) -> Result<(), IllegalMoveError> {
        self.play(mv)
    }

    fn current_player(&self) -> Player {
        self.state().player()
    }

    /// Returns the outcome, or `None` while the game is undecided.
    fn winner(&self) -> Option<Outcome> {
        self.state().outcome()
    }

    fn is_over(&self) -> bool {
        self.winner().is_some()
    }
}
