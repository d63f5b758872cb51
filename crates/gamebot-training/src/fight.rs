//! Scoring of head-to-head games.
//!
//! A [`FightFunction`] plays two individuals against each other and returns a non-negative
//! score for each. [`GameFight`] is the standard implementation for [`Agent`]s: the first
//! agent plays first, and
//!
//! | Result | First agent | Second agent |
//! |--------|-------------|--------------|
//! | first wins  | `2 / turns` | `0` |
//! | second wins | `0` | `2 / turns` |
//! | tie         | `1 / turns` | `1 / turns` |
//!
//! A tie can only happen on a full board, so any win outscores a tie, and faster wins
//! score higher than slow ones.

use std::{fmt, marker::PhantomData};

use gamebot_engine::{GameEngine, GameState, IllegalMoveError, Outcome, Player};
use gamebot_evaluator::agent::Agent;

#[derive(Debug, Clone, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum FightError {
    #[display("agent played an illegal move")]
    IllegalMove(IllegalMoveError),
    #[display("player {player} found no move on a live board")]
    #[from(ignore)]
    NoMove { player: Player },
}

/// Plays two individuals against each other.
pub trait FightFunction<C>: Sync {
    /// Returns the scores of `a` and `b`, both non-negative.
    fn fight(&self, a: &C, b: &C) -> Result<(f32, f32), FightError>;
}

impl<C, F> FightFunction<C> for F
where
    F: Fn(&C, &C) -> Result<(f32, f32), FightError> + Sync,
{
    fn fight(&self, a: &C, b: &C) -> Result<(f32, f32), FightError> {
        self(a, b)
    }
}

/// Result of a game played to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub turns: usize,
}

impl MatchResult {
    /// Turn-normalized scores of the first and second player.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn scores(&self) -> (f32, f32) {
        let turns = self.turns.max(1) as f32;
        match self.outcome {
            Outcome::Win(Player::First) => (2.0 / turns, 0.0),
            Outcome::Win(Player::Second) => (0.0, 2.0 / turns),
            Outcome::Tie => (1.0 / turns, 1.0 / turns),
        }
    }
}

/// Plays a game from the engine's current position until it is over.
///
/// `first` and `second` choose the moves of [`Player::First`] and [`Player::Second`].
pub fn play_match<E, A, B>(engine: &mut E, first: A, second: B) -> Result<MatchResult, FightError>
where
    E: GameEngine,
    A: Fn(&E::State) -> Option<<E::State as GameState>::Move>,
    B: Fn(&E::State) -> Option<<E::State as GameState>::Move>,
{
    loop {
        if let Some(outcome) = engine.winner() {
            return Ok(MatchResult {
                outcome,
                turns: engine.turn(),
            });
        }
        let player = engine.current_player();
        let mv = match player {
            Player::First => first(engine.state()),
            Player::Second => second(engine.state()),
        };
        let mv = mv.ok_or(FightError::NoMove { player })?;
        engine.algo_play(mv)?;
    }
}

/// Fight function playing [`Agent`]s on a fresh `E` game.
pub struct GameFight<E> {
    engine: PhantomData<fn() -> E>,
}

impl<E> GameFight<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            engine: PhantomData,
        }
    }
}

impl<E> Default for GameFight<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for GameFight<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameFight")
            .field("engine", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E> FightFunction<Agent> for GameFight<E>
where
    E: GameEngine + Default,
{
    fn fight(&self, a: &Agent, b: &Agent) -> Result<(f32, f32), FightError> {
        let mut engine = E::default();
        let result = play_match(&mut engine, |s| a.run(s), |s| b.run(s))?;
        Ok(result.scores())
    }
}
