use std::{
    fmt,
    io::{self, BufRead, StdinLock},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context as _, bail, ensure};
use gamebot_engine::{Connect4, GameEngine, GameKind, GameState, Outcome, Player, TicTacToe};
use gamebot_evaluator::{
    pattern_evaluator::PatternEvaluator, search::AdversarialSearch,
    state_evaluator::StateEvaluator,
};

use crate::util;

/// Search depth of the pattern bot when `--depth` is not given.
const PATTERN_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
enum PlayerKind {
    #[display("human")]
    Human,
    #[display("bot")]
    Bot,
    #[display("pattern")]
    Pattern,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game to play
    #[arg(long, default_value = "tictactoe")]
    game: GameKind,
    /// Who plays first: human, bot or pattern
    #[arg(long, default_value = "human")]
    first: PlayerKind,
    /// Who plays second: human, bot or pattern
    #[arg(long, default_value = "bot")]
    second: PlayerKind,
    /// Trained agent model used by `bot` players
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,
    /// Search depth of bot players (default: the model's depth)
    #[arg(long)]
    depth: Option<usize>,
}

#[derive(Debug)]
enum Side {
    Human,
    Search {
        evaluator: Box<dyn StateEvaluator>,
        depth: usize,
    },
}

impl Side {
    fn choose<S>(&self, state: &S, input: &mut StdinLock<'static>) -> anyhow::Result<S::Move>
    where
        S: GameState,
        S::Move: FromStr,
    {
        match self {
            Self::Human => read_move(state.player(), input),
            Self::Search { evaluator, depth } => AdversarialSearch::new(evaluator.as_ref())
                .select_move(state, *depth)
                .with_context(|| format!("Bot {} found no move", state.player())),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let first = build_side(arg, arg.first)?;
    let second = build_side(arg, arg.second)?;
    let outcome = match arg.game {
        GameKind::TicTacToe => play(TicTacToe::new(), [&first, &second])?,
        GameKind::Connect4 => play(Connect4::new(), [&first, &second])?,
    };
    println!("Game over: {outcome}");
    Ok(())
}

fn build_side(arg: &PlayArg, kind: PlayerKind) -> anyhow::Result<Side> {
    let feature_count = arg.game.feature_count();
    let side = match kind {
        PlayerKind::Human => Side::Human,
        PlayerKind::Pattern => {
            let evaluator = PatternEvaluator::new();
            ensure!(
                evaluator.input_width() == feature_count,
                "The pattern bot only plays tic-tac-toe"
            );
            Side::Search {
                evaluator: Box::new(evaluator),
                depth: arg.depth.unwrap_or(PATTERN_DEPTH),
            }
        }
        PlayerKind::Bot => {
            let Some(path) = &arg.model else {
                bail!("A bot player needs a trained model (--model)");
            };
            let model = util::read_agent_model_file(path)?;
            ensure!(
                model.game == arg.game,
                "Model {} was trained on {}, not {}",
                model.name,
                model.game,
                arg.game
            );
            let agent = model.to_agent()?;
            tracing::info!(name = %model.name, fitness = model.final_fitness, "loaded model");
            Side::Search {
                depth: arg.depth.unwrap_or(agent.depth()),
                evaluator: Box::new(agent.model().clone()),
            }
        }
    };
    Ok(side)
}

fn play<E>(mut engine: E, sides: [&Side; 2]) -> anyhow::Result<Outcome>
where
    E: GameEngine,
    E::State: fmt::Display,
    <E::State as GameState>::Move: FromStr,
{
    let mut input = io::stdin().lock();
    loop {
        println!("{}", engine.state());
        if let Some(outcome) = engine.winner() {
            return Ok(outcome);
        }

        let player = engine.current_player();
        let side = sides[player.index()];
        let mv = side.choose(engine.state(), &mut input)?;
        match (side, engine.algo_play(mv)) {
            (_, Ok(())) => println!("Player {player} ({}) plays {mv}", player.symbol()),
            (Side::Human, Err(e)) => eprintln!("{e}, try again"),
            (Side::Search { .. }, Err(e)) => {
                return Err(e).context("Bot played an illegal move");
            }
        }
    }
}

fn read_move<M>(player: Player, input: &mut StdinLock<'static>) -> anyhow::Result<M>
where
    M: FromStr,
{
    let mut line = String::new();
    loop {
        eprint!("Player {player} ({}) move: ", player.symbol());
        line.clear();
        let read = input
            .read_line(&mut line)
            .context("Failed to read a move from stdin")?;
        ensure!(read > 0, "Input closed before the game ended");
        match line.trim().parse() {
            Ok(mv) => return Ok(mv),
            Err(_) => eprintln!("Not a move: {:?}", line.trim()),
        }
    }
}
