use std::path::{Path, PathBuf};

use anyhow::Context as _;
use gamebot_engine::{Connect4, GameEngine, GameKind, Outcome, Player, TicTacToe};
use gamebot_evaluator::agent::{Agent, AgentConfig};
use gamebot_training::{fight, training_log::TrainingLog};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Training log to benchmark
    #[arg(value_name = "LOG")]
    log: PathBuf,
    /// Reference training log whose best agents serve as opponents
    #[arg(long, value_name = "FILE")]
    reference: PathBuf,
    /// Game both logs were trained on
    #[arg(long, default_value = "tictactoe")]
    game: GameKind,
    /// Scoring model layer widths used by both runs
    #[arg(long, value_delimiter = ',', required = true)]
    shape: Vec<usize>,
    /// Search depth used during the benchmark fights
    #[arg(long, default_value_t = 1)]
    depth: usize,
    /// Weight bound used by both runs
    #[arg(long, default_value_t = 1.0)]
    weight_bound: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    wins: usize,
    ties: usize,
    losses: usize,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Player::First) => self.wins += 1,
            Outcome::Win(Player::Second) => self.losses += 1,
            Outcome::Tie => self.ties += 1,
        }
    }
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let config = AgentConfig {
        shape: arg.shape.clone(),
        depth: arg.depth,
        weight_bound: arg.weight_bound,
    };
    let (generations, candidates) = load_bests(&arg.log, &config, arg.game)?;
    let (_, references) = load_bests(&arg.reference, &config, arg.game)?;
    eprintln!(
        "Benchmarking {} generations against {} reference agents",
        candidates.len(),
        references.len()
    );

    println!("{:>10}  {:>5}  {:>5}  {:>6}", "generation", "wins", "ties", "losses");
    for (generation, candidate) in generations.iter().zip(&candidates) {
        let tally = match arg.game {
            GameKind::TicTacToe => fight_references::<TicTacToe>(candidate, &references)?,
            GameKind::Connect4 => fight_references::<Connect4>(candidate, &references)?,
        };
        println!(
            "{generation:>10}  {:>5}  {:>5}  {:>6}",
            tally.wins, tally.ties, tally.losses
        );
    }
    Ok(())
}

/// Rebuilds the best agent of every logged generation.
fn load_bests(
    path: &Path,
    config: &AgentConfig,
    game: GameKind,
) -> anyhow::Result<(Vec<usize>, Vec<Agent>)> {
    let log = TrainingLog::open(path)
        .with_context(|| format!("Failed to read training log: {}", path.display()))?;
    log.records()
        .iter()
        .filter_map(|record| Some((record.generation, record.best_parameters()?)))
        .map(|(generation, normalized)| -> anyhow::Result<(usize, Agent)> {
            let raw: Vec<f32> = normalized.iter().map(|p| p * config.weight_bound).collect();
            let agent = config.build(game.feature_count(), &raw).with_context(|| {
                format!(
                    "Generation {generation} of {} does not fit the model shape",
                    path.display()
                )
            })?;
            Ok((generation, agent))
        })
        .collect::<anyhow::Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().unzip())
}

fn fight_references<E>(candidate: &Agent, references: &[Agent]) -> anyhow::Result<Tally>
where
    E: GameEngine + Default,
{
    let mut tally = Tally::default();
    for reference in references {
        let mut engine = E::default();
        let result = fight::play_match(&mut engine, |s| candidate.run(s), |s| reference.run(s))?;
        tally.record(result.outcome);
    }
    Ok(tally)
}
