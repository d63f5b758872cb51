use std::path::PathBuf;

use anyhow::Context as _;
use gamebot_engine::{Connect4, GameKind, TicTacToe};
use gamebot_evaluator::agent::{Agent, AgentConfig};
use gamebot_training::{
    fight::{FightFunction, GameFight},
    genetic::GeneticTrainer,
    hyper_parameters::HyperParameters,
    training_log::TrainingLogWriter,
};

use crate::{
    schema::agent_model::AgentModel,
    util::{self, Output},
};

const HIDDEN_WIDTH: usize = 5;
const REPORTED_BESTS: usize = 5;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Game to train on
    #[arg(long, default_value = "tictactoe")]
    game: GameKind,
    /// Number of agents per generation
    #[arg(long, default_value_t = 100)]
    population: usize,
    /// Number of generations to run
    #[arg(long, default_value_t = 50)]
    generations: usize,
    /// Scoring model layer widths, input first (default: `<features>,5,1`)
    #[arg(long, value_delimiter = ',')]
    shape: Option<Vec<usize>>,
    /// Search depth of every agent
    #[arg(long, default_value_t = 2)]
    depth: usize,
    /// Raw weights live in `[-bound, bound]`
    #[arg(long, default_value_t = 1.0)]
    weight_bound: f32,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Hyper-parameters JSON file; flags below override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long)]
    crossover_prob: Option<f32>,
    #[arg(long)]
    blx_alpha: Option<f32>,
    #[arg(long)]
    mutation_prob: Option<f32>,
    #[arg(long)]
    mutation_shape: Option<f32>,
    #[arg(long)]
    elitism_fraction: Option<f64>,
    /// Opponents fought by each agent per generation
    #[arg(long)]
    opponents: Option<usize>,
    /// Log every N generations
    #[arg(long)]
    log_cadence: Option<usize>,
    /// Training log output (JSON Lines)
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,
    /// Name stored in the saved model
    #[arg(long, default_value = "gamebot")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn hyper_parameters(&self) -> anyhow::Result<HyperParameters> {
        let mut hp = match &self.config {
            Some(path) => util::read_hyper_parameters_file(path)?,
            None => HyperParameters::default(),
        };
        if let Some(v) = self.crossover_prob {
            hp.crossover_prob = v;
        }
        if let Some(v) = self.blx_alpha {
            hp.blx_alpha = v;
        }
        if let Some(v) = self.mutation_prob {
            hp.mutation_prob = v;
        }
        if let Some(v) = self.mutation_shape {
            hp.mutation_shape = v;
        }
        if let Some(v) = self.elitism_fraction {
            hp.elitism_fraction = v;
        }
        if let Some(v) = self.opponents {
            hp.opponents_per_generation = v;
        }
        if let Some(v) = self.log_cadence {
            hp.log_cadence = v;
        }
        hp.validate().context("Invalid hyper-parameters")?;
        Ok(hp)
    }

    fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            shape: self
                .shape
                .clone()
                .unwrap_or_else(|| vec![self.game.feature_count(), HIDDEN_WIDTH, 1]),
            depth: self.depth,
            weight_bound: self.weight_bound,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let hyper_parameters = arg.hyper_parameters()?;
    let config = arg.agent_config();
    let seed = arg.seed.unwrap_or_else(rand::random);

    tracing::info!(
        game = %arg.game,
        population = arg.population,
        generations = arg.generations,
        shape = ?config.shape,
        depth = config.depth,
        seed,
        "starting training"
    );

    let best = match arg.game {
        GameKind::TicTacToe => train(
            arg,
            &config,
            GameFight::<TicTacToe>::new(),
            hyper_parameters,
            seed,
        )?,
        GameKind::Connect4 => train(
            arg,
            &config,
            GameFight::<Connect4>::new(),
            hyper_parameters,
            seed,
        )?,
    };

    let model = AgentModel::from_agent(arg.name.clone(), arg.game, &best);
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Game: {}", model.game);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);
    eprintln!("  Parameters: {}", model.parameters.len());

    Ok(())
}

fn train<F>(
    arg: &TrainArg,
    config: &AgentConfig,
    fight: F,
    hyper_parameters: HyperParameters,
    seed: u64,
) -> anyhow::Result<Agent>
where
    F: FightFunction<Agent>,
{
    let feature_count = arg.game.feature_count();
    let mut trainer = GeneticTrainer::new(fight, hyper_parameters, seed)?;
    trainer
        .populate(arg.population, |rng| config.spawn(feature_count, rng))
        .context("Failed to create the initial population")?;

    match &arg.log {
        Some(path) => {
            let mut log = TrainingLogWriter::create(path)
                .with_context(|| format!("Failed to create training log: {}", path.display()))?;
            trainer.train_with_log(arg.generations, &mut log)?;
        }
        None => trainer.train(arg.generations)?,
    }

    eprintln!("Best Individuals:");
    for (i, agent) in trainer.bests(REPORTED_BESTS).iter().enumerate() {
        eprintln!(
            "  {i:2}: fitness {:.3} over {} fights",
            agent.fitness(),
            agent.fight_count()
        );
    }
    eprintln!("{} training completed.", arg.game);

    trainer
        .bests(1)
        .first()
        .cloned()
        .context("Population is empty")
}
