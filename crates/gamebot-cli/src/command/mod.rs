use clap::{Parser, Subcommand};

use self::{bench::BenchArg, inspect::InspectArg, play::PlayArg, train::TrainArg};

mod bench;
mod inspect;
mod play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train agents by self-play with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Play a game in the terminal against a bot or another human
    Play(#[clap(flatten)] PlayArg),
    /// Summarize a training log generation by generation
    Inspect(#[clap(flatten)] InspectArg),
    /// Fight the best agent of each logged generation against a reference run
    Bench(#[clap(flatten)] BenchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Bench(arg) => bench::run(&arg)?,
    }
    Ok(())
}
