use std::path::PathBuf;

use anyhow::Context as _;
use gamebot_training::{
    stats::{DescriptiveStats, GenerationSummary},
    training_log::TrainingLog,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// Training log written by `gamebot train --log`
    #[arg(value_name = "LOG")]
    log: PathBuf,
    /// Also print every parameter of the best agent
    #[arg(long)]
    genes: bool,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let log = TrainingLog::open(&arg.log)
        .with_context(|| format!("Failed to read training log: {}", arg.log.display()))?;
    eprintln!(
        "Loaded {} generations from {}",
        log.records().len(),
        arg.log.display()
    );

    println!(
        "{:>10}  {:>8}  {:>8}  {:>8}  {:>10}  {:>10}",
        "generation", "best", "mean", "min", "best gene", "gene std"
    );
    for record in log.records() {
        let Some(summary) = GenerationSummary::new(&record.fitness, &record.parameters) else {
            println!("{:>10}  (empty generation)", record.generation);
            continue;
        };
        let best_gene_mean = record
            .best_parameters()
            .and_then(|p| DescriptiveStats::new(p.iter().copied()))
            .map_or(f32::NAN, |s| s.mean);
        println!(
            "{:>10}  {:>8.4}  {:>8.4}  {:>8.4}  {:>10.4}  {:>10.4}",
            record.generation,
            summary.fitness.max,
            summary.fitness.mean,
            summary.fitness.min,
            best_gene_mean,
            summary.mean_gene_std_dev,
        );
        if arg.genes {
            if let Some(parameters) = record.best_parameters() {
                println!("            {parameters:.3?}");
            }
        }
    }
    Ok(())
}
