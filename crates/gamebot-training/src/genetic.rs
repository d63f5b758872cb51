//! Genetic algorithm training individuals through self-play.
//!
//! # Algorithm Overview
//!
//! [`GeneticTrainer::train`] runs the following cycle once per generation `g`:
//!
//! 1. **Evaluate** - Reset every fitness, then each individual fights
//!    `opponents_per_generation` distinct opponents drawn uniformly from the rest of the
//!    population. Both sides of a fight record their score.
//! 2. **Sort** - Order the population by fitness, best first. The sort is stable, so equal
//!    fitness keeps the previous order.
//! 3. **Log** - Every `log_cadence` generations, append a [`GenerationRecord`].
//! 4. **Evolve** - Keep the top `floor(size · elitism_fraction)` individuals unchanged and
//!    fill the rest of the next generation with children:
//!    - two parents are drawn by roulette wheel over the whole population;
//!    - with probability `crossover_prob` the child is a BLX-α blend of both parents,
//!      otherwise it is a clone of the fitter parent (ties go to the first one);
//!    - the child then goes through non-uniform mutation.
//!
//! # Parallelization
//!
//! Opponents are drawn serially from the trainer's RNG before any fight starts. Fights
//! then run on scoped threads, one per challenger, and their scores are applied in the
//! same order a sequential run would use. Fights draw no randomness, so a seed reproduces
//! a run exactly regardless of thread scheduling.
//!
//! # Example
//!
//! ```rust
//! use gamebot_training::{
//!     FitnessAccumulator,
//!     fight::FightError,
//!     genetic::{Evolvable, GeneticTrainer},
//!     hyper_parameters::HyperParameters,
//! };
//! use gamebot_evaluator::scoring_model::ParameterLengthError;
//! use rand::Rng as _;
//!
//! #[derive(Debug, Clone)]
//! struct Guess {
//!     value: f32,
//!     fitness: FitnessAccumulator,
//! }
//!
//! impl Evolvable for Guess {
//!     fn parameters(&self) -> Vec<f32> {
//!         vec![self.value]
//!     }
//!     fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), ParameterLengthError> {
//!         self.value = parameters[0];
//!         Ok(())
//!     }
//!     fn fitness(&self) -> f32 {
//!         self.fitness.value()
//!     }
//!     fn record_fight_result(&mut self, score: f32) {
//!         self.fitness.record(score);
//!     }
//!     fn reset_fitness(&mut self) {
//!         self.fitness.reset();
//!     }
//! }
//!
//! let score = |g: &Guess| 2.0 - (0.5 - g.value).abs();
//! let fight = move |a: &Guess, b: &Guess| -> Result<(f32, f32), FightError> {
//!     Ok((score(a), score(b)))
//! };
//! let mut trainer = GeneticTrainer::new(fight, HyperParameters::default(), 42).unwrap();
//! trainer
//!     .populate(20, |rng| {
//!         Ok::<_, ParameterLengthError>(Guess {
//!             value: rng.random_range(-1.0..=1.0),
//!             fitness: FitnessAccumulator::new(),
//!         })
//!     })
//!     .unwrap();
//! trainer.train(10).unwrap();
//! assert_eq!(trainer.bests(3).len(), 3);
//! ```

use std::{
    io::{self, Write},
    iter, panic, thread,
};

use gamebot_evaluator::{agent::Agent, scoring_model::ParameterLengthError};
use rand::{Rng as _, SeedableRng as _, seq::index};
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use crate::{
    fight::{FightError, FightFunction},
    hyper_parameters::{HyperParameterError, HyperParameters},
    selection::{SelectionError, SelectionWheel},
    stats::GenerationSummary,
    training_log::{GenerationRecord, TrainingLogError, TrainingLogWriter},
    weights::{self, Progress},
};

/// Genes are kept in `[-GENE_BOUND, GENE_BOUND]`.
const GENE_BOUND: f32 = 1.0;

/// An individual the trainer can evolve.
///
/// Parameters are exchanged in normalized form, in `[-1, 1]`. Fitness is a running
/// average of the fight scores recorded since the last reset.
pub trait Evolvable: Clone + Send + Sync {
    fn parameters(&self) -> Vec<f32>;
    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), ParameterLengthError>;
    fn fitness(&self) -> f32;
    fn record_fight_result(&mut self, score: f32);
    fn reset_fitness(&mut self);
}

impl Evolvable for Agent {
    fn parameters(&self) -> Vec<f32> {
        Agent::parameters(self)
    }

    fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), ParameterLengthError> {
        Agent::set_parameters(self, parameters)
    }

    fn fitness(&self) -> f32 {
        Agent::fitness(self)
    }

    fn record_fight_result(&mut self, score: f32) {
        Agent::record_fight_result(self, score);
    }

    fn reset_fitness(&mut self) {
        Agent::reset_fitness(self);
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid hyper-parameters")]
    HyperParameters(HyperParameterError),
    #[display("population needs at least 2 individuals, got {size}")]
    #[from(ignore)]
    PopulationTooSmall { size: usize },
    #[display("cannot draw {opponents} distinct opponents from a population of {size}")]
    #[from(ignore)]
    TooManyOpponents { opponents: usize, size: usize },
    #[display("parent selection failed")]
    Selection(SelectionError),
    #[display("fight aborted")]
    Fight(FightError),
    #[display("invalid parameter vector")]
    Parameters(ParameterLengthError),
    #[display("cannot write the training log")]
    Log(TrainingLogError),
}

/// Evolves a population of `C` using fights scored by `F`.
#[derive(Debug)]
pub struct GeneticTrainer<C, F> {
    population: Vec<C>,
    fight: F,
    hyper_parameters: HyperParameters,
    rng: Pcg32,
}

impl<C, F> GeneticTrainer<C, F>
where
    C: Evolvable,
    F: FightFunction<C>,
{
    /// Creates a trainer with an empty population.
    ///
    /// All randomness of the run derives from `seed`.
    pub fn new(
        fight: F,
        hyper_parameters: HyperParameters,
        seed: u64,
    ) -> Result<Self, TrainingError> {
        hyper_parameters.validate()?;
        Ok(Self {
            population: vec![],
            fight,
            hyper_parameters,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn hyper_parameters(&self) -> &HyperParameters {
        &self.hyper_parameters
    }

    /// Replaces the population with `size` individuals built by `spawn`.
    ///
    /// `spawn` receives the trainer's RNG so that initialization is reproducible.
    pub fn populate<S, E>(&mut self, size: usize, mut spawn: S) -> Result<(), E>
    where
        S: FnMut(&mut Pcg32) -> Result<C, E>,
    {
        self.population = iter::repeat_with(|| spawn(&mut self.rng))
            .take(size)
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    /// Current population, best first after a [`train`](Self::train) generation.
    #[must_use]
    pub fn population(&self) -> &[C] {
        &self.population
    }

    /// Sorts the population and returns its `n` best individuals.
    pub fn bests(&mut self, n: usize) -> &[C] {
        self.sort();
        &self.population[..n.min(self.population.len())]
    }

    /// Fitness and gene diversity of the current population.
    #[must_use]
    pub fn generation_summary(&self) -> Option<GenerationSummary> {
        let fitness: Vec<f32> = self.population.iter().map(C::fitness).collect();
        let parameters: Vec<Vec<f32>> = self.population.iter().map(C::parameters).collect();
        GenerationSummary::new(&fitness, &parameters)
    }

    /// Trains for `generations` generations without logging.
    pub fn train(&mut self, generations: usize) -> Result<(), TrainingError> {
        self.run::<io::Sink>(generations, None)
    }

    /// Trains for `generations` generations, appending snapshots to `log`.
    pub fn train_with_log<W>(
        &mut self,
        generations: usize,
        log: &mut TrainingLogWriter<W>,
    ) -> Result<(), TrainingError>
    where
        W: Write,
    {
        self.run(generations, Some(log))
    }

    fn run<W>(
        &mut self,
        generations: usize,
        mut log: Option<&mut TrainingLogWriter<W>>,
    ) -> Result<(), TrainingError>
    where
        W: Write,
    {
        self.check_setup()?;

        for generation in 0..generations {
            self.evaluate()?;
            self.sort();

            if let Some(summary) = self.generation_summary() {
                info!(
                    generation,
                    best = summary.fitness.max,
                    mean = summary.fitness.mean,
                    "generation evaluated"
                );
                debug!(
                    generation,
                    min = summary.fitness.min,
                    median = summary.fitness.median,
                    gene_spread = summary.mean_gene_std_dev,
                    "population summary"
                );
            }

            if self.hyper_parameters.is_log_generation(generation) {
                if let Some(log) = log.as_deref_mut() {
                    log.write(&self.record(generation))?;
                }
            }

            self.evolve(Progress {
                generation,
                max_generation: generations,
            })?;
        }
        Ok(())
    }

    fn check_setup(&self) -> Result<(), TrainingError> {
        let size = self.population.len();
        if size < 2 {
            return Err(TrainingError::PopulationTooSmall { size });
        }
        let opponents = self.hyper_parameters.opponents_per_generation;
        if opponents > size - 1 {
            return Err(TrainingError::TooManyOpponents { opponents, size });
        }
        Ok(())
    }

    fn record(&self, generation: usize) -> GenerationRecord {
        GenerationRecord {
            generation,
            fitness: self.population.iter().map(C::fitness).collect(),
            parameters: self.population.iter().map(C::parameters).collect(),
        }
    }

    fn evaluate(&mut self) -> Result<(), TrainingError> {
        for individual in &mut self.population {
            individual.reset_fitness();
        }

        let size = self.population.len();
        let opponents = self.hyper_parameters.opponents_per_generation;
        let pairings: Vec<Vec<usize>> = (0..size)
            .map(|challenger| {
                index::sample(&mut self.rng, size - 1, opponents)
                    .into_iter()
                    .map(|i| if i >= challenger { i + 1 } else { i })
                    .collect()
            })
            .collect();

        let population = &self.population;
        let fight = &self.fight;
        let results: Vec<Result<Vec<(f32, f32)>, FightError>> = thread::scope(|s| {
            let handles: Vec<_> = pairings
                .iter()
                .enumerate()
                .map(|(challenger, opponents)| {
                    s.spawn(move || {
                        opponents
                            .iter()
                            .map(|&opponent| {
                                fight.fight(&population[challenger], &population[opponent])
                            })
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });

        for (challenger, (opponents, scores)) in iter::zip(&pairings, results).enumerate() {
            for (&opponent, (score_a, score_b)) in iter::zip(opponents, scores?) {
                self.population[challenger].record_fight_result(score_a);
                self.population[opponent].record_fight_result(score_b);
            }
        }
        debug!(fights = size * opponents, "population evaluated");
        Ok(())
    }

    fn sort(&mut self) {
        self.population
            .sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    fn evolve(&mut self, progress: Progress) -> Result<(), TrainingError> {
        let fitness: Vec<f32> = self.population.iter().map(C::fitness).collect();
        let wheel = SelectionWheel::new(&fitness)?;
        if wheel.is_uniform() {
            warn!(
                generation = progress.generation,
                "total fitness is zero, selecting parents uniformly"
            );
        }

        let size = self.population.len();
        let elites = self.hyper_parameters.elite_count(size);
        let hp = &self.hyper_parameters;

        let mut next = Vec::with_capacity(size);
        next.extend(self.population[..elites].iter().cloned());

        let mut crossovers = 0;
        while next.len() < size {
            let p1 = &self.population[wheel.sample(&mut self.rng)];
            let p2 = &self.population[wheel.sample(&mut self.rng)];

            let mut child = if self.rng.random_bool(hp.crossover_prob.into()) {
                crossovers += 1;
                let genes = weights::blx_alpha(
                    &p1.parameters(),
                    &p2.parameters(),
                    hp.blx_alpha,
                    GENE_BOUND,
                    &mut self.rng,
                );
                let mut child = p1.clone();
                child.reset_fitness();
                child.set_parameters(&genes)?;
                child
            } else if p2.fitness() > p1.fitness() {
                p2.clone()
            } else {
                p1.clone()
            };

            let mut genes = child.parameters();
            weights::mutate_non_uniform(
                &mut genes,
                hp.mutation_prob,
                hp.mutation_shape,
                progress,
                GENE_BOUND,
                &mut self.rng,
            );
            child.set_parameters(&genes)?;
            next.push(child);
        }
        debug!(
            generation = progress.generation,
            elites, crossovers, "population evolved"
        );

        self.population = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gamebot_evaluator::fitness::FitnessAccumulator;
    use rand::Rng as _;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Dummy {
        genes: Vec<f32>,
        fitness: FitnessAccumulator,
    }

    impl Evolvable for Dummy {
        fn parameters(&self) -> Vec<f32> {
            self.genes.clone()
        }

        fn set_parameters(&mut self, parameters: &[f32]) -> Result<(), ParameterLengthError> {
            if parameters.len() != self.genes.len() {
                return Err(ParameterLengthError {
                    expected: self.genes.len(),
                    actual: parameters.len(),
                });
            }
            self.genes.copy_from_slice(parameters);
            Ok(())
        }

        fn fitness(&self) -> f32 {
            self.fitness.value()
        }

        fn record_fight_result(&mut self, score: f32) {
            self.fitness.record(score);
        }

        fn reset_fitness(&mut self) {
            self.fitness.reset();
        }
    }

    type DummyFight = fn(&Dummy, &Dummy) -> Result<(f32, f32), FightError>;

    fn sum_fight(a: &Dummy, b: &Dummy) -> Result<(f32, f32), FightError> {
        let score = |d: &Dummy| d.genes.iter().map(|g| g + 1.0).sum::<f32>();
        Ok((score(a), score(b)))
    }

    fn trainer(size: usize, hyper_parameters: HyperParameters) -> GeneticTrainer<Dummy, DummyFight> {
        let mut trainer = GeneticTrainer::new(sum_fight as DummyFight, hyper_parameters, 7).unwrap();
        trainer
            .populate(size, |rng| {
                Ok::<_, ParameterLengthError>(Dummy {
                    genes: weights::random(rng, 1.0, 3),
                    fitness: FitnessAccumulator::new(),
                })
            })
            .unwrap();
        trainer
    }

    #[test]
    fn test_setup_errors() {
        let mut small = trainer(1, HyperParameters::default());
        assert!(matches!(
            small.train(1),
            Err(TrainingError::PopulationTooSmall { size: 1 })
        ));

        let mut crowded = trainer(4, HyperParameters::default());
        assert!(matches!(
            crowded.train(1),
            Err(TrainingError::TooManyOpponents {
                opponents: 5,
                size: 4
            })
        ));

        let invalid = HyperParameters {
            mutation_prob: 2.0,
            ..HyperParameters::default()
        };
        assert!(matches!(
            GeneticTrainer::<Dummy, DummyFight>::new(sum_fight, invalid, 0),
            Err(TrainingError::HyperParameters(_))
        ));
    }

    #[test]
    fn test_evaluate_fight_counts() {
        let hp = HyperParameters {
            opponents_per_generation: 3,
            ..HyperParameters::default()
        };
        let mut trainer = trainer(10, hp);
        trainer.evaluate().unwrap();
        let counts: Vec<_> = trainer
            .population()
            .iter()
            .map(|d| d.fitness.count())
            .collect();
        // every challenger fights 3 times, plus once per time it is drawn as an opponent
        assert_eq!(counts.iter().sum::<usize>(), 10 * 3 * 2);
        assert!(counts.iter().all(|c| *c >= 3));

        // constant per-individual scores average to themselves
        for d in trainer.population() {
            let expected = d.genes.iter().map(|g| g + 1.0).sum::<f32>();
            assert!((d.fitness() - expected).abs() < 1e-4);
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_sort_is_descending_and_stable() {
        let mut trainer = trainer(6, HyperParameters::default());
        let fitness = [0.5, 1.0, 0.5, 2.0, 1.0, 0.5];
        for (i, (d, f)) in trainer.population.iter_mut().zip(fitness).enumerate() {
            d.genes[0] = i as f32;
            d.record_fight_result(f);
        }
        trainer.sort();
        let order: Vec<_> = trainer.population().iter().map(|d| d.genes[0]).collect();
        assert_eq!(order, vec![3.0, 1.0, 4.0, 0.0, 2.0, 5.0]);
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let hp = HyperParameters {
            elitism_fraction: 0.1,
            crossover_prob: 0.5,
            mutation_prob: 1.0,
            ..HyperParameters::default()
        };
        let mut trainer = trainer(40, hp);
        for generation in 0..5 {
            trainer.evaluate().unwrap();
            trainer.sort();
            let elites: Vec<Vec<f32>> = trainer.population()[..4]
                .iter()
                .map(Dummy::parameters)
                .collect();
            trainer
                .evolve(Progress {
                    generation,
                    max_generation: 5,
                })
                .unwrap();
            let kept: Vec<Vec<f32>> = trainer.population()[..4]
                .iter()
                .map(Dummy::parameters)
                .collect();
            assert_eq!(kept, elites);
            assert_eq!(trainer.population().len(), 40);
            assert!(
                trainer
                    .population()
                    .iter()
                    .flat_map(|d| &d.genes)
                    .all(|g| (-1.0..=1.0).contains(g))
            );
        }
    }

    #[test]
    fn test_invalid_fitness_aborts() {
        let fight: fn(&Dummy, &Dummy) -> Result<(f32, f32), FightError> =
            |_, _| Ok((-1.0, 0.0));
        let mut trainer = GeneticTrainer::new(fight, HyperParameters::default(), 0).unwrap();
        trainer
            .populate(10, |rng| {
                Ok::<_, ParameterLengthError>(Dummy {
                    genes: vec![rng.random_range(-1.0..=1.0)],
                    fitness: FitnessAccumulator::new(),
                })
            })
            .unwrap();
        assert!(matches!(
            trainer.train(1),
            Err(TrainingError::Selection(SelectionError::InvalidFitness { .. }))
        ));
    }

    #[test]
    fn test_zero_fitness_still_evolves() {
        let fight: fn(&Dummy, &Dummy) -> Result<(f32, f32), FightError> = |_, _| Ok((0.0, 0.0));
        let mut trainer = GeneticTrainer::new(fight, HyperParameters::default(), 0).unwrap();
        trainer
            .populate(10, |rng| {
                Ok::<_, ParameterLengthError>(Dummy {
                    genes: vec![rng.random_range(-1.0..=1.0)],
                    fitness: FitnessAccumulator::new(),
                })
            })
            .unwrap();
        trainer.train(3).unwrap();
        assert_eq!(trainer.population().len(), 10);
    }

    #[test]
    fn test_logs_every_cadence() {
        let hp = HyperParameters {
            log_cadence: 2,
            ..HyperParameters::default()
        };
        let mut trainer = trainer(12, hp);
        let mut log = TrainingLogWriter::new(Vec::new());
        trainer.train_with_log(5, &mut log).unwrap();
        let log = crate::training_log::TrainingLog::read(log.into_inner().as_slice()).unwrap();
        let generations: Vec<_> = log.records().iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![0, 2, 4]);
        for record in log.records() {
            assert_eq!(record.fitness.len(), 12);
            assert_eq!(record.parameters.len(), 12);
            assert!(record.fitness.is_sorted_by(|a, b| a >= b));
        }
    }

    #[test]
    fn test_fight_error_aborts() {
        let fight: fn(&Dummy, &Dummy) -> Result<(f32, f32), FightError> = |_, _| {
            Err(FightError::NoMove {
                player: gamebot_engine::Player::First,
            })
        };
        let mut trainer = GeneticTrainer::new(fight, HyperParameters::default(), 0).unwrap();
        trainer
            .populate(10, |rng| {
                Ok::<_, ParameterLengthError>(Dummy {
                    genes: vec![rng.random_range(-1.0..=1.0)],
                    fitness: FitnessAccumulator::new(),
                })
            })
            .unwrap();
        assert!(matches!(trainer.train(1), Err(TrainingError::Fight(_))));
    }
}
