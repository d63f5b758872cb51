//! Training system evolving game-playing agents through self-play.
//!
//! This crate implements a genetic algorithm over parameter vectors. Each individual is
//! scored by fighting a random sample of the rest of its generation, and the fittest
//! individuals breed the next one.
//!
//! # How Training Works
//!
//! 1. **Population** - Spawn individuals with random parameters in `[-1, 1]`
//! 2. **Evaluation** - Every individual fights a few distinct opponents ([`fight`])
//! 3. **Fitness** - Each fight score is folded into a running average ([`FitnessAccumulator`])
//! 4. **Selection** - Parents are drawn by roulette wheel ([`selection`])
//! 5. **Reproduction** - Elites are kept, the rest is bred by BLX-α crossover and
//!    non-uniform mutation ([`weights`])
//! 6. **Logging** - Sorted snapshots go to a JSON Lines log ([`training_log`])
//!
//! # Architecture
//!
//! ```text
//! GeneticTrainer (genetic)
//!     ↓ evolves
//! Evolvable individuals (Agent from gamebot-evaluator)
//!     ↓ played by
//! FightFunction (GameFight on a gamebot-engine game)
//!     ↓ produces
//! Fight scores → fitness
//!     ↓ guides
//! Selection & Reproduction
//! ```
//!
//! See the [`genetic`] module for the generation cycle and an end-to-end example.

pub mod fight;
pub mod genetic;
pub mod hyper_parameters;
pub mod selection;
pub mod stats;
pub mod training_log;
pub mod weights;

pub use gamebot_evaluator::fitness::FitnessAccumulator;
