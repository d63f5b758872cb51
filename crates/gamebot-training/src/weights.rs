//! Gene vector operations for the genetic algorithm.
//!
//! Genes are the normalized parameters of an individual and always live in
//! `[-bound, bound]` (the trainer uses `bound = 1.0`).
//!
//! # Operations
//!
//! - **Initialization**: [`random`] draws uniform gene vectors
//! - **Crossover**: [`blx_alpha`] implements the BLX-α operator
//! - **Mutation**: [`mutate_non_uniform`] applies non-uniform mutation, whose strength decays
//!   as training progresses
//!
//! # Design Decisions
//!
//! ## Clamping
//!
//! Every gene written by crossover or mutation is clamped into `[-bound, bound]`. Mutation
//! moves a gene by a fraction of its distance to one of the bounds, so it cannot leave the
//! range on its own; the clamp only matters for BLX-α, which samples beyond the parents'
//! interval.
//!
//! ## Non-Uniform Mutation
//!
//! For a gene `x`, a direction is picked with 50/50 chance, giving the signed distance
//! `y = bound - x` or `y = -bound - x`. The gene becomes `x + y·m`, where
//!
//! ```text
//! m = (1 - u^(1 - g/G))^b        u ~ Uniform(0, 1)
//! ```
//!
//! `g` is the current generation, `G` the total number of generations and `b` the shape
//! exponent. Early on `m` is spread over `[0, 1]`; as `g → G` it collapses towards `0`,
//! turning exploration into fine tuning.

use rand::Rng;

/// Creates a gene vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use gamebot_training::weights;
///
/// let genes = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 4);
/// assert_eq!(genes, vec![1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Generates `len` genes uniformly distributed in `[-bound, bound]`.
pub fn random<R>(rng: &mut R, bound: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-bound..=bound), len)
}

/// Performs BLX-α crossover between two parents.
///
/// For each gene, with `min`/`max` the smaller/larger parent value, the child gene is drawn
/// uniformly from
///
/// ```text
/// [(1 + α)·min - α·max, (1 + α)·max - α·min]
/// ```
///
/// and clamped to `[-bound, bound]`.
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, bound: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| {
            let min = f32::min(p1[i], p2[i]);
            let max = f32::max(p1[i], p2[i]);
            let lower = (1.0 + alpha) * min - alpha * max;
            let upper = (1.0 + alpha) * max - alpha * min;
            rng.random_range(lower..=upper).clamp(-bound, bound)
        },
        p1.len(),
    )
}

/// Mutation magnitude `(1 - u^(1 - g/G))^b` for a draw `u ∈ [0, 1)`.
///
/// Returns a value in `[0, 1]`. For a fixed `u` it is non-increasing in `generation` and
/// reaches `0` at `generation == max_generation`. A `max_generation` of `0` is treated as a
/// finished run.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn non_uniform_magnitude(u: f32, generation: usize, max_generation: usize, shape: f32) -> f32 {
    let progress = if max_generation == 0 {
        1.0
    } else {
        (generation as f32 / max_generation as f32).min(1.0)
    };
    (1.0 - u.powf(1.0 - progress)).clamp(0.0, 1.0).powf(shape)
}

/// Training progress seen by [`mutate_non_uniform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub generation: usize,
    pub max_generation: usize,
}

/// Applies non-uniform mutation in place.
///
/// Each gene is mutated independently with probability `rate`.
pub fn mutate_non_uniform<R>(
    genes: &mut [f32],
    rate: f32,
    shape: f32,
    progress: Progress,
    bound: f32,
    rng: &mut R,
) where
    R: Rng + ?Sized,
{
    for gene in genes {
        if rng.random_bool(rate.into()) {
            let target = if rng.random_bool(0.5) { bound } else { -bound };
            let u: f32 = rng.random();
            let magnitude =
                non_uniform_magnitude(u, progress.generation, progress.max_generation, shape);
            *gene = (*gene + (target - *gene) * magnitude).clamp(-bound, bound);
        }
    }
}
