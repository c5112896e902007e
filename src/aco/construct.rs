//! Ant path construction.
//!
//! Each ant fills locations `0..n` in increasing order. Location 0 gets a
//! uniformly random facility; every later location samples one of the
//! facilities not yet placed with probability proportional to its
//! pheromone in that location's column (roulette wheel, without
//! replacement across locations).

use super::pheromone::PheromoneTable;
use crate::qap::Permutation;
use rand::Rng;
use rayon::prelude::*;
use u_numflow::random::create_rng;

/// Builds batches of ant paths from a read-only pheromone table.
///
/// Ants of one batch share nothing mutable. In parallel mode every ant gets
/// its own generator seeded from the caller's generator, so a seeded trial
/// stays reproducible regardless of thread scheduling.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntPathGenerator {
    parallel: bool,
}

impl AntPathGenerator {
    /// Creates a generator; `parallel` builds ants on the rayon pool.
    pub fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Returns `count` independent permutations of `0..table.size()`.
    pub fn generate<R: Rng>(
        &self,
        table: &PheromoneTable,
        count: usize,
        rng: &mut R,
    ) -> Vec<Permutation> {
        if self.parallel {
            let seeds: Vec<u64> = (0..count).map(|_| rng.random()).collect();
            seeds
                .into_par_iter()
                .map(|seed| {
                    let mut ant_rng = create_rng(seed);
                    construct_path(table, &mut ant_rng)
                })
                .collect()
        } else {
            (0..count).map(|_| construct_path(table, rng)).collect()
        }
    }
}

/// Builds a single ant path.
///
/// # Complexity
/// O(n²): one scan of the remaining facilities per location.
pub fn construct_path<R: Rng>(table: &PheromoneTable, rng: &mut R) -> Permutation {
    let n = table.size();
    if n == 0 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut path = Vec::with_capacity(n);
    path.push(remaining.swap_remove(rng.random_range(0..n)));

    let mut weights = Vec::with_capacity(n);
    for location in 1..n {
        let column = table.column(location);
        weights.clear();
        weights.extend(remaining.iter().map(|&facility| column[facility]));
        let pick = roulette(&weights, rng);
        path.push(remaining.swap_remove(pick));
    }
    path
}

/// Index sampled with probability proportional to `weights`.
///
/// Falls back to a uniform pick when the weights sum to zero or to a
/// non-finite value. `weights` must not be empty.
fn roulette<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..weights.len());
    }

    let mut pick = rng.random_range(0.0..total);
    for (i, &w) in weights.iter().enumerate() {
        if pick < w {
            return i;
        }
        pick -= w;
    }
    // Rounding left `pick` just past the last bucket.
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}
