//! Batch fitness evaluation.

use crate::qap::{Permutation, QapInstance};
use rayon::prelude::*;

/// Costs of one ant batch with the indices of its extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFitness {
    /// Cost of every path, in batch order.
    pub costs: Vec<i64>,

    /// Index of the cheapest path. The earliest index wins ties.
    pub best: usize,

    /// Index of the most expensive path. The earliest index wins ties.
    pub worst: usize,
}

impl BatchFitness {
    /// Builds the summary from raw costs.
    ///
    /// # Panics
    /// Panics if `costs` is empty.
    pub fn from_costs(costs: Vec<i64>) -> Self {
        assert!(!costs.is_empty(), "cannot evaluate an empty batch");
        let mut best = 0;
        let mut worst = 0;
        for (i, &c) in costs.iter().enumerate().skip(1) {
            if c < costs[best] {
                best = i;
            }
            if c > costs[worst] {
                worst = i;
            }
        }
        Self { costs, best, worst }
    }

    /// Cost of the cheapest path.
    pub fn best_cost(&self) -> i64 {
        self.costs[self.best]
    }

    /// Cost of the most expensive path.
    pub fn worst_cost(&self) -> i64 {
        self.costs[self.worst]
    }

    /// Sum of all costs, widened so large batches of large costs cannot
    /// overflow.
    pub fn total_cost(&self) -> i128 {
        self.costs.iter().map(|&c| i128::from(c)).sum()
    }

    /// Mean cost of the batch.
    pub fn mean_cost(&self) -> f64 {
        self.total_cost() as f64 / self.costs.len() as f64
    }
}

/// Scores permutations against a [`QapInstance`].
///
/// # Examples
///
/// ```
/// use u_antqap::aco::FitnessEvaluator;
/// use u_antqap::qap::QapInstance;
///
/// let instance = QapInstance::new(2, vec![0, 1, 1, 0], vec![0, 4, 2, 0]).unwrap();
/// let fitness = FitnessEvaluator::new(&instance).evaluate(&[vec![0, 1], vec![1, 0]]);
/// assert_eq!(fitness.costs, vec![6, 6]);
/// assert_eq!(fitness.best, 0);
/// assert_eq!(fitness.worst, 0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    instance: &'a QapInstance,
    parallel: bool,
}

impl<'a> FitnessEvaluator<'a> {
    /// Creates a sequential evaluator.
    pub fn new(instance: &'a QapInstance) -> Self {
        Self {
            instance,
            parallel: false,
        }
    }

    /// Enables or disables rayon evaluation. Results are identical either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Computes the exact QAP cost of every path.
    ///
    /// # Panics
    /// Panics if `paths` is empty or a path is not over `0..n`.
    pub fn evaluate(&self, paths: &[Permutation]) -> BatchFitness {
        let costs = if self.parallel {
            paths
                .par_iter()
                .map(|path| self.instance.cost(path))
                .collect()
        } else {
            paths.iter().map(|path| self.instance.cost(path)).collect()
        };
        BatchFitness::from_costs(costs)
    }
}
