//! ACO trial loop.
//!
//! [`AcoRunner`] drives one independent trial:
//! initialization → (construct → evaluate → record → deposit → evaporate)
//! repeated until the iteration budget is spent.

use super::config::AcoConfig;
use super::construct::AntPathGenerator;
use super::evaluate::FitnessEvaluator;
use super::pheromone::PheromoneTable;
use super::update::PheromoneUpdater;
use crate::error::Result;
use crate::qap::{Permutation, QapInstance};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use u_numflow::random::create_rng;

/// Upper bound on preallocated history entries; time-limited trials may
/// carry an effectively unbounded iteration budget.
const HISTORY_PREALLOC: usize = 16_384;

/// Why a trial stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// All `max_iterations` iterations ran.
    BudgetExhausted,
    /// The cancellation flag was raised.
    Cancelled,
    /// The wall-clock limit elapsed.
    TimeLimit,
}

/// Result of one ACO trial.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoResult {
    /// Best assignment found during the whole trial.
    pub best: Permutation,

    /// Cost of `best`.
    pub best_cost: i64,

    /// 1-based iteration in which `best` was first produced.
    pub best_iteration: usize,

    /// Mean cost over every ant of every iteration.
    pub average_cost: f64,

    /// Cost of every ant, one list per iteration.
    pub cost_history: Vec<Vec<i64>>,

    /// Best-ever cost at the end of each iteration (non-increasing).
    pub best_history: Vec<i64>,

    /// Number of iterations executed.
    pub iterations: usize,

    /// Why the loop stopped.
    pub termination: Termination,

    /// Seed of the trial generator. Re-running with this seed and the same
    /// configuration reproduces the trial.
    pub seed: u64,

    /// Wall-clock duration of the trial in milliseconds.
    pub elapsed_ms: u64,
}

impl AcoResult {
    /// Whether the trial was stopped by its cancellation flag.
    pub fn cancelled(&self) -> bool {
        self.termination == Termination::Cancelled
    }

    /// Total number of ants evaluated.
    pub fn evaluations(&self) -> usize {
        self.cost_history.iter().map(Vec::len).sum()
    }

    /// Cheapest ant of each iteration.
    pub fn iteration_best(&self) -> Vec<i64> {
        self.cost_history
            .iter()
            .filter_map(|costs| costs.iter().copied().min())
            .collect()
    }

    /// Mean ant cost of each iteration.
    pub fn iteration_mean(&self) -> Vec<f64> {
        self.cost_history
            .iter()
            .filter(|costs| !costs.is_empty())
            .map(|costs| {
                let total: i128 = costs.iter().map(|&c| i128::from(c)).sum();
                total as f64 / costs.len() as f64
            })
            .collect()
    }
}

/// Executes ACO trials.
///
/// # Usage
///
/// ```
/// use u_antqap::aco::{AcoConfig, AcoRunner};
/// use u_antqap::qap::QapInstance;
///
/// let instance = QapInstance::new(2, vec![0, 3, 1, 0], vec![0, 5, 2, 0]).unwrap();
/// let config = AcoConfig::default()
///     .with_ant_count(4)
///     .with_max_iterations(20)
///     .with_seed(42);
/// let result = AcoRunner::run(&instance, &config).unwrap();
/// assert_eq!(result.best_cost, 11);
/// assert_eq!(result.iterations, 20);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs a trial to completion.
    ///
    /// # Errors
    /// [`QapError::Config`](crate::QapError::Config) for an invalid
    /// configuration, [`QapError::FatalCost`](crate::QapError::FatalCost)
    /// when a non-positive cost reaches the deposit step under
    /// [`CostFloor::Abort`](super::CostFloor::Abort).
    pub fn run(instance: &QapInstance, config: &AcoConfig) -> Result<AcoResult> {
        Self::run_with_cancel(instance, config, None)
    }

    /// Runs a trial with an optional cancellation token.
    ///
    /// The flag is checked after each completed iteration, so the
    /// pheromone table is never observed half-updated and at least one
    /// iteration always runs.
    pub fn run_with_cancel(
        instance: &QapInstance,
        config: &AcoConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AcoResult> {
        config.validate_for(instance)?;

        let start = Instant::now();
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(seed);

        let n = instance.size();
        tracing::debug!(
            nodes = n,
            ants = config.ant_count,
            evaporation_rate = config.evaporation_rate,
            max_iterations = config.max_iterations,
            seed,
            symmetric = instance.is_symmetric(),
            "initializing trial"
        );
        if !instance.is_non_negative() {
            tracing::debug!(
                cost_floor = ?config.cost_floor,
                "instance has negative entries, costs may fall below the deposit floor"
            );
        }

        let mut table = PheromoneTable::random(n, &mut rng);
        let generator = AntPathGenerator::new(config.parallel);
        let evaluator = FitnessEvaluator::new(instance).with_parallel(config.parallel);
        let updater = PheromoneUpdater::from_config(config);

        let mut best: Permutation = Vec::new();
        let mut best_cost = i64::MAX;
        let mut best_iteration = 0usize;
        let capacity = config.max_iterations.min(HISTORY_PREALLOC);
        let mut cost_history = Vec::with_capacity(capacity);
        let mut best_history = Vec::with_capacity(capacity);
        let mut cost_sum = 0i128;
        let mut evaluations = 0usize;
        let mut termination = Termination::BudgetExhausted;

        for iteration in 1..=config.max_iterations {
            let paths = generator.generate(&table, config.ant_count, &mut rng);
            let fitness = evaluator.evaluate(&paths);

            if config.verbose {
                tracing::info!(
                    iteration,
                    best = fitness.best_cost(),
                    worst = fitness.worst_cost(),
                    "iteration"
                );
            } else {
                tracing::trace!(
                    iteration,
                    best = fitness.best_cost(),
                    worst = fitness.worst_cost(),
                    "iteration"
                );
            }

            if fitness.best_cost() < best_cost {
                best = paths[fitness.best].clone();
                best_cost = fitness.best_cost();
                best_iteration = iteration;
                tracing::debug!(iteration, best_cost, "new best assignment");
            }

            cost_sum += fitness.costs.iter().map(|&c| i128::from(c)).sum::<i128>();
            evaluations += fitness.costs.len();

            updater.apply(&mut table, &paths, &fitness.costs)?;

            best_history.push(best_cost);
            cost_history.push(fitness.costs);

            if iteration == config.max_iterations {
                break;
            }
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if let Some(limit) = config.time_limit_ms {
                if start.elapsed().as_millis() >= u128::from(limit) {
                    termination = Termination::TimeLimit;
                    break;
                }
            }
        }

        let average_cost = cost_sum as f64 / evaluations as f64;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(
            iterations = cost_history.len(),
            best_cost,
            average_cost,
            ?termination,
            elapsed_ms,
            "trial finished"
        );

        Ok(AcoResult {
            best,
            best_cost,
            best_iteration,
            average_cost,
            iterations: cost_history.len(),
            cost_history,
            best_history,
            termination,
            seed,
            elapsed_ms,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::CostFloor;
    use crate::error::QapError;
    use crate::qap::is_permutation;

    /// Asymmetric-flow 4-node instance; its optimum is brute-forced below.
    fn small_instance() -> QapInstance {
        QapInstance::from_rows(
            &[
                vec![0, 1, 2, 3],
                vec![1, 0, 1, 2],
                vec![2, 1, 0, 1],
                vec![3, 2, 1, 0],
            ],
            &[
                vec![0, 3, 0, 2],
                vec![3, 0, 0, 1],
                vec![0, 0, 0, 4],
                vec![2, 1, 4, 0],
            ],
        )
        .unwrap()
    }

    fn brute_force_optimum(instance: &QapInstance) -> i64 {
        fn permute(path: &mut Vec<usize>, k: usize, instance: &QapInstance, best: &mut i64) {
            if k == path.len() {
                *best = (*best).min(instance.cost(path));
                return;
            }
            for i in k..path.len() {
                path.swap(k, i);
                permute(path, k + 1, instance, best);
                path.swap(k, i);
            }
        }
        let mut path: Vec<usize> = (0..instance.size()).collect();
        let mut best = i64::MAX;
        permute(&mut path, 0, instance, &mut best);
        best
    }

    #[test]
    fn test_finds_brute_force_optimum() {
        let instance = small_instance();
        let optimum = brute_force_optimum(&instance);
        let config = AcoConfig::default()
            .with_ant_count(10)
            .with_max_iterations(100)
            .with_seed(42)
            .with_parallel(false);

        let result = AcoRunner::run(&instance, &config).unwrap();

        // 4! = 24 assignments and 1000 ants: the optimum is found.
        assert_eq!(result.best_cost, optimum);
        assert!(is_permutation(&result.best, 4));
        assert_eq!(instance.cost(&result.best), result.best_cost);
    }

    #[test]
    fn test_history_shapes() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_ant_count(7)
            .with_max_iterations(15)
            .with_seed(1);

        let result = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(result.iterations, 15);
        assert_eq!(result.termination, Termination::BudgetExhausted);
        assert_eq!(result.cost_history.len(), 15);
        assert_eq!(result.best_history.len(), 15);
        assert!(result.cost_history.iter().all(|c| c.len() == 7));
        assert_eq!(result.evaluations(), 105);
        assert_eq!(result.iteration_best().len(), 15);
        assert_eq!(result.seed, 1);
    }

    #[test]
    fn test_average_cost_matches_history() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_ant_count(5)
            .with_max_iterations(10)
            .with_seed(3);

        let result = AcoRunner::run(&instance, &config).unwrap();

        let all: Vec<i64> = result.cost_history.iter().flatten().copied().collect();
        let expected = all.iter().sum::<i64>() as f64 / all.len() as f64;
        assert!((result.average_cost - expected).abs() < 1e-9);
        assert!(result.average_cost >= result.best_cost as f64);
    }

    #[test]
    fn test_best_history_non_increasing() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_ant_count(3)
            .with_max_iterations(60)
            .with_seed(9);

        let result = AcoRunner::run(&instance, &config).unwrap();

        for window in result.best_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
        assert_eq!(*result.best_history.last().unwrap(), result.best_cost);
        assert_eq!(
            result.best_history[result.best_iteration - 1],
            result.best_cost
        );
    }

    #[test]
    fn test_same_seed_reproduces_trial() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_ant_count(6)
            .with_max_iterations(25)
            .with_seed(1234);

        let a = AcoRunner::run(&instance, &config).unwrap();
        let b = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.cost_history, b.cost_history);
    }

    #[test]
    fn test_unseeded_trials_record_their_seed() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_ant_count(4)
            .with_max_iterations(10);

        let first = AcoRunner::run(&instance, &config).unwrap();
        let replay = AcoRunner::run(&instance, &config.clone().with_seed(first.seed)).unwrap();

        assert_eq!(first.cost_history, replay.cost_history);
    }

    #[test]
    fn test_cancellation() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_max_iterations(100_000)
            .with_seed(42);

        // Set before running: the first iteration completes, then the
        // trial stops.
        let cancel = Arc::new(AtomicBool::new(true));

        let result = AcoRunner::run_with_cancel(&instance, &config, Some(cancel)).unwrap();

        assert!(result.cancelled());
        assert_eq!(result.iterations, 1);
        assert!(is_permutation(&result.best, 4));
    }

    #[test]
    fn test_time_limit() {
        let instance = small_instance();
        let config = AcoConfig::default()
            .with_max_iterations(usize::MAX)
            .with_time_limit_ms(20)
            .with_seed(42);

        let result = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(result.termination, Termination::TimeLimit);
        assert!(result.iterations >= 1);
    }

    #[test]
    fn test_invalid_config_aborts() {
        let instance = small_instance();
        let config = AcoConfig::default().with_evaporation_rate(1.5);
        let err = AcoRunner::run(&instance, &config).unwrap_err();
        assert!(matches!(err, QapError::Config(_)));
    }

    #[test]
    fn test_zero_cost_abort_policy() {
        // All-zero flow: every assignment costs 0.
        let instance = QapInstance::new(3, vec![1; 9], vec![0; 9]).unwrap();
        let config = AcoConfig::default()
            .with_max_iterations(5)
            .with_cost_floor(CostFloor::Abort)
            .with_seed(42);

        let err = AcoRunner::run(&instance, &config).unwrap_err();
        assert!(matches!(err, QapError::FatalCost { cost: 0 }));
    }

    #[test]
    fn test_zero_cost_clamp_policy_completes() {
        let instance = QapInstance::new(3, vec![1; 9], vec![0; 9]).unwrap();
        let config = AcoConfig::default()
            .with_max_iterations(5)
            .with_seed(42);

        let result = AcoRunner::run(&instance, &config).unwrap();
        assert_eq!(result.best_cost, 0);
        assert_eq!(result.best_iteration, 1);
    }

    #[test]
    fn test_large_entries_give_exact_costs() {
        // 2² · 1e9 · 1e9 sits just inside the i64 bound.
        let big = 1_000_000_000;
        let instance = QapInstance::new(2, vec![0, big, big, 0], vec![0, big, big, 0]).unwrap();
        let config = AcoConfig::default()
            .with_ant_count(4)
            .with_max_iterations(5)
            .with_seed(9);

        let result = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(result.best_cost, 2_000_000_000_000_000_000);
        assert!((result.average_cost - 2e18).abs() < 1e6);
        for mean in result.iteration_mean() {
            assert!((mean - 2e18).abs() < 1e6, "iteration mean {mean}");
        }
    }

    #[test]
    fn test_negative_instance_with_skip_policy() {
        // Every assignment costs -2, so nothing is ever deposited.
        let instance = QapInstance::new(2, vec![0, -1, -1, 0], vec![0, 1, 1, 0]).unwrap();
        assert!(!instance.is_non_negative());
        let config = AcoConfig::default()
            .with_max_iterations(4)
            .with_cost_floor(CostFloor::Skip)
            .with_seed(5);

        let result = AcoRunner::run(&instance, &config).unwrap();

        assert_eq!(result.best_cost, -2);
        assert_eq!(result.iteration_best(), vec![-2; 4]);
    }
}
