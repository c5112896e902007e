//! ACO configuration.
//!
//! [`AcoConfig`] holds every parameter of a single trial: colony size,
//! evaporation, budget, the non-positive cost policy, parallelism and
//! seeding.

use crate::error::{QapError, Result};
use crate::qap::QapInstance;

/// Policy for costs that cannot be inverted into a deposit.
///
/// The deposit amount is `1 / cost`. A zero cost would divide by zero and a
/// negative cost (possible with negative matrix entries) would subtract
/// pheromone, so every cost below the floor is handled by this policy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostFloor {
    /// Treat costs below `min` as `min`, depositing `1 / min`.
    ///
    /// With integer matrices the smallest positive cost is 1, so
    /// `Clamp(1.0)` gives a zero-cost path the largest deposit any
    /// positive-cost path could earn.
    Clamp(f64),

    /// Deposit nothing for ants whose cost is zero or negative.
    Skip,

    /// Abort the trial with [`QapError::FatalCost`].
    Abort,
}

impl Default for CostFloor {
    fn default() -> Self {
        CostFloor::Clamp(1.0)
    }
}

/// Configuration for one ACO trial.
///
/// # Defaults
///
/// ```
/// use u_antqap::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.ant_count, 10);
/// assert_eq!(config.max_iterations, 1000);
/// assert!((config.evaporation_rate - 0.5).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_antqap::aco::{AcoConfig, CostFloor};
///
/// let config = AcoConfig::default()
///     .with_ant_count(50)
///     .with_evaporation_rate(0.9)
///     .with_max_iterations(10_000)
///     .with_cost_floor(CostFloor::Skip)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Number of ants (paths) built per iteration. Must be at least 1.
    pub ant_count: usize,

    /// Fraction of pheromone retained after each iteration, in `[0, 1)`.
    ///
    /// Every entry is multiplied by this factor once per iteration. Values
    /// close to 0 forget history almost entirely; values close to 1 keep
    /// it.
    pub evaporation_rate: f64,

    /// Number of iterations to run. This is the only algorithmic halting
    /// condition.
    pub max_iterations: usize,

    /// How zero and negative costs are turned into deposits.
    pub cost_floor: CostFloor,

    /// Whether to build and evaluate ants in parallel using rayon.
    ///
    /// Each ant then gets its own generator seeded from the trial
    /// generator.
    pub parallel: bool,

    /// Log iteration number, best and worst cost of every iteration at
    /// `info` level. When off, the same data goes to `trace`.
    pub verbose: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds the trial from OS entropy so concurrently launched
    /// trials diverge.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked between iterations, so a trial may overrun by at most one
    /// iteration. `None` disables time-based termination.
    pub time_limit_ms: Option<u64>,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 10,
            evaporation_rate: 0.5,
            max_iterations: 1000,
            cost_floor: CostFloor::default(),
            parallel: true,
            verbose: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per iteration.
    pub fn with_ant_count(mut self, m: usize) -> Self {
        self.ant_count = m;
        self
    }

    /// Sets the evaporation (retention) rate.
    pub fn with_evaporation_rate(mut self, e: f64) -> Self {
        self.evaporation_rate = e;
        self
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the non-positive cost policy.
    pub fn with_cost_floor(mut self, floor: CostFloor) -> Self {
        self.cost_floor = floor;
        self
    }

    /// Enables or disables parallel construction and evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables or disables per-iteration `info` logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for quick runs: 10 ants, 200 iterations.
    pub fn fast() -> Self {
        Self {
            ant_count: 10,
            max_iterations: 200,
            ..Self::default()
        }
    }

    /// Preset for long experiments: 100 ants, 10 000 iterations.
    pub fn thorough() -> Self {
        Self {
            ant_count: 100,
            max_iterations: 10_000,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ant_count == 0 {
            return Err(QapError::Config("ant_count must be at least 1".into()));
        }
        if self.max_iterations == 0 {
            return Err(QapError::Config(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.evaporation_rate) {
            return Err(QapError::Config(format!(
                "evaporation_rate must be in [0, 1), got {}",
                self.evaporation_rate
            )));
        }
        if let CostFloor::Clamp(min) = self.cost_floor {
            if !min.is_finite() || min <= 0.0 {
                return Err(QapError::Config(format!(
                    "cost floor must be a positive finite number, got {min}"
                )));
            }
        }
        Ok(())
    }

    /// Validates the configuration against a concrete instance.
    pub fn validate_for(&self, instance: &QapInstance) -> Result<()> {
        self.validate()?;
        if instance.size() < 2 {
            return Err(QapError::Config(format!(
                "instance needs at least 2 nodes, got {}",
                instance.size()
            )));
        }
        Ok(())
    }
}
