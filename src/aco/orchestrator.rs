//! Concurrent independent trials.
//!
//! Trials are embarrassingly parallel: each owns its pheromone table,
//! generator and history, and only reads the shared instance. Trials are
//! fanned out on the rayon pool and their outcomes gathered in launch
//! order. A failing trial never stops its siblings.

use super::config::AcoConfig;
use super::runner::{AcoResult, AcoRunner};
use crate::error::Result;
use crate::qap::QapInstance;
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Outcome of one trial launched by [`TrialOrchestrator`].
#[derive(Debug)]
pub struct TrialOutcome {
    /// Index of the configuration in the launched matrix (0 for
    /// [`TrialOrchestrator::run_attempts`]).
    pub config_index: usize,

    /// 0-based attempt number within its configuration.
    pub attempt: usize,

    /// Configuration the trial actually ran with, including its derived
    /// seed.
    pub config: AcoConfig,

    /// Trial result, or the error that aborted it.
    pub result: Result<AcoResult>,
}

impl TrialOutcome {
    /// Whether the trial completed.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Best cost of a completed trial.
    pub fn best_cost(&self) -> Option<i64> {
        self.result.as_ref().ok().map(|r| r.best_cost)
    }
}

/// Returns the completed outcome with the lowest best cost.
///
/// Ties go to the earliest outcome. `None` if every trial failed.
pub fn best_outcome(outcomes: &[TrialOutcome]) -> Option<&TrialOutcome> {
    let mut best: Option<(&TrialOutcome, i64)> = None;
    for outcome in outcomes {
        if let Some(cost) = outcome.best_cost() {
            if best.is_none_or(|(_, b)| cost < b) {
                best = Some((outcome, cost));
            }
        }
    }
    best.map(|(outcome, _)| outcome)
}

/// Launches independent ACO trials concurrently.
///
/// # Usage
///
/// ```
/// use u_antqap::aco::{AcoConfig, TrialOrchestrator};
/// use u_antqap::qap::QapInstance;
///
/// let instance = QapInstance::new(2, vec![0, 3, 1, 0], vec![0, 5, 2, 0]).unwrap();
/// let config = AcoConfig::default().with_ant_count(4).with_max_iterations(10);
///
/// let outcomes = TrialOrchestrator::new(&instance).run_attempts(&config, 3);
/// assert_eq!(outcomes.len(), 3);
/// assert!(outcomes.iter().all(|o| o.is_ok()));
/// ```
#[derive(Debug, Clone)]
pub struct TrialOrchestrator<'a> {
    instance: &'a QapInstance,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> TrialOrchestrator<'a> {
    /// Creates an orchestrator over a shared, read-only instance.
    pub fn new(instance: &'a QapInstance) -> Self {
        Self {
            instance,
            cancel: None,
        }
    }

    /// Installs a cancellation flag observed by every launched trial.
    ///
    /// Each trial stops after its current iteration once the flag is set
    /// and still reports its best assignment.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Runs `attempts` trials of the same configuration concurrently.
    pub fn run_attempts(&self, config: &AcoConfig, attempts: usize) -> Vec<TrialOutcome> {
        self.run_matrix(std::slice::from_ref(config), attempts)
    }

    /// Runs `attempts` trials of every configuration, all concurrently.
    ///
    /// Outcomes are ordered by configuration, then attempt. A configured
    /// seed `s` becomes `s + attempt` so attempts differ yet replay
    /// exactly; unseeded attempts draw their own entropy.
    pub fn run_matrix(&self, configs: &[AcoConfig], attempts: usize) -> Vec<TrialOutcome> {
        let jobs: Vec<(usize, usize)> = (0..configs.len())
            .flat_map(|ci| (0..attempts).map(move |attempt| (ci, attempt)))
            .collect();

        tracing::info!(
            configs = configs.len(),
            attempts,
            trials = jobs.len(),
            nodes = self.instance.size(),
            "launching trials"
        );

        jobs.into_par_iter()
            .map(|(config_index, attempt)| {
                let mut config = configs[config_index].clone();
                if let Some(seed) = config.seed {
                    config.seed = Some(seed.wrapping_add(attempt as u64));
                }
                let result = self.run_one(config_index, attempt, &config);
                TrialOutcome {
                    config_index,
                    attempt,
                    config,
                    result,
                }
            })
            .collect()
    }

    fn run_one(
        &self,
        config_index: usize,
        attempt: usize,
        config: &AcoConfig,
    ) -> Result<AcoResult> {
        tracing::info!(
            config_index,
            attempt = attempt + 1,
            ants = config.ant_count,
            evaporation_rate = config.evaporation_rate,
            "launching attempt"
        );

        let result = AcoRunner::run_with_cancel(self.instance, config, self.cancel.clone());

        match &result {
            Ok(r) => tracing::info!(
                config_index,
                attempt = attempt + 1,
                best_cost = r.best_cost,
                average_cost = r.average_cost,
                best = ?r.best,
                "attempt finished"
            ),
            Err(e) => tracing::warn!(
                config_index,
                attempt = attempt + 1,
                error = %e,
                "attempt failed"
            ),
        }
        result
    }
}
