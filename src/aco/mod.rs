//! Ant Colony Optimization for the QAP.
//!
//! Each iteration of a trial builds a batch of ants from the pheromone
//! table, scores them with the exact QAP objective, deposits `1 / cost` on
//! every (facility, location) pair each ant used and finally evaporates
//! the whole table.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: colony size, evaporation, budget, seeding
//! - [`PheromoneTable`]: per-trial pheromone state
//! - [`AntPathGenerator`]: roulette-wheel construction by location column
//! - [`FitnessEvaluator`]: batch scoring with best/worst tracking
//! - [`PheromoneUpdater`]: deposit and evaporation
//! - [`AcoRunner`]: one trial, returning an [`AcoResult`]
//! - [`TrialOrchestrator`]: many independent trials in parallel
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Maniezzo & Colorni (1999), "The Ant System Applied to the Quadratic
//!   Assignment Problem"
//! - Stützle & Dorigo (1999), "ACO Algorithms for the Quadratic Assignment
//!   Problem"

mod config;
mod construct;
mod evaluate;
mod orchestrator;
mod pheromone;
mod runner;
mod update;

pub use config::{AcoConfig, CostFloor};
pub use construct::{construct_path, AntPathGenerator};
pub use evaluate::{BatchFitness, FitnessEvaluator};
pub use orchestrator::{best_outcome, TrialOrchestrator, TrialOutcome};
pub use pheromone::PheromoneTable;
pub use runner::{AcoResult, AcoRunner, Termination};
pub use update::{DepositStats, PheromoneUpdater};
