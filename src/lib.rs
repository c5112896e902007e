//! Ant Colony Optimization for the Quadratic Assignment Problem.
//!
//! Given `n` facilities, `n` locations, a distance matrix between locations
//! and a flow matrix between facilities, search for the assignment that
//! minimizes total flow-weighted distance.
//!
//! - **QAP model** ([`qap`]): immutable instances, the exact objective and
//!   a whitespace-delimited text loader.
//! - **ACO engine** ([`aco`]): pheromone-guided construction, batch
//!   evaluation, deposit/evaporation and the trial loop.
//! - **Trials** ([`aco::TrialOrchestrator`]): independent trials fanned out
//!   on the rayon pool, each with its own generator and pheromone table.
//!
//! The search is a stochastic heuristic; it does not prove optimality.
//!
//! # Example
//!
//! ```
//! use u_antqap::aco::{AcoConfig, AcoRunner};
//! use u_antqap::qap::parse_instance;
//!
//! let instance = parse_instance("3\n0 1 2\n1 0 1\n2 1 0\n\n0 5 0\n5 0 0\n0 0 0\n")?;
//! let config = AcoConfig::default()
//!     .with_ant_count(8)
//!     .with_max_iterations(50)
//!     .with_seed(7);
//!
//! let result = AcoRunner::run(&instance, &config)?;
//! assert_eq!(result.best_cost, 10);
//! # Ok::<(), u_antqap::QapError>(())
//! ```

pub mod aco;
pub mod error;
pub mod qap;

pub use error::{QapError, Result};
