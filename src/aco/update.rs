//! Pheromone reinforcement and evaporation.

use super::config::{AcoConfig, CostFloor};
use super::pheromone::PheromoneTable;
use crate::error::{QapError, Result};
use crate::qap::Permutation;

/// Counters from one deposit pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositStats {
    /// Ants whose cost was used as-is.
    pub deposited: usize,
    /// Ants whose cost was below the clamp floor and was raised to it.
    pub clamped: usize,
    /// Ants that deposited nothing.
    pub skipped: usize,
}

/// Applies the per-iteration pheromone update.
///
/// Every ant adds `1 / cost` to `table[path[location]][location]` for each
/// location; then every entry is multiplied by the evaporation rate.
/// Deposits are additive, so the order between ants does not matter.
#[derive(Debug, Clone, Copy)]
pub struct PheromoneUpdater {
    evaporation_rate: f64,
    cost_floor: CostFloor,
}

impl PheromoneUpdater {
    /// Creates an updater.
    pub fn new(evaporation_rate: f64, cost_floor: CostFloor) -> Self {
        Self {
            evaporation_rate,
            cost_floor,
        }
    }

    /// Creates an updater from a trial configuration.
    pub fn from_config(config: &AcoConfig) -> Self {
        Self::new(config.evaporation_rate, config.cost_floor)
    }

    /// Deposits `1 / cost` for every location of every path.
    ///
    /// # Errors
    /// [`QapError::FatalCost`] for the first non-positive cost when the
    /// policy is [`CostFloor::Abort`]. The table is left untouched in that
    /// case.
    pub fn deposit(
        &self,
        table: &mut PheromoneTable,
        paths: &[Permutation],
        costs: &[i64],
    ) -> Result<DepositStats> {
        debug_assert_eq!(paths.len(), costs.len());
        if let CostFloor::Abort = self.cost_floor {
            if let Some(&cost) = costs.iter().find(|&&c| c <= 0) {
                return Err(QapError::FatalCost { cost });
            }
        }

        let mut stats = DepositStats::default();
        for (path, &cost) in paths.iter().zip(costs) {
            let amount = match (self.cost_floor, cost) {
                (CostFloor::Clamp(min), c) if (c as f64) < min => {
                    stats.clamped += 1;
                    1.0 / min
                }
                (_, c) if c > 0 => {
                    stats.deposited += 1;
                    1.0 / c as f64
                }
                _ => {
                    stats.skipped += 1;
                    continue;
                }
            };
            for (location, &facility) in path.iter().enumerate() {
                table.deposit(facility, location, amount);
            }
        }

        if stats.clamped > 0 || stats.skipped > 0 {
            tracing::warn!(
                clamped = stats.clamped,
                skipped = stats.skipped,
                "costs below the deposit floor were clamped or skipped"
            );
        }
        Ok(stats)
    }

    /// Multiplies every entry by the evaporation rate.
    pub fn evaporate(&self, table: &mut PheromoneTable) {
        table.evaporate(self.evaporation_rate);
    }

    /// Deposits for the whole batch, then evaporates.
    pub fn apply(
        &self,
        table: &mut PheromoneTable,
        paths: &[Permutation],
        costs: &[i64],
    ) -> Result<DepositStats> {
        let stats = self.deposit(table, paths, costs)?;
        self.evaporate(table);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_inverse_cost() {
        let mut table = PheromoneTable::uniform(3, 0.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::default());
        let stats = updater
            .deposit(&mut table, &[vec![2, 0, 1]], &[4])
            .unwrap();
        assert_eq!(stats.deposited, 1);
        assert!((table.get(2, 0) - 0.25).abs() < 1e-12);
        assert!((table.get(0, 1) - 0.25).abs() < 1e-12);
        assert!((table.get(1, 2) - 0.25).abs() < 1e-12);
        assert!((table.total() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_deposits_accumulate_across_ants() {
        let mut table = PheromoneTable::uniform(2, 0.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::default());
        updater
            .deposit(&mut table, &[vec![0, 1], vec![0, 1], vec![1, 0]], &[2, 4, 8])
            .unwrap();
        assert!((table.get(0, 0) - 0.75).abs() < 1e-12);
        assert!((table.get(1, 0) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_deposit_then_no_decay_keeps_amounts() {
        let mut table = PheromoneTable::uniform(2, 0.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::default());
        updater.deposit(&mut table, &[vec![1, 0]], &[5]).unwrap();
        table.evaporate(1.0);
        assert!((table.get(1, 0) - 0.2).abs() < 1e-12);
        assert!((table.get(0, 1) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_apply_deposits_before_evaporating() {
        let mut table = PheromoneTable::uniform(2, 1.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::default());
        updater.apply(&mut table, &[vec![0, 1]], &[2]).unwrap();
        // (1.0 + 0.5) * 0.5 on the used pairs, 1.0 * 0.5 elsewhere.
        assert!((table.get(0, 0) - 0.75).abs() < 1e-12);
        assert!((table.get(1, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamp_zero_cost() {
        let mut table = PheromoneTable::uniform(2, 0.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::Clamp(2.0));
        let stats = updater
            .deposit(&mut table, &[vec![0, 1], vec![1, 0], vec![0, 1]], &[0, -3, 1])
            .unwrap();
        assert_eq!(stats.clamped, 3, "0, -3 and 1 are all below the floor");
        assert!((table.get(0, 0) - 1.0).abs() < 1e-12);
        assert!((table.get(1, 0) - 0.5).abs() < 1e-12);
        assert!(table.total().is_finite());
    }

    #[test]
    fn test_skip_zero_cost() {
        let mut table = PheromoneTable::uniform(2, 0.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::Skip);
        let stats = updater
            .deposit(&mut table, &[vec![0, 1], vec![1, 0]], &[0, 4])
            .unwrap();
        assert_eq!(
            stats,
            DepositStats {
                deposited: 1,
                clamped: 0,
                skipped: 1
            }
        );
        assert_eq!(table.get(0, 0), 0.0);
        assert!((table.get(1, 0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_abort_on_zero_cost_leaves_table() {
        let mut table = PheromoneTable::uniform(2, 1.0);
        let updater = PheromoneUpdater::new(0.5, CostFloor::Abort);
        let err = updater
            .apply(&mut table, &[vec![0, 1], vec![1, 0]], &[3, 0])
            .unwrap_err();
        assert!(matches!(err, QapError::FatalCost { cost: 0 }));
        assert_eq!(table, PheromoneTable::uniform(2, 1.0));
    }
}
