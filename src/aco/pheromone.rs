//! Pheromone intensities per (facility, location) pair.

use rand::Rng;

/// Dense `n×n` table of non-negative pheromone intensities.
///
/// `get(facility, location)` reflects how good placing `facility` at
/// `location` has been historically. Entries are stored location-major so
/// that [`column`](Self::column), the sampling weights of one location,
/// is a contiguous slice.
///
/// A table is owned by exactly one trial and only mutated between ant
/// batches.
#[derive(Debug, Clone, PartialEq)]
pub struct PheromoneTable {
    data: Vec<f64>,
    n: usize,
}

impl PheromoneTable {
    /// Creates a table whose entries are independent uniform draws from
    /// the open interval (0, 1).
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let data = (0..n * n)
            .map(|_| loop {
                let v: f64 = rng.random();
                if v > 0.0 {
                    break v;
                }
            })
            .collect();
        Self { data, n }
    }

    /// Creates a table with every entry set to `value`.
    pub fn uniform(n: usize, value: f64) -> Self {
        Self {
            data: vec![value; n * n],
            n,
        }
    }

    /// Number of facilities (and locations).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Pheromone for placing `facility` at `location`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, facility: usize, location: usize) -> f64 {
        self.data[location * self.n + facility]
    }

    /// Pheromone of every facility at a fixed `location`, indexed by
    /// facility.
    pub fn column(&self, location: usize) -> &[f64] {
        &self.data[location * self.n..(location + 1) * self.n]
    }

    /// Adds `amount` to the entry for (`facility`, `location`).
    pub fn deposit(&mut self, facility: usize, location: usize, amount: f64) {
        debug_assert!(amount >= 0.0, "deposit amount must be non-negative");
        self.data[location * self.n + facility] += amount;
    }

    /// Multiplies every entry by `rate`.
    ///
    /// `rate = 1.0` leaves the table unchanged; `rate = 0.0` clears it.
    pub fn evaporate(&mut self, rate: f64) {
        debug_assert!(
            (0.0..=1.0).contains(&rate),
            "evaporation rate must be in [0, 1], got {rate}"
        );
        for v in &mut self.data {
            *v *= rate;
        }
    }

    /// Sum of all entries.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}
