//! Dense QAP instance: distance and flow matrices.

use crate::error::{QapError, Result};

/// A complete assignment of facilities to locations.
///
/// `path[location] = facility`. A valid permutation is a bijection on
/// `0..n`; see [`is_permutation`].
pub type Permutation = Vec<usize>;

/// Returns `true` if `path` contains every index in `0..n` exactly once.
///
/// # Examples
///
/// ```
/// use u_antqap::qap::is_permutation;
///
/// assert!(is_permutation(&[2, 0, 1], 3));
/// assert!(!is_permutation(&[0, 0, 1], 3));
/// assert!(!is_permutation(&[0, 1], 3));
/// ```
pub fn is_permutation(path: &[usize], n: usize) -> bool {
    if path.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &facility in path {
        if facility >= n || seen[facility] {
            return false;
        }
        seen[facility] = true;
    }
    true
}

/// An immutable Quadratic Assignment Problem instance.
///
/// Both matrices are `n×n` and stored row-major. `distance` is indexed by
/// location pairs, `flow` by facility pairs. Neither has to be symmetric
/// and negative entries are tolerated.
///
/// Construction rejects matrices whose worst-case objective
/// `n² · max|distance| · max|flow|` does not fit in an `i64`, so
/// [`QapInstance::cost`] is exact for every permutation.
///
/// # Examples
///
/// ```
/// use u_antqap::qap::QapInstance;
///
/// let instance = QapInstance::new(
///     2,
///     vec![0, 3, 3, 0],
///     vec![0, 2, 1, 0],
/// ).unwrap();
/// assert_eq!(instance.size(), 2);
/// assert_eq!(instance.cost(&[0, 1]), 3 * 2 + 3 * 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInstance"))]
pub struct QapInstance {
    n: usize,
    distance: Vec<i64>,
    flow: Vec<i64>,
}

/// Unchecked wire form of [`QapInstance`]; deserialization goes through
/// [`QapInstance::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawInstance {
    n: usize,
    distance: Vec<i64>,
    flow: Vec<i64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInstance> for QapInstance {
    type Error = QapError;

    fn try_from(raw: RawInstance) -> Result<Self> {
        Self::new(raw.n, raw.distance, raw.flow)
    }
}

/// Largest possible `|cost|` over all permutations, or `None` if it does
/// not fit in a `u128`.
fn cost_bound(n: usize, distance: &[i64], flow: &[i64]) -> Option<u128> {
    let max_abs = |m: &[i64]| m.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
    let pairs = (n as u128).checked_mul(n as u128)?;
    pairs
        .checked_mul(u128::from(max_abs(distance)))?
        .checked_mul(u128::from(max_abs(flow)))
}

impl QapInstance {
    /// Creates an instance from two row-major `n×n` matrices.
    ///
    /// # Errors
    ///
    /// - [`QapError::Config`] if `n < 2`.
    /// - [`QapError::Format`] if either matrix does not hold `n * n` values,
    ///   or if the entries are large enough for a cost to overflow `i64`.
    pub fn new(n: usize, distance: Vec<i64>, flow: Vec<i64>) -> Result<Self> {
        if n < 2 {
            return Err(QapError::Config(format!(
                "instance needs at least 2 nodes, got {n}"
            )));
        }
        let expected = n * n;
        if distance.len() != expected {
            return Err(QapError::format(
                0,
                format!(
                    "distance matrix has {} values, expected {expected}",
                    distance.len()
                ),
            ));
        }
        if flow.len() != expected {
            return Err(QapError::format(
                0,
                format!("flow matrix has {} values, expected {expected}", flow.len()),
            ));
        }
        let fits = cost_bound(n, &distance, &flow).is_some_and(|b| b <= i64::MAX as u128);
        if !fits {
            return Err(QapError::format(
                0,
                format!("matrix entries too large: a {n}-node cost could overflow i64"),
            ));
        }
        Ok(Self { n, distance, flow })
    }

    /// Creates an instance from nested rows.
    ///
    /// The size is taken from the number of distance rows.
    pub fn from_rows(distance: &[Vec<i64>], flow: &[Vec<i64>]) -> Result<Self> {
        let n = distance.len();
        let flatten = |name: &str, rows: &[Vec<i64>]| -> Result<Vec<i64>> {
            if rows.len() != n {
                return Err(QapError::format(
                    0,
                    format!("{name} matrix has {} rows, expected {n}", rows.len()),
                ));
            }
            let mut data = Vec::with_capacity(n * n);
            for (i, row) in rows.iter().enumerate() {
                if row.len() != n {
                    return Err(QapError::format(
                        0,
                        format!("{name} row {i} has {} values, expected {n}", row.len()),
                    ));
                }
                data.extend_from_slice(row);
            }
            Ok(data)
        };
        let distance = flatten("distance", distance)?;
        let flow = flatten("flow", flow)?;
        Self::new(n, distance, flow)
    }

    /// Number of facilities (and locations).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distance[from * self.n + to]
    }

    /// Flow from facility `from` to facility `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn flow(&self, from: usize, to: usize) -> i64 {
        self.flow[from * self.n + to]
    }

    /// Exact QAP objective of an assignment.
    ///
    /// `Σᵢ Σⱼ distance[i][j] · flow[path[i]][path[j]]` over all ordered
    /// location pairs. O(n²), no pruning. Exact: every partial sum is
    /// bounded by the magnitude check in [`QapInstance::new`].
    ///
    /// # Panics
    ///
    /// Panics if `path` is shorter than `n` or holds an index `>= n`.
    pub fn cost(&self, path: &[usize]) -> i64 {
        let n = self.n;
        let mut total = 0i64;
        for i in 0..n {
            let d_row = &self.distance[i * n..(i + 1) * n];
            let f_row = &self.flow[path[i] * n..(path[i] + 1) * n];
            for (j, &d) in d_row.iter().enumerate() {
                total += d * f_row[path[j]];
            }
        }
        total
    }

    /// Returns `true` if both matrices are symmetric.
    pub fn is_symmetric(&self) -> bool {
        let n = self.n;
        for i in 0..n {
            for j in (i + 1)..n {
                if self.distance(i, j) != self.distance(j, i) || self.flow(i, j) != self.flow(j, i)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Returns `true` if no entry of either matrix is negative.
    ///
    /// Non-negative instances never produce negative costs.
    pub fn is_non_negative(&self) -> bool {
        self.distance.iter().chain(self.flow.iter()).all(|&v| v >= 0)
    }
}
