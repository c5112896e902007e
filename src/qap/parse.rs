//! Text loader for QAP instances.
//!
//! # Format
//!
//! ```text
//! N
//! <N rows of N integers>   distance matrix (locations)
//! <N rows of N integers>   flow matrix (facilities)
//! ```
//!
//! Values are separated by any whitespace. Blank lines are ignored, so the
//! two matrices are usually separated by an empty line. Only the first
//! token of the header line is read.

use super::instance::QapInstance;
use crate::error::{QapError, Result};
use std::path::Path;
use std::str::FromStr;

/// Parses an instance from its textual form.
///
/// # Errors
///
/// [`QapError::Format`] when the header is missing or not an integer, when
/// a row has the wrong number of values or a value is not an integer, and
/// when the number of rows differs from `2 * N`. [`QapError::Config`] when
/// `N < 2`.
///
/// # Examples
///
/// ```
/// use u_antqap::qap::parse_instance;
///
/// let text = "2\n\n0 4\n4 0\n\n0 1\n1 0\n";
/// let instance = parse_instance(text).unwrap();
/// assert_eq!(instance.size(), 2);
/// assert_eq!(instance.distance(0, 1), 4);
/// ```
pub fn parse_instance(text: &str) -> Result<QapInstance> {
    let mut rows = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = rows
        .next()
        .ok_or_else(|| QapError::format(0, "empty input, expected node count"))?;
    let n_token = header
        .split_whitespace()
        .next()
        .ok_or_else(|| QapError::format(header_line, "missing node count"))?;
    let n: usize = n_token.parse().map_err(|_| {
        QapError::format(
            header_line,
            format!("node count {n_token:?} is not a non-negative integer"),
        )
    })?;
    if n < 2 {
        return Err(QapError::Config(format!(
            "instance needs at least 2 nodes, got {n}"
        )));
    }

    let mut distance = Vec::with_capacity(n * n);
    let mut flow = Vec::with_capacity(n * n);
    for row_idx in 0..2 * n {
        let (line_no, line) = rows.next().ok_or_else(|| {
            QapError::format(
                0,
                format!("expected {} matrix rows, found {row_idx}", 2 * n),
            )
        })?;
        let target = if row_idx < n { &mut distance } else { &mut flow };
        parse_row(line, line_no, n, target)?;
    }

    if let Some((line_no, _)) = rows.next() {
        return Err(QapError::format(
            line_no,
            format!("unexpected data after {} matrix rows", 2 * n),
        ));
    }

    QapInstance::new(n, distance, flow)
}

/// Parses one whitespace-delimited row of exactly `n` integers into `out`.
fn parse_row(line: &str, line_no: usize, n: usize, out: &mut Vec<i64>) -> Result<()> {
    let start = out.len();
    for token in line.split_whitespace() {
        let value: i64 = token.parse().map_err(|_| {
            QapError::format(line_no, format!("value {token:?} is not an integer"))
        })?;
        out.push(value);
    }
    let found = out.len() - start;
    if found != n {
        return Err(QapError::format(
            line_no,
            format!("expected {n} values, found {found}"),
        ));
    }
    Ok(())
}

impl QapInstance {
    /// Reads and parses an instance file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let instance = parse_instance(&text)?;
        tracing::debug!(
            path = %path.display(),
            nodes = instance.size(),
            "loaded QAP instance"
        );
        Ok(instance)
    }
}

impl FromStr for QapInstance {
    type Err = QapError;

    fn from_str(s: &str) -> Result<Self> {
        parse_instance(s)
    }
}
