//! Quadratic Assignment Problem model.
//!
//! Given `n` facilities and `n` locations, a distance matrix between
//! locations and a flow matrix between facilities, find the assignment
//! minimizing the total flow-weighted distance.
//!
//! # Key Types
//!
//! - [`QapInstance`]: immutable distance/flow matrices with the exact
//!   objective [`QapInstance::cost`]
//! - [`Permutation`]: `path[location] = facility`
//! - [`parse_instance`]: whitespace-delimited text loader
//!
//! # References
//!
//! - Koopmans & Beckmann (1957), "Assignment Problems and the Location of
//!   Economic Activities"
//! - Burkard, Karisch & Rendl (1997), "QAPLIB – A Quadratic Assignment
//!   Problem Library"

mod instance;
mod parse;

pub use instance::{is_permutation, Permutation, QapInstance};
pub use parse::parse_instance;
