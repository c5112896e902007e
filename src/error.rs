//! Error types shared by the loader, the trial runner and the orchestrator.
//!
//! Every error is terminal for the trial that raised it. Sibling trials
//! launched by [`TrialOrchestrator`](crate::aco::TrialOrchestrator) keep
//! running and report their own outcome.

use thiserror::Error;

/// Result type alias for fallible QAP/ACO operations.
pub type Result<T> = std::result::Result<T, QapError>;

/// Failure taxonomy for a single trial.
#[derive(Error, Debug)]
pub enum QapError {
    /// Malformed or size-mismatched instance input.
    ///
    /// `line` is 1-based and refers to the raw input text, or 0 when the
    /// problem is not tied to a particular line (e.g. missing rows at EOF).
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Invalid hyperparameter or problem size.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A non-positive cost reached the deposit step under
    /// [`CostFloor::Abort`](crate::aco::CostFloor::Abort).
    #[error("non-positive cost {cost} cannot be turned into a pheromone deposit")]
    FatalCost { cost: i64 },

    /// Reading an instance file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QapError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        QapError::Format {
            line,
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by the input instance rather than
    /// by the trial configuration or the search itself.
    pub fn is_input_error(&self) -> bool {
        matches!(self, QapError::Format { .. } | QapError::Io(_))
    }
}
