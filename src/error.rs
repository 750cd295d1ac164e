//! Error types for ring editing and pattern generation.

use thiserror::Error;

use crate::generator::{MAX_STEPS, MIN_STEPS};

/// Convenient result alias for generation and ring operations.
pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors from pattern generation and ring resizing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Requested step count falls outside the supported ring sizes.
    #[error("step count {0} is outside {MIN_STEPS}..={MAX_STEPS}")]
    InvalidCount(usize),
    /// A seam resolution found both polarities over their run bounds, so no
    /// symmetric pattern exists for these parameters.
    #[error(
        "no symmetric pattern fits: a rest run of {rest_run} exceeds \
         {max_rest_run} and an active run of {active_run} exceeds {max_active_run}"
    )]
    UnsatisfiableConstraints {
        /// Rest run that committing a rest would have produced.
        rest_run: usize,
        /// Caller-supplied rest run bound.
        max_rest_run: usize,
        /// Active run that committing an active step would have produced.
        active_run: usize,
        /// Caller-supplied active run bound.
        max_active_run: usize,
    },
}
