//! Error taxonomy for path computation.
//!
//! Configuration and numerical failures are fatal and surface before (or at)
//! the first iteration. Running out of outer iterations is *not* an error:
//! it is reported through [`crate::store::Termination::MaxIterReached`] on the
//! returned path. Hitting the inner trial cap is silent.

use thiserror::Error;

use crate::admm::Orientation;

/// Failures that abort a path computation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CbassError {
    /// The data matrix has no rows or no columns.
    #[error("data matrix must be non-empty, got {rows}x{cols}")]
    EmptyData {
        /// Rows of the supplied data matrix.
        rows: usize,
        /// Columns of the supplied data matrix.
        cols: usize,
    },

    /// An operator or weight vector does not line up with the data matrix.
    #[error("dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Which input is malformed.
        what: &'static str,
        /// Size implied by the other inputs.
        expected: usize,
        /// Size actually supplied.
        found: usize,
    },

    /// A scalar parameter or weight is outside its admissible range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in [`crate::config::CbassConfig`] or
        /// [`crate::problem::BiclusterProblem`].
        name: &'static str,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// `I + rho·DᵀD` failed to factor; the difference operator is malformed.
    #[error("{orientation} primal system is not positive definite")]
    NotPositiveDefinite {
        /// Which of the two cached systems failed.
        orientation: Orientation,
    },

    /// The cancellation collaborator asked the driver to stop.
    #[error("path computation interrupted after {iterations} outer iterations")]
    Interrupted {
        /// Outer iterations completed before the abort was observed.
        iterations: usize,
    },
}
