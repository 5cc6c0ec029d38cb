/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Cached factorizations for the ADMM primal updates.
//!
//! Each fusion subproblem solves `(I + rho·DᵀD)·X = B` once per trial, with
//! `D` its `edges × dim` difference operator. The matrix never changes during
//! a run, so it is Cholesky-factored once and every later solve is two
//! triangular sweeps.
//!
//! - Rows: `D = D_row`, giving `I_n + rho·D_rowᵀ·D_row`.
//! - Columns: `D = D_colᵀ`, giving `I_p + rho·D_col·D_colᵀ`.
//!
//! # Invariants
//! - Factored exactly once per run; reused for every trial.
//! - Identity plus a PSD term is always SPD; failure means a malformed
//!   operator (non-finite entries) and is fatal.

use nalgebra::linalg::Cholesky;
use nalgebra::{DMatrix, Dyn};

use crate::admm::Orientation;
use crate::error::CbassError;

/// Cholesky factor of `I + rho·DᵀD` for one orientation.
#[derive(Clone, Debug)]
pub struct PrimalSystem {
    orientation: Orientation,
    factor: Cholesky<f64, Dyn>,
}

impl PrimalSystem {
    /// Factor `I + rho·edgesᵀ·edges`.
    ///
    /// `edges` is `edge_count × dim`; the factored system is `dim × dim`.
    pub fn factor(
        edges: &DMatrix<f64>,
        rho: f64,
        orientation: Orientation,
    ) -> Result<Self, CbassError> {
        let dim = edges.ncols();
        let mut gram = edges.tr_mul(edges) * rho;
        for i in 0..dim {
            gram[(i, i)] += 1.0;
        }
        let factor = Cholesky::new(gram).ok_or(CbassError::NotPositiveDefinite { orientation })?;
        Ok(Self { orientation, factor })
    }

    /// Solve the cached system for every column of `rhs` (`dim × k`).
    pub fn solve(&self, rhs: &DMatrix<f64>) -> DMatrix<f64> {
        debug_assert_eq!(rhs.nrows(), self.dim());
        self.factor.solve(rhs)
    }

    /// Side length of the factored system.
    pub fn dim(&self) -> usize {
        self.factor.l_dirty().nrows()
    }

    /// Orientation this system belongs to.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}
