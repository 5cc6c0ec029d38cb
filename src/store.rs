/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Append-only storage for retained path points, and the returned path.
//!
//! The final path length is unknown up front. Storage starts at
//! `⌊1.5·(n + p)⌋` points (biclustering dendrograms have `O(n + p)` merge
//! events), doubles when full, and is trimmed once when the run ends.
//!
//! # Invariants
//! - Every per-point sequence has the same length and indexing.
//! - Capacity only grows until [`PathStore::finish`].

use alloc::vec::Vec;

use nalgebra::DMatrix;

use crate::admm::AdmmState;
use crate::fusion::FusionPattern;

/// Why the driver stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Every row edge and every column edge is fused.
    AllFused,
    /// The outer-iteration budget ran out first. The partial path is complete
    /// up to that point.
    MaxIterReached,
}

/// One retained snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPoint {
    /// Primal estimate, n × p.
    pub u: DMatrix<f64>,
    /// Row split variable, `row_edges × p`.
    pub v_row: DMatrix<f64>,
    /// Column split variable, `col_edges × n`.
    pub v_col: DMatrix<f64>,
    /// Regularization value of the accepted step.
    pub gamma: f64,
    /// Row-edge fusion indicators.
    pub row_fusions: FusionPattern,
    /// Column-edge fusion indicators.
    pub col_fusions: FusionPattern,
}

impl PathPoint {
    /// Copy the retained parts of `state`.
    pub fn capture(
        state: &AdmmState,
        gamma: f64,
        row_fusions: &FusionPattern,
        col_fusions: &FusionPattern,
    ) -> Self {
        Self {
            u: state.u.clone(),
            v_row: state.v_row.clone(),
            v_col: state.v_col.clone(),
            gamma,
            row_fusions: row_fusions.clone(),
            col_fusions: col_fusions.clone(),
        }
    }
}

/// Growable column store, one sequence per retained quantity.
#[derive(Clone, Debug)]
pub struct PathStore {
    u_path: Vec<DMatrix<f64>>,
    v_row_path: Vec<DMatrix<f64>>,
    v_col_path: Vec<DMatrix<f64>>,
    gamma_path: Vec<f64>,
    row_fusions: Vec<FusionPattern>,
    col_fusions: Vec<FusionPattern>,
    capacity: usize,
}

impl PathStore {
    /// Empty store with room for `capacity` points (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            u_path: Vec::with_capacity(capacity),
            v_row_path: Vec::with_capacity(capacity),
            v_col_path: Vec::with_capacity(capacity),
            gamma_path: Vec::with_capacity(capacity),
            row_fusions: Vec::with_capacity(capacity),
            col_fusions: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Starting capacity for an `n × p` problem: `⌊1.5·(n + p)⌋`.
    pub fn initial_capacity(n: usize, p: usize) -> usize {
        (n + p) * 3 / 2
    }

    /// Points stored so far.
    pub fn len(&self) -> usize {
        self.gamma_path.len()
    }

    /// `true` before the first point is stored.
    pub fn is_empty(&self) -> bool {
        self.gamma_path.is_empty()
    }

    /// Reserved slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` when the next push needs [`PathStore::grow`] first.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Double the reserved capacity. Returns `(old, new)`.
    pub fn grow(&mut self) -> (usize, usize) {
        let old = self.capacity;
        let new = old * 2;
        let extra = new - self.len();
        self.u_path.reserve_exact(extra);
        self.v_row_path.reserve_exact(extra);
        self.v_col_path.reserve_exact(extra);
        self.gamma_path.reserve_exact(extra);
        self.row_fusions.reserve_exact(extra);
        self.col_fusions.reserve_exact(extra);
        self.capacity = new;
        (old, new)
    }

    /// Append one point, growing first if needed.
    pub fn push(&mut self, point: PathPoint) {
        if self.is_full() {
            self.grow();
        }
        self.u_path.push(point.u);
        self.v_row_path.push(point.v_row);
        self.v_col_path.push(point.v_col);
        self.gamma_path.push(point.gamma);
        self.row_fusions.push(point.row_fusions);
        self.col_fusions.push(point.col_fusions);
    }

    /// Regularization value of the most recent point.
    pub fn last_gamma(&self) -> Option<f64> {
        self.gamma_path.last().copied()
    }

    /// Trim to the stored length and hand back the path.
    pub fn finish(mut self, termination: Termination, iterations: usize) -> CbassPath {
        self.u_path.shrink_to_fit();
        self.v_row_path.shrink_to_fit();
        self.v_col_path.shrink_to_fit();
        self.gamma_path.shrink_to_fit();
        self.row_fusions.shrink_to_fit();
        self.col_fusions.shrink_to_fit();
        CbassPath {
            u_path: self.u_path,
            v_row_path: self.v_row_path,
            v_col_path: self.v_col_path,
            gamma_path: self.gamma_path,
            row_fusions: self.row_fusions,
            col_fusions: self.col_fusions,
            termination,
            iterations,
        }
    }
}

/// Regularization path returned by the driver.
///
/// All sequences share one index: entry `k` of each belongs to path point `k`.
/// Point 0 is the unregularized starting state.
#[derive(Clone, Debug, PartialEq)]
pub struct CbassPath {
    /// Primal estimates, n × p each.
    pub u_path: Vec<DMatrix<f64>>,
    /// Row split variables, `row_edges × p` each.
    pub v_row_path: Vec<DMatrix<f64>>,
    /// Column split variables, `col_edges × n` each.
    pub v_col_path: Vec<DMatrix<f64>>,
    /// Regularization values.
    pub gamma_path: Vec<f64>,
    /// Row-edge fusion indicators.
    pub row_fusions: Vec<FusionPattern>,
    /// Column-edge fusion indicators.
    pub col_fusions: Vec<FusionPattern>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Outer iterations performed.
    pub iterations: usize,
}

impl CbassPath {
    /// Number of retained path points.
    pub fn len(&self) -> usize {
        self.gamma_path.len()
    }

    /// `true` if no point was retained (never the case for a driver result).
    pub fn is_empty(&self) -> bool {
        self.gamma_path.is_empty()
    }

    /// `true` when the iteration budget ran out before everything fused.
    pub fn early_terminated(&self) -> bool {
        self.termination == Termination::MaxIterReached
    }

    /// Regularization value of the last retained point.
    pub fn final_gamma(&self) -> Option<f64> {
        self.gamma_path.last().copied()
    }

    /// Reassemble retained point `k`.
    pub fn point(&self, k: usize) -> Option<PathPoint> {
        Some(PathPoint {
            u: self.u_path.get(k)?.clone(),
            v_row: self.v_row_path.get(k)?.clone(),
            v_col: self.v_col_path.get(k)?.clone(),
            gamma: *self.gamma_path.get(k)?,
            row_fusions: self.row_fusions.get(k)?.clone(),
            col_fusions: self.col_fusions.get(k)?.clone(),
        })
    }
}
