//! Portable snapshot of a [`CbassPath`] for persistence and transport.
//!
//! Matrices are flattened row by row (the transpose of nalgebra's
//! column-major storage) so that a consumer can reshape each entry with a
//! row-major `reshape(rows, cols)`. Shapes are stored once in the header.
//!
//! ```text
//! u_path[k]      n × p           row-major
//! v_row_path[k]  row_edges × p   row-major
//! v_col_path[k]  col_edges × n   row-major
//! ```
//!
//! # no_std
//!
//! This module requires the `serde` feature and works on `no_std + alloc`.

use alloc::vec::Vec;

use nalgebra::DMatrix;

use crate::store::{CbassPath, Termination};

/// Current snapshot format version.
pub const PATH_SNAPSHOT_VERSION: u16 = 1;

/// A serializable, shape-annotated copy of a regularization path.
///
/// # Example
///
/// ```rust,ignore
/// use cbass_core::snapshot::PathSnapshot;
///
/// let snapshot = PathSnapshot::from_path(&path);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: PathSnapshot = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct PathSnapshot {
    /// Format version, [`PATH_SNAPSHOT_VERSION`] for new snapshots.
    pub version: u16,
    /// Observations (rows of the data).
    pub n: usize,
    /// Features (columns of the data).
    pub p: usize,
    /// Row-graph edges.
    pub row_edges: usize,
    /// Column-graph edges.
    pub col_edges: usize,
    /// Regularization values.
    pub gamma_path: Vec<f64>,
    /// Primal estimates, row-major.
    pub u_path: Vec<Vec<f64>>,
    /// Row split variables, row-major.
    pub v_row_path: Vec<Vec<f64>>,
    /// Column split variables, row-major.
    pub v_col_path: Vec<Vec<f64>>,
    /// Row-edge fusion indicators.
    pub row_fusions: Vec<Vec<bool>>,
    /// Column-edge fusion indicators.
    pub col_fusions: Vec<Vec<bool>>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Outer iterations performed.
    pub iterations: usize,
}

fn row_major(m: &DMatrix<f64>) -> Vec<f64> {
    m.transpose().as_slice().to_vec()
}

impl PathSnapshot {
    /// Flatten `path`.
    ///
    /// `n` and `p` come from the first primal estimate; a path is never empty
    /// when it comes from the driver, and an empty one yields zero shapes.
    pub fn from_path(path: &CbassPath) -> Self {
        let (n, p) = path.u_path.first().map_or((0, 0), |u| u.shape());
        let row_edges = path.v_row_path.first().map_or(0, |v| v.nrows());
        let col_edges = path.v_col_path.first().map_or(0, |v| v.nrows());

        Self {
            version: PATH_SNAPSHOT_VERSION,
            n,
            p,
            row_edges,
            col_edges,
            gamma_path: path.gamma_path.clone(),
            u_path: path.u_path.iter().map(row_major).collect(),
            v_row_path: path.v_row_path.iter().map(row_major).collect(),
            v_col_path: path.v_col_path.iter().map(row_major).collect(),
            row_fusions: path.row_fusions.iter().map(|f| f.as_slice().to_vec()).collect(),
            col_fusions: path.col_fusions.iter().map(|f| f.as_slice().to_vec()).collect(),
            termination: path.termination,
            iterations: path.iterations,
        }
    }

    /// Number of path points.
    pub fn len(&self) -> usize {
        self.gamma_path.len()
    }

    /// `true` if the snapshot holds no points.
    pub fn is_empty(&self) -> bool {
        self.gamma_path.is_empty()
    }

    /// `true` when the run stopped on the iteration budget.
    pub fn early_terminated(&self) -> bool {
        self.termination == Termination::MaxIterReached
    }

    /// Rebuild primal estimate `k` as an `n × p` matrix.
    ///
    /// Returns `None` if `k` is out of range or the stored entry does not
    /// have `n·p` values.
    pub fn u(&self, k: usize) -> Option<DMatrix<f64>> {
        let flat = self.u_path.get(k)?;
        if flat.len() != self.n * self.p {
            return None;
        }
        Some(DMatrix::from_row_slice(self.n, self.p, flat))
    }
}
