//! Validated inputs for one biclustering path.
//!
//! Shapes (n rows, p columns):
//!
//! ```text
//! data         n × p
//! row_diff     row_edges × n      one row per row-graph edge
//! col_diff     p × col_edges      one column per column-graph edge
//! row_weights  row_edges
//! col_weights  col_edges
//! ```
//!
//! The operators and weights are built upstream from neighbour graphs; this
//! module only checks that they line up.

use nalgebra::{DMatrix, DVector};

use crate::error::CbassError;

/// Immutable problem definition shared by every iteration of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct BiclusterProblem {
    data: DMatrix<f64>,
    row_diff: DMatrix<f64>,
    col_diff: DMatrix<f64>,
    row_weights: DVector<f64>,
    col_weights: DVector<f64>,
    gamma_init: f64,
}

impl BiclusterProblem {
    /// Validate and bundle the inputs.
    ///
    /// Fails with [`CbassError::DimensionMismatch`] when an operator or weight
    /// vector disagrees with the data shape, and with
    /// [`CbassError::InvalidParameter`] for negative or non-finite weights or
    /// a non-positive `gamma_init`.
    pub fn new(
        data: DMatrix<f64>,
        row_diff: DMatrix<f64>,
        col_diff: DMatrix<f64>,
        row_weights: DVector<f64>,
        col_weights: DVector<f64>,
        gamma_init: f64,
    ) -> Result<Self, CbassError> {
        let (n, p) = data.shape();
        if n == 0 || p == 0 {
            return Err(CbassError::EmptyData { rows: n, cols: p });
        }
        if row_diff.ncols() != n {
            return Err(CbassError::DimensionMismatch {
                what: "row difference operator columns",
                expected: n,
                found: row_diff.ncols(),
            });
        }
        if col_diff.nrows() != p {
            return Err(CbassError::DimensionMismatch {
                what: "column difference operator rows",
                expected: p,
                found: col_diff.nrows(),
            });
        }
        if row_weights.len() != row_diff.nrows() {
            return Err(CbassError::DimensionMismatch {
                what: "row weights",
                expected: row_diff.nrows(),
                found: row_weights.len(),
            });
        }
        if col_weights.len() != col_diff.ncols() {
            return Err(CbassError::DimensionMismatch {
                what: "column weights",
                expected: col_diff.ncols(),
                found: col_weights.len(),
            });
        }
        if !admissible_weights(&row_weights) {
            return Err(CbassError::InvalidParameter {
                name: "row_weights",
                reason: "must be finite and non-negative",
            });
        }
        if !admissible_weights(&col_weights) {
            return Err(CbassError::InvalidParameter {
                name: "col_weights",
                reason: "must be finite and non-negative",
            });
        }
        if !(gamma_init.is_finite() && gamma_init > 0.0) {
            return Err(CbassError::InvalidParameter {
                name: "gamma_init",
                reason: "must be finite and positive",
            });
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(CbassError::InvalidParameter {
                name: "data",
                reason: "must contain only finite values",
            });
        }

        Ok(Self {
            data,
            row_diff,
            col_diff,
            row_weights,
            col_weights,
            gamma_init,
        })
    }

    /// The n × p data matrix.
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Row difference operator, `row_edges × n`.
    pub fn row_diff(&self) -> &DMatrix<f64> {
        &self.row_diff
    }

    /// Column difference operator, `p × col_edges`.
    pub fn col_diff(&self) -> &DMatrix<f64> {
        &self.col_diff
    }

    /// One weight per row edge.
    pub fn row_weights(&self) -> &DVector<f64> {
        &self.row_weights
    }

    /// One weight per column edge.
    pub fn col_weights(&self) -> &DVector<f64> {
        &self.col_weights
    }

    /// Regularization value at path point 0.
    pub fn gamma_init(&self) -> f64 {
        self.gamma_init
    }

    /// Number of observations (rows of the data matrix).
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features (columns of the data matrix).
    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    /// Number of edges in the row similarity graph.
    pub fn row_edges(&self) -> usize {
        self.row_diff.nrows()
    }

    /// Number of edges in the column similarity graph.
    pub fn col_edges(&self) -> usize {
        self.col_diff.ncols()
    }
}

fn admissible_weights(w: &DVector<f64>) -> bool {
    w.iter().all(|x| x.is_finite() && *x >= 0.0)
}

/// Build the incidence-style difference operator for an edge list over
/// `nodes` nodes: edge `(i, j)` contributes a row with `+1` at `i` and `-1`
/// at `j`.
///
/// Returns `edges.len() × nodes`. Use directly as a row operator, or
/// transpose it for the column operator.
pub fn difference_operator(edges: &[(usize, usize)], nodes: usize) -> Result<DMatrix<f64>, CbassError> {
    let mut d = DMatrix::zeros(edges.len(), nodes);
    for (e, &(i, j)) in edges.iter().enumerate() {
        if i >= nodes || j >= nodes {
            return Err(CbassError::DimensionMismatch {
                what: "edge endpoint",
                expected: nodes,
                found: i.max(j),
            });
        }
        if i == j {
            return Err(CbassError::InvalidParameter {
                name: "edges",
                reason: "self-loops have no difference row",
            });
        }
        d[(e, i)] = 1.0;
        d[(e, j)] = -1.0;
    }
    Ok(d)
}
