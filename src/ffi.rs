//! Python FFI bindings via PyO3.
//!
//! Exposes the path driver as a single function taking nested lists.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from cbass_core import cbass_viz
//!
//! x = [[0.9, -1.2], [1.7, 0.3], [-2.1, 1.4]]
//! d_row = [[1, -1, 0], [0, 1, -1]]          # row edges × n
//! d_col = [[1], [-1]]                       # p × column edges
//! out = cbass_viz(x, d_row, d_col, 1e-4, weights_col=[1.0], weights_row=[1.0, 1.0])
//! print(len(out["gamma_path"]), out["early_terminated"])
//! ```
//!
//! `Ctrl-C` is honoured every 50 outer iterations and raises
//! `KeyboardInterrupt`.

use nalgebra::{DMatrix, DVector};
use pyo3::exceptions::{PyKeyboardInterrupt, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::config::CbassConfig;
use crate::diagnostics::{Interrupt, LogDiagnostics};
use crate::driver::PathDriver;
use crate::error::CbassError;
use crate::problem::BiclusterProblem;
use crate::prox::ShrinkageMode;

// ── Conversion helpers ───────────────────────────────────────────────────────

/// Build a matrix from a list of rows. An empty list is a `0 × empty_width`
/// matrix.
fn to_matrix(name: &str, rows: Vec<Vec<f64>>, empty_width: usize) -> PyResult<DMatrix<f64>> {
    let Some(first) = rows.first() else {
        return Ok(DMatrix::zeros(0, empty_width));
    };
    let width = first.len();
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(PyValueError::new_err(format!(
            "{name} is ragged: row 0 has {width} entries, row {bad} has {}",
            rows[bad].len()
        )));
    }
    let nrows = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(DMatrix::from_row_slice(nrows, width, &flat))
}

fn to_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|r| r.iter().copied().collect()).collect()
}

fn to_py_err(err: CbassError) -> PyErr {
    match err {
        CbassError::Interrupted { iterations } => PyKeyboardInterrupt::new_err(format!(
            "interrupted after {iterations} iterations"
        )),
        other => PyValueError::new_err(other.to_string()),
    }
}

// ── Cancellation ─────────────────────────────────────────────────────────────

/// Polls the interpreter for pending signals; keeps the first error raised.
struct PySignals<'py> {
    py: Python<'py>,
    raised: Option<PyErr>,
}

impl Interrupt for PySignals<'_> {
    fn should_abort(&mut self) -> bool {
        match self.py.check_signals() {
            Ok(()) => false,
            Err(e) => {
                self.raised = Some(e);
                true
            }
        }
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

/// Compute a convex biclustering regularization path.
///
/// Args:
///     x:           n × p data, list of rows
///     d_row:       row difference operator, row edges × n
///     d_col:       column difference operator, p × column edges
///     gamma_init:  starting regularization value (> 0)
///     weights_col: one weight per column edge
///     weights_row: one weight per row edge
///     rho:         ADMM penalty
///     max_iter:    outer iteration budget
///     burn_in:     iterations before gamma starts growing
///     ti:          trial cap per outer iteration
///     t_switch:    fine multiplier after the first fusion
///     keep:        retain every `keep`-th iteration even without new fusions
///     l1:          elementwise instead of block-norm shrinkage
///
/// Returns:
///     dict with `u_path`, `v_row_path`, `v_col_path` (lists of matrices as
///     lists of rows), `v_row_zero_inds`, `v_col_zero_inds` (lists of bool
///     lists), `gamma_path` and `early_terminated`.
#[pyfunction]
#[pyo3(
    name = "cbass_viz",
    signature = (
        x, d_row, d_col, gamma_init, weights_col, weights_row,
        rho = 1.0, max_iter = 10000, burn_in = 50, ti = 15,
        t_switch = 1.01, keep = 10, l1 = false
    )
)]
#[allow(clippy::too_many_arguments)]
pub fn py_cbass_viz<'py>(
    py: Python<'py>,
    x: Vec<Vec<f64>>,
    d_row: Vec<Vec<f64>>,
    d_col: Vec<Vec<f64>>,
    gamma_init: f64,
    weights_col: Vec<f64>,
    weights_row: Vec<f64>,
    rho: f64,
    max_iter: usize,
    burn_in: usize,
    ti: usize,
    t_switch: f64,
    keep: usize,
    l1: bool,
) -> PyResult<Bound<'py, PyDict>> {
    let x = to_matrix("x", x, 0)?;
    let d_row = to_matrix("d_row", d_row, x.nrows())?;
    let d_col = to_matrix("d_col", d_col, 0)?;

    let problem = BiclusterProblem::new(
        x,
        d_row,
        d_col,
        DVector::from_vec(weights_row),
        DVector::from_vec(weights_col),
        gamma_init,
    )
    .map_err(to_py_err)?;

    let config = CbassConfig::new()
        .with_rho(rho)
        .with_max_iter(max_iter)
        .with_burn_in(burn_in)
        .with_max_trials(ti)
        .with_t_switch(t_switch)
        .with_keep(keep)
        .with_shrinkage(ShrinkageMode::from_l1_flag(l1));

    let driver = PathDriver::new(&problem, config).map_err(to_py_err)?;
    let mut signals = PySignals { py, raised: None };
    let path = match driver.run(&mut LogDiagnostics, &mut signals) {
        Ok(path) => path,
        Err(err) => return Err(signals.raised.take().unwrap_or_else(|| to_py_err(err))),
    };

    let out = PyDict::new_bound(py);
    out.set_item("u_path", path.u_path.iter().map(to_rows).collect::<Vec<_>>())?;
    out.set_item("v_row_path", path.v_row_path.iter().map(to_rows).collect::<Vec<_>>())?;
    out.set_item("v_col_path", path.v_col_path.iter().map(to_rows).collect::<Vec<_>>())?;
    out.set_item(
        "v_row_zero_inds",
        path.row_fusions.iter().map(|f| f.as_slice().to_vec()).collect::<Vec<_>>(),
    )?;
    out.set_item(
        "v_col_zero_inds",
        path.col_fusions.iter().map(|f| f.as_slice().to_vec()).collect::<Vec<_>>(),
    )?;
    out.set_item("gamma_path", path.gamma_path.clone())?;
    out.set_item("early_terminated", path.early_terminated())?;
    Ok(out)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Convex biclustering regularization paths.
#[pymodule]
pub fn cbass_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_cbass_viz, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
