/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Two-block consensus ADMM step.
//!
//! Row fusion and column fusion are separate ADMM subproblems sharing one
//! primal estimate `U`. The consensus variables `P` and `Q` carry the
//! disagreement between the two halves from one step to the next.
//!
//! # One step at trial value γ
//!
//! ```text
//! row half     T     = (I + ρ·DrᵀDr)⁻¹ (U₀ + P₀ + ρ·Drᵀ(Vr₀ − Zr₀))
//!              Vr    = prox(Dr·T + Zr₀, γ/ρ, w_row)
//!              Zr    = Zr₀ + Dr·T − Vr
//! bridge       P     = P₀ + U₀ − T
//! column half  S     = (I + ρ·DcᵀDc)⁻¹ ((T + Q₀)ᵀ + ρ·Dcᵀ(Vc₀ − Zc₀))   with Dc = D_colᵀ
//!              Vc    = prox(Dc·S + Zc₀, γ/ρ, w_col)
//!              Zc    = Zc₀ + Dc·S − Vc
//! close        U     = Sᵀ
//!              Q     = Q₀ + T − U
//! ```
//!
//! Both halves run the same [`FusionSubproblem::half_step`]; the column half
//! simply works in the transposed (p × n) orientation. The step is a pure
//! function of the previous state: the backtracking search re-runs it from
//! the same baseline as many times as it needs.

use core::fmt;

use nalgebra::{DMatrix, DVector};

use crate::error::CbassError;
use crate::problem::BiclusterProblem;
use crate::prox::BlockProx;
use crate::system::PrimalSystem;

/// Which similarity graph a subproblem fuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Row graph; works on the n × p estimate.
    Rows,
    /// Column graph; works on the transposed p × n estimate.
    Columns,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Rows => f.write_str("row"),
            Orientation::Columns => f.write_str("column"),
        }
    }
}

/// Full iterate of the consensus ADMM.
///
/// `v_row`/`z_row` are `row_edges × p`; `v_col`/`z_col` are `col_edges × n`
/// (column blocks live in the transposed orientation).
#[derive(Clone, Debug, PartialEq)]
pub struct AdmmState {
    /// Primal estimate, n × p.
    pub u: DMatrix<f64>,
    /// Row-fusion split variable.
    pub v_row: DMatrix<f64>,
    /// Row-fusion scaled dual.
    pub z_row: DMatrix<f64>,
    /// Column-fusion split variable.
    pub v_col: DMatrix<f64>,
    /// Column-fusion scaled dual.
    pub z_col: DMatrix<f64>,
    /// Consensus variable closing the row half.
    pub p: DMatrix<f64>,
    /// Consensus variable closing the column half.
    pub q: DMatrix<f64>,
}

impl AdmmState {
    /// Starting iterate: `U = X`, splits equal to the mapped data, duals equal
    /// to the splits, consensus variables zero.
    pub fn initial(problem: &BiclusterProblem) -> Self {
        let x = problem.data();
        let v_row = problem.row_diff() * x;
        let v_col = problem.col_diff().tr_mul(&x.transpose());
        Self {
            u: x.clone(),
            z_row: v_row.clone(),
            v_row,
            z_col: v_col.clone(),
            v_col,
            p: DMatrix::zeros(x.nrows(), x.ncols()),
            q: DMatrix::zeros(x.nrows(), x.ncols()),
        }
    }
}

/// Output of one half step.
#[derive(Clone, Debug)]
pub struct HalfStep {
    /// Primal solve result in this subproblem's orientation.
    pub primal: DMatrix<f64>,
    /// Shrunk split variable.
    pub split: DMatrix<f64>,
    /// Updated scaled dual.
    pub dual: DMatrix<f64>,
}

/// One fusion subproblem: edge operator, its cached system and edge weights.
#[derive(Clone, Debug)]
pub struct FusionSubproblem {
    edges: DMatrix<f64>,
    edges_t: DMatrix<f64>,
    system: PrimalSystem,
    weights: DVector<f64>,
}

impl FusionSubproblem {
    /// Build the subproblem for `edges` (`edge_count × dim`) and factor its
    /// primal system.
    pub fn new(
        edges: DMatrix<f64>,
        weights: DVector<f64>,
        rho: f64,
        orientation: Orientation,
    ) -> Result<Self, CbassError> {
        let system = PrimalSystem::factor(&edges, rho, orientation)?;
        Ok(Self {
            edges_t: edges.transpose(),
            edges,
            system,
            weights,
        })
    }

    /// Row subproblem of `problem`: edge operator `D_row`.
    pub fn rows(problem: &BiclusterProblem, rho: f64) -> Result<Self, CbassError> {
        Self::new(
            problem.row_diff().clone(),
            problem.row_weights().clone(),
            rho,
            Orientation::Rows,
        )
    }

    /// Column subproblem of `problem`: edge operator `D_colᵀ`.
    pub fn columns(problem: &BiclusterProblem, rho: f64) -> Result<Self, CbassError> {
        Self::new(
            problem.col_diff().transpose(),
            problem.col_weights().clone(),
            rho,
            Orientation::Columns,
        )
    }

    /// Run primal solve, shrinkage and dual update for this subproblem.
    ///
    /// `base` is the consensus right-hand side (`U₀ + P₀` for rows,
    /// `(T + Q₀)ᵀ` for columns) and is consumed.
    pub fn half_step<P: BlockProx>(
        &self,
        prox: &P,
        rho: f64,
        base: DMatrix<f64>,
        split_old: &DMatrix<f64>,
        dual_old: &DMatrix<f64>,
        gamma: f64,
    ) -> HalfStep {
        let rhs = base + (&self.edges_t * (split_old - dual_old)) * rho;
        let primal = self.system.solve(&rhs);
        let mapped = &self.edges * &primal;
        let split = prox.prox(&(&mapped + dual_old), gamma / rho, &self.weights);
        let dual = dual_old + &mapped - &split;
        HalfStep { primal, split, dual }
    }

    /// Orientation of this subproblem.
    pub fn orientation(&self) -> Orientation {
        self.system.orientation()
    }

    /// Number of edges (split-variable blocks).
    pub fn edge_count(&self) -> usize {
        self.edges.nrows()
    }
}

/// Step engine: both subproblems plus the shared shrinkage operator.
#[derive(Clone, Debug)]
pub struct ConsensusAdmm<P> {
    rows: FusionSubproblem,
    cols: FusionSubproblem,
    rho: f64,
    prox: P,
}

impl<P: BlockProx> ConsensusAdmm<P> {
    /// Factor both cached systems for `problem`.
    pub fn new(problem: &BiclusterProblem, rho: f64, prox: P) -> Result<Self, CbassError> {
        Ok(Self {
            rows: FusionSubproblem::rows(problem, rho)?,
            cols: FusionSubproblem::columns(problem, rho)?,
            rho,
            prox,
        })
    }

    /// One full row-half + column-half step from `old` at trial value `gamma`.
    ///
    /// `old` is left untouched.
    pub fn step(&self, old: &AdmmState, gamma: f64) -> AdmmState {
        let row = self.rows.half_step(
            &self.prox,
            self.rho,
            &old.u + &old.p,
            &old.v_row,
            &old.z_row,
            gamma,
        );
        let p = &old.p + &old.u - &row.primal;

        let col = self.cols.half_step(
            &self.prox,
            self.rho,
            (&row.primal + &old.q).transpose(),
            &old.v_col,
            &old.z_col,
            gamma,
        );
        let u = col.primal.transpose();
        let q = &old.q + &row.primal - &u;

        AdmmState {
            u,
            v_row: row.split,
            z_row: row.dual,
            v_col: col.split,
            z_col: col.dual,
            p,
            q,
        }
    }

    /// Row subproblem.
    pub fn rows(&self) -> &FusionSubproblem {
        &self.rows
    }

    /// Column subproblem.
    pub fn cols(&self) -> &FusionSubproblem {
        &self.cols
    }

    /// Coupling constant both systems were factored with.
    pub fn rho(&self) -> f64 {
        self.rho
    }
}
