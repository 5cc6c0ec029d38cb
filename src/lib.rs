//! # cbass-core
//!
//! Regularization paths for convex biclustering.
//!
//! Given an n × p data matrix and two weighted similarity graphs (one over
//! rows, one over columns), convex biclustering shrinks differences across
//! graph edges. As the regularization value gamma grows, edges collapse to
//! exactly zero one by one: rows and columns *fuse* into clusters. The order
//! of those fusion events is the dendrogram.
//!
//! This crate follows that path with a consensus ADMM and a backtracking
//! search on gamma that tries to observe exactly one new fusion per graph at
//! a time, so no merge event is skipped.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! BiclusterProblem ─┐
//! CbassConfig ──────┴→ PathDriver ──→ CbassPath
//!                        │   ↑
//!                        ↓   │ accept / bisect
//!                   ConsensusAdmm → FusionPattern → Backtracker
//!                   (PrimalSystem ×2, BlockProx)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`problem`] | [`BiclusterProblem`] | Validated data, difference operators, edge weights |
//! | [`config`] | [`CbassConfig`] | Run parameters and their defaults |
//! | [`system`] | [`PrimalSystem`] | Cholesky factor of `I + rho·DᵀD`, solved every trial |
//! | [`prox`] | [`BlockProx`], [`Shrinkage`] | Exact-zero block shrinkage (elementwise or block norm) |
//! | [`admm`] | [`ConsensusAdmm`], [`AdmmState`] | One row-half + column-half consensus step |
//! | [`fusion`] | [`FusionPattern`] | Exact-zero block detection per edge |
//! | [`backtrack`] | [`Backtracker`], [`Verdict`] | Bisection on gamma isolating single fusions |
//! | [`schedule`] | [`StepSchedule`] | Burn-in and the coarse → fine multiplier switch |
//! | [`store`] | [`PathStore`], [`CbassPath`] | Doubling storage for retained points, trimmed result |
//! | [`diagnostics`] | [`Diagnostics`], [`Interrupt`] | Injected logging and cancellation hooks |
//! | [`driver`] | [`PathDriver`], [`cbass_viz`] | The outer loop |
//! | `snapshot` | `PathSnapshot` | Serialisable row-major path export (requires `serde` feature) |
//!
//! ## Example
//!
//! ```rust,ignore
//! use cbass_core::{cbass_viz, difference_operator, BiclusterProblem, CbassConfig};
//! use nalgebra::{DMatrix, DVector};
//!
//! let x = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 1.1, 2.2, 5.0, -1.0]);
//! let d_row = difference_operator(&[(0, 1), (1, 2)], 3)?;
//! let d_col = difference_operator(&[(0, 1)], 2)?.transpose();
//! let problem = BiclusterProblem::new(
//!     x, d_row, d_col,
//!     DVector::from_element(2, 1.0),
//!     DVector::from_element(1, 1.0),
//!     1e-4,
//! )?;
//! let path = cbass_viz(&problem, &CbassConfig::default())?;
//! println!("{} points, final gamma {:?}", path.len(), path.final_gamma());
//! ```
//!
//! ## `no_std`
//!
//! The crate needs a heap (`alloc`) but not `std`. The `std` feature is on by
//! default; disable default features for `no_std + alloc` targets.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod admm;
pub mod backtrack;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod fusion;
pub mod problem;
pub mod prox;
pub mod schedule;
pub mod store;
pub mod system;
#[cfg(feature = "serde")]
pub mod snapshot;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use admm::{AdmmState, ConsensusAdmm, FusionSubproblem, Orientation};
pub use backtrack::{Backtracker, Bracket, Verdict};
pub use config::CbassConfig;
pub use diagnostics::{Diagnostics, Interrupt, LogDiagnostics, SilentDiagnostics, Uninterruptible};
pub use driver::{cbass_viz, PathDriver};
pub use error::CbassError;
pub use fusion::{FusionCounts, FusionPattern};
pub use problem::{difference_operator, BiclusterProblem};
pub use prox::{BlockProx, Shrinkage, ShrinkageMode};
pub use schedule::StepSchedule;
pub use store::{CbassPath, PathPoint, PathStore, Termination};
pub use system::PrimalSystem;
