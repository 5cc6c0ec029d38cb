/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Block proximal operator for the split-variable update.
//!
//! Input is organised in per-edge row blocks: row `e` of the matrix is the
//! block for edge `e`. Each block is shrunk toward zero by
//! `λ_e = threshold × weight[e]`.
//!
//! # Exactness
//!
//! Fusion detection tests blocks for *exact* zero. Both shrinkage rules here
//! are clamped branches: a block (or entry) whose magnitude is at most `λ_e`
//! is written as `0.0`, never as a small residual. A substitute operator
//! must keep that guarantee.

use nalgebra::{DMatrix, DVector};

/// How a block is measured and shrunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShrinkageMode {
    /// Soft-threshold every entry independently (ℓ₁ penalty).
    Elementwise,
    /// Scale the whole block by `1 − λ/‖b‖₂`, or zero it (group ℓ₂ penalty).
    #[default]
    BlockNorm,
}

impl ShrinkageMode {
    /// Map the host's `l1` flag onto a mode.
    pub fn from_l1_flag(l1: bool) -> Self {
        if l1 {
            Self::Elementwise
        } else {
            Self::BlockNorm
        }
    }
}

/// Contract for the split-variable shrinkage step.
///
/// Implementations return a matrix of the input's shape, and must produce an
/// exact-zero block whenever the shrinkage amount meets or exceeds the
/// block's magnitude under the chosen norm.
pub trait BlockProx {
    /// Shrink every row block of `input` by `threshold × weights[row]`.
    fn prox(&self, input: &DMatrix<f64>, threshold: f64, weights: &DVector<f64>) -> DMatrix<f64>;
}

/// Default soft-thresholding operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shrinkage {
    mode: ShrinkageMode,
}

impl Shrinkage {
    /// Operator using the given shrinkage rule.
    pub fn new(mode: ShrinkageMode) -> Self {
        Self { mode }
    }

    /// Shrinkage rule in use.
    pub fn mode(&self) -> ShrinkageMode {
        self.mode
    }
}

impl BlockProx for Shrinkage {
    fn prox(&self, input: &DMatrix<f64>, threshold: f64, weights: &DVector<f64>) -> DMatrix<f64> {
        debug_assert_eq!(input.nrows(), weights.len());
        let mut out = input.clone();
        for (e, mut block) in out.row_iter_mut().enumerate() {
            // A zero weight never shrinks, even once `threshold` is huge.
            let lambda = if weights[e] == 0.0 {
                0.0
            } else {
                threshold * weights[e]
            };
            match self.mode {
                ShrinkageMode::Elementwise => {
                    for x in block.iter_mut() {
                        *x = soft_threshold(*x, lambda);
                    }
                }
                ShrinkageMode::BlockNorm => {
                    let norm = block.norm();
                    if norm <= lambda {
                        block.fill(0.0);
                    } else {
                        block *= 1.0 - lambda / norm;
                    }
                }
            }
        }
        out
    }
}

/// Scalar soft threshold, exactly zero on `[-lambda, lambda]`.
///
/// A NaN `lambda` yields NaN rather than a spurious zero.
#[inline]
pub fn soft_threshold(x: f64, lambda: f64) -> f64 {
    if x > lambda {
        x - lambda
    } else if x < -lambda {
        x + lambda
    } else if lambda.is_nan() {
        f64::NAN
    } else {
        0.0
    }
}
