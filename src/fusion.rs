/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Fusion detection on split-variable blocks.
//!
//! An edge is fused when its block in the split variable is exactly zero:
//! squared norm `== 0.0`, no tolerance. The shrinkage step writes literal
//! zeros, so a tolerance would only admit blocks that are still shrinking.

use alloc::vec::Vec;

use nalgebra::DMatrix;

/// Per-edge fusion indicators for one graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FusionPattern {
    fused: Vec<bool>,
    count: usize,
}

impl FusionPattern {
    /// Pattern with `edges` edges, none fused.
    pub fn none(edges: usize) -> Self {
        Self {
            fused: alloc::vec![false; edges],
            count: 0,
        }
    }

    /// Inspect every row block of `split` and mark exact zeros.
    pub fn detect(split: &DMatrix<f64>) -> Self {
        let fused: Vec<bool> = split.row_iter().map(|b| b.norm_squared() == 0.0).collect();
        let count = fused.iter().filter(|&&f| f).count();
        Self { fused, count }
    }

    /// Number of fused edges.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of edges tracked.
    pub fn len(&self) -> usize {
        self.fused.len()
    }

    /// `true` when the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.fused.is_empty()
    }

    /// Whether edge `e` is fused. Out-of-range edges read as unfused.
    pub fn is_fused(&self, e: usize) -> bool {
        self.fused.get(e).copied().unwrap_or(false)
    }

    /// `true` once every edge is fused (vacuously true with no edges).
    pub fn all_fused(&self) -> bool {
        self.count == self.fused.len()
    }

    /// Indicator per edge.
    pub fn as_slice(&self) -> &[bool] {
        &self.fused
    }

    /// `true` if every edge fused here is also fused in `later`.
    pub fn is_subset_of(&self, later: &FusionPattern) -> bool {
        self.fused.len() == later.fused.len()
            && self.fused.iter().zip(&later.fused).all(|(&a, &b)| !a || b)
    }
}

/// Fused-edge counts for both graphs after one trial.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FusionCounts {
    /// Fused row edges.
    pub rows: usize,
    /// Fused column edges.
    pub cols: usize,
}

impl FusionCounts {
    /// Counts read off a pair of patterns.
    pub fn of(rows: &FusionPattern, cols: &FusionPattern) -> Self {
        Self {
            rows: rows.count(),
            cols: cols.count(),
        }
    }

    /// `true` if any edge in either graph is fused.
    pub fn any(&self) -> bool {
        self.rows > 0 || self.cols > 0
    }
}
