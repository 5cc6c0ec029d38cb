/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Growth schedule for the regularization value between outer iterations.
//!
//! Gamma stays at its initial value for `burn_in` outer iterations, then is
//! multiplied by `t` after every iteration. `t` starts coarse (`t_init`) and
//! drops to the fine `t_switch` the first time any fusion is observed. The
//! switch is one-way. Gamma saturates at the largest finite value reachable
//! by the multiplier.

/// Step-multiplier state for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSchedule {
    t: f64,
    t_switch: f64,
    burn_in: usize,
    switched: bool,
}

impl StepSchedule {
    /// Schedule starting at `t_init`.
    pub fn new(t_init: f64, t_switch: f64, burn_in: usize) -> Self {
        Self {
            t: t_init,
            t_switch,
            burn_in,
            switched: false,
        }
    }

    /// Record the fused-edge total after an accepted step.
    pub fn observe(&mut self, fused_edges: usize) {
        if fused_edges > 0 {
            self.t = self.t_switch;
            self.switched = true;
        }
    }

    /// Proposal for the next outer iteration, given the number of outer
    /// iterations completed so far.
    ///
    /// Gamma stops growing once the next value would overflow.
    pub fn advance(&self, gamma: f64, completed: usize) -> f64 {
        if completed < self.burn_in {
            return gamma;
        }
        let next = gamma * self.t;
        if next.is_finite() {
            next
        } else {
            gamma
        }
    }

    /// Multiplier currently in force.
    pub fn multiplier(&self) -> f64 {
        self.t
    }

    /// `true` once the fine multiplier has been adopted.
    pub fn switched(&self) -> bool {
        self.switched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_gamma_during_burn_in() {
        let s = StepSchedule::new(1.1, 1.01, 3);
        assert_eq!(s.advance(2.0, 1), 2.0);
        assert_eq!(s.advance(2.0, 2), 2.0);
        assert!((s.advance(2.0, 3) - 2.2).abs() < 1e-12);
    }

    #[test]
    fn growth_stops_before_overflow() {
        let s = StepSchedule::new(1.1, 1.01, 0);
        assert_eq!(s.advance(f64::MAX, 5), f64::MAX);
        let big = f64::MAX / 1.05;
        assert_eq!(s.advance(big, 5), big);
    }

    #[test]
    fn switch_is_sticky() {
        let mut s = StepSchedule::new(1.1, 1.01, 0);
        s.observe(0);
        assert_eq!(s.multiplier(), 1.1);
        assert!(!s.switched());

        s.observe(2);
        assert_eq!(s.multiplier(), 1.01);

        // Counts dropping back to zero do not restore the coarse step.
        s.observe(0);
        assert_eq!(s.multiplier(), 1.01);
        assert!(s.switched());
    }
}
