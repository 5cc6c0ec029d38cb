/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Backtracking search that isolates one fusion event per outer iteration.
//!
//! Each outer iteration proposes a gamma. A trial ADMM step is run at that
//! value and the new fusion counts are compared against the counts from
//! before the iteration:
//!
//! | Observation | Verdict |
//! |-------------|---------|
//! | no change, first trial | accept (nothing happened, nothing skipped) |
//! | more than one new fusion in either graph | bisect down |
//! | no change, later trial | bisect up |
//! | otherwise | accept |
//!
//! The bracket starts as `[gamma_old, gamma]` (last retained value, current
//! proposal). After `max_trials` trials the last one is accepted regardless.
//!
//! Row and column counts are checked separately: two simultaneous fusions in
//! different graphs are fine, two in the same graph are not.

use crate::fusion::FusionCounts;

/// Search interval for the regularization value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    /// Largest value known to fuse too little.
    pub lower: f64,
    /// Smallest value known to fuse too much.
    pub upper: f64,
}

impl Bracket {
    /// Midpoint of the interval.
    #[inline]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }
}

/// Outcome of judging one trial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    /// Keep the trial.
    Accept,
    /// Trial cap reached; keep the trial as is.
    Exhausted,
    /// Too many fusions: retry at the contained lower value.
    BisectDown(f64),
    /// No fusion: retry at the contained higher value.
    BisectUp(f64),
}

impl Verdict {
    /// `true` for both accepting verdicts.
    pub fn is_final(&self) -> bool {
        matches!(self, Verdict::Accept | Verdict::Exhausted)
    }
}

/// Per-outer-iteration bisection state.
#[derive(Clone, Debug)]
pub struct Backtracker {
    bracket: Bracket,
    baseline: FusionCounts,
    trials: usize,
    max_trials: usize,
}

impl Backtracker {
    /// Start a search over `[gamma_old, gamma]` with fusion counts `baseline`
    /// from before the iteration.
    pub fn new(gamma_old: f64, gamma: f64, baseline: FusionCounts, max_trials: usize) -> Self {
        Self {
            bracket: Bracket {
                lower: gamma_old,
                upper: gamma,
            },
            baseline,
            trials: 0,
            max_trials: max_trials.max(1),
        }
    }

    /// Judge the trial just run at `gamma` which produced `observed`.
    pub fn judge(&mut self, gamma: f64, observed: FusionCounts) -> Verdict {
        self.trials += 1;

        let unchanged = observed == self.baseline;
        let too_many = observed.rows > self.baseline.rows + 1
            || observed.cols > self.baseline.cols + 1;

        if unchanged && self.trials == 1 {
            return Verdict::Accept;
        }
        if !too_many && !unchanged {
            return Verdict::Accept;
        }
        if self.trials >= self.max_trials {
            return Verdict::Exhausted;
        }

        if too_many {
            // On the first trial gamma is already the upper bound.
            self.bracket.upper = gamma;
            Verdict::BisectDown(self.bracket.midpoint())
        } else {
            self.bracket.lower = gamma;
            Verdict::BisectUp(self.bracket.midpoint())
        }
    }

    /// Current search interval.
    pub fn bracket(&self) -> Bracket {
        self.bracket
    }

    /// Trials judged so far.
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Fusion counts the search compares against.
    pub fn baseline(&self) -> FusionCounts {
        self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(rows: usize, cols: usize) -> FusionCounts {
        FusionCounts { rows, cols }
    }

    #[test]
    fn first_trial_without_fusion_is_accepted() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(3, 1), 15);
        assert_eq!(bt.judge(2.0, counts(3, 1)), Verdict::Accept);
        assert_eq!(bt.trials(), 1);
    }

    #[test]
    fn one_new_fusion_per_graph_is_accepted() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 15);
        assert_eq!(bt.judge(2.0, counts(1, 1)), Verdict::Accept);

        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 15);
        assert_eq!(bt.judge(2.0, counts(0, 1)), Verdict::Accept);
    }

    #[test]
    fn two_row_fusions_bisect_down_to_midpoint() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 15);
        assert_eq!(bt.judge(2.0, counts(2, 0)), Verdict::BisectDown(1.5));
        assert_eq!(bt.bracket(), Bracket { lower: 1.0, upper: 2.0 });

        // Still too many at 1.5: upper narrows to 1.5.
        assert_eq!(bt.judge(1.5, counts(0, 3)), Verdict::BisectDown(1.25));
        assert_eq!(bt.bracket(), Bracket { lower: 1.0, upper: 1.5 });
    }

    #[test]
    fn later_trial_without_fusion_bisects_up() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 15);
        assert_eq!(bt.judge(2.0, counts(2, 0)), Verdict::BisectDown(1.5));
        assert_eq!(bt.judge(1.5, counts(0, 0)), Verdict::BisectUp(1.75));
        assert_eq!(bt.bracket(), Bracket { lower: 1.5, upper: 2.0 });
        assert_eq!(bt.judge(1.75, counts(1, 0)), Verdict::Accept);
    }

    #[test]
    fn trial_cap_forces_acceptance() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 3);
        let mut gamma = 2.0;
        let mut verdicts = alloc::vec::Vec::new();
        loop {
            let v = bt.judge(gamma, counts(5, 0));
            verdicts.push(v);
            match v {
                Verdict::BisectDown(next) | Verdict::BisectUp(next) => gamma = next,
                _ => break,
            }
        }
        assert_eq!(verdicts.len(), 3);
        assert_eq!(verdicts[2], Verdict::Exhausted);
        assert!(verdicts[2].is_final());
    }

    #[test]
    fn decreasing_count_is_accepted() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(2, 2), 15);
        assert_eq!(bt.judge(2.0, counts(1, 2)), Verdict::Accept);
    }

    #[test]
    fn single_trial_cap_accepts_anything() {
        let mut bt = Backtracker::new(1.0, 2.0, counts(0, 0), 1);
        assert_eq!(bt.judge(2.0, counts(4, 4)), Verdict::Exhausted);
    }
}
