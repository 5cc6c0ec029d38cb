/*
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

//! Path driver: the outer loop of the fusion-isolating path algorithm.
//!
//! Each outer iteration:
//!
//! 1. Snapshot the current iterate and fusion counts as the baseline.
//! 2. Run trial ADMM steps from that baseline, bisecting gamma within
//!    `[gamma_old, gamma]` until the [`Backtracker`] accepts a trial.
//! 3. Adopt the accepted trial; switch to the fine multiplier once anything
//!    has fused.
//! 4. Retain the point if the fusion counts changed or the iteration index is
//!    a multiple of `keep`; a retained point also becomes the new `gamma_old`.
//! 5. Grow gamma for the next proposal once burn-in has elapsed.
//!
//! The loop stops when every edge of both graphs is fused or after
//! `max_iter` iterations. Running out of iterations is reported on the
//! returned path, not as an error.

use crate::admm::{AdmmState, ConsensusAdmm};
use crate::backtrack::{Backtracker, Verdict};
use crate::config::CbassConfig;
use crate::diagnostics::{Diagnostics, Interrupt, LogDiagnostics, Uninterruptible};
use crate::error::CbassError;
use crate::fusion::{FusionCounts, FusionPattern};
use crate::problem::BiclusterProblem;
use crate::prox::{BlockProx, Shrinkage};
use crate::schedule::StepSchedule;
use crate::store::{CbassPath, PathPoint, PathStore, Termination};

/// Compute the full path with the default shrinkage, `log` diagnostics and
/// no cancellation.
pub fn cbass_viz(problem: &BiclusterProblem, config: &CbassConfig) -> Result<CbassPath, CbassError> {
    PathDriver::new(problem, config.clone())?.run(&mut LogDiagnostics, &mut Uninterruptible)
}

/// Owns everything fixed for one run: the problem, its parameters and the
/// factored step engine.
#[derive(Clone, Debug)]
pub struct PathDriver<'p, P = Shrinkage> {
    problem: &'p BiclusterProblem,
    config: CbassConfig,
    engine: ConsensusAdmm<P>,
}

impl<'p> PathDriver<'p, Shrinkage> {
    /// Validate `config` and factor both primal systems, using the shrinkage
    /// mode named in the configuration.
    pub fn new(problem: &'p BiclusterProblem, config: CbassConfig) -> Result<Self, CbassError> {
        let prox = Shrinkage::new(config.shrinkage);
        Self::with_prox(problem, config, prox)
    }
}

impl<'p, P: BlockProx> PathDriver<'p, P> {
    /// Like [`PathDriver::new`] with a caller-supplied shrinkage operator.
    /// `config.shrinkage` is ignored.
    pub fn with_prox(
        problem: &'p BiclusterProblem,
        config: CbassConfig,
        prox: P,
    ) -> Result<Self, CbassError> {
        config.validate()?;
        let engine = ConsensusAdmm::new(problem, config.rho, prox)?;
        Ok(Self {
            problem,
            config,
            engine,
        })
    }

    /// Parameters of this run.
    pub fn config(&self) -> &CbassConfig {
        &self.config
    }

    /// Follow the path from `gamma_init` until everything is fused or the
    /// iteration budget is spent.
    pub fn run<D, I>(&self, diag: &mut D, interrupt: &mut I) -> Result<CbassPath, CbassError>
    where
        D: Diagnostics,
        I: Interrupt,
    {
        let cfg = &self.config;
        let problem = self.problem;

        let mut state = AdmmState::initial(problem);
        let mut row_fusions = FusionPattern::none(problem.row_edges());
        let mut col_fusions = FusionPattern::none(problem.col_edges());

        let mut store =
            PathStore::with_capacity(PathStore::initial_capacity(problem.n_rows(), problem.n_cols()));
        store.push(PathPoint::capture(
            &state,
            problem.gamma_init(),
            &row_fusions,
            &col_fusions,
        ));

        let mut gamma = problem.gamma_init();
        let mut gamma_old = gamma;
        let mut schedule = StepSchedule::new(cfg.t_init, cfg.t_switch, cfg.burn_in);
        let mut iter = 0usize;

        while !(row_fusions.all_fused() && col_fusions.all_fused()) && iter < cfg.max_iter {
            diag.info(format_args!("Beginning iteration k = {}", iter + 1));
            diag.debug(format_args!("gamma = {}", gamma));

            let baseline = FusionCounts::of(&row_fusions, &col_fusions);
            let mut search = Backtracker::new(gamma_old, gamma, baseline, cfg.max_trials);

            let (next, rows_new, cols_new) = loop {
                let trial = self.engine.step(&state, gamma);
                let rows = FusionPattern::detect(&trial.v_row);
                let cols = FusionPattern::detect(&trial.v_col);
                diag.debug(format_args!(
                    "fusions identified: {} row, {} column",
                    rows.count(),
                    cols.count()
                ));

                match search.judge(gamma, FusionCounts::of(&rows, &cols)) {
                    Verdict::Accept => {
                        diag.debug(format_args!("Good iteration - continuing to next step."));
                        break (trial, rows, cols);
                    }
                    Verdict::Exhausted => {
                        diag.debug(format_args!(
                            "Trial cap of {} reached - accepting gamma = {}",
                            cfg.max_trials, gamma
                        ));
                        break (trial, rows, cols);
                    }
                    Verdict::BisectDown(lower) => {
                        diag.debug(format_args!("Too many fusions -- backtracking."));
                        gamma = lower;
                    }
                    Verdict::BisectUp(higher) => {
                        diag.debug(format_args!("Fusion not isolated -- moving forward."));
                        gamma = higher;
                    }
                }
            };

            state = next;
            let observed = FusionCounts::of(&rows_new, &cols_new);
            row_fusions = rows_new;
            col_fusions = cols_new;

            schedule.observe(observed.rows + observed.cols);

            if observed != baseline || iter % cfg.keep == 0 {
                if store.is_full() {
                    let (from, to) = store.grow();
                    diag.info(format_args!(
                        "Resizing storage from {} to {} iterations.",
                        from, to
                    ));
                }
                store.push(PathPoint::capture(&state, gamma, &row_fusions, &col_fusions));
                gamma_old = gamma;
            }

            iter += 1;
            gamma = schedule.advance(gamma, iter);

            if iter % cfg.interrupt_rate == 0 && interrupt.should_abort() {
                return Err(CbassError::Interrupted { iterations: iter });
            }
        }

        let termination = if row_fusions.all_fused() && col_fusions.all_fused() {
            Termination::AllFused
        } else {
            diag.warning(format_args!(
                "CBASS-VIZ ended early -- `max_iter` ({}) reached",
                cfg.max_iter
            ));
            Termination::MaxIterReached
        };

        Ok(store.finish(termination, iter))
    }
}
