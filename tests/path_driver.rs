//! Integration tests for the path driver.
//!
//! Run with: `cargo test`
//!
//! Problems are tiny (at most 5 × 4) with chain graphs. Scenarios that need
//! everything to fuse at once use very large edge weights; scenarios that
//! need nothing to fuse use zero weights.

use core::cell::Cell;
use core::fmt;

use cbass_core::{
    cbass_viz, difference_operator, BiclusterProblem, BlockProx, CbassConfig, CbassError,
    Diagnostics, FusionPattern, PathDriver, ShrinkageMode, SilentDiagnostics, Termination,
    Uninterruptible,
};
use nalgebra::{DMatrix, DVector};

// ─── helpers ─────────────────────────────────────────────────────────────────

fn chain(nodes: usize) -> Vec<(usize, usize)> {
    (0..nodes - 1).map(|i| (i, i + 1)).collect()
}

fn chain_problem(x: DMatrix<f64>, weight: f64, gamma_init: f64) -> BiclusterProblem {
    let (n, p) = x.shape();
    BiclusterProblem::new(
        x,
        difference_operator(&chain(n), n).unwrap(),
        difference_operator(&chain(p), p).unwrap().transpose(),
        DVector::from_element(n - 1, weight),
        DVector::from_element(p - 1, weight),
        gamma_init,
    )
    .unwrap()
}

fn two_by_two(weight: f64) -> BiclusterProblem {
    chain_problem(
        DMatrix::from_row_slice(2, 2, &[1.0, -0.5, 2.0, 0.75]),
        weight,
        1.0,
    )
}

fn five_by_four() -> DMatrix<f64> {
    DMatrix::from_row_slice(
        5,
        4,
        &[
            1.2, 0.8, -1.1, -0.9, //
            1.0, 1.1, -0.7, -1.3, //
            0.9, 1.3, -1.0, -1.0, //
            -1.1, -0.8, 1.2, 0.7, //
            -0.9, -1.2, 0.9, 1.1,
        ],
    )
}

fn run(problem: &BiclusterProblem, config: CbassConfig) -> cbass_core::CbassPath {
    PathDriver::new(problem, config)
        .unwrap()
        .run(&mut SilentDiagnostics, &mut Uninterruptible)
        .unwrap()
}

/// Keeps every message, tagged by level.
#[derive(Default)]
struct Recorder {
    info: Vec<String>,
    debug: Vec<String>,
    warning: Vec<String>,
}

impl Diagnostics for Recorder {
    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.info.push(args.to_string());
    }
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.debug.push(args.to_string());
    }
    fn warning(&mut self, args: fmt::Arguments<'_>) {
        self.warning.push(args.to_string());
    }
}

/// Zeroes every block regardless of threshold.
struct ZeroEverything;

impl BlockProx for ZeroEverything {
    fn prox(&self, input: &DMatrix<f64>, _threshold: f64, _weights: &DVector<f64>) -> DMatrix<f64> {
        DMatrix::zeros(input.nrows(), input.ncols())
    }
}

// ─── minimal scenarios ───────────────────────────────────────────────────────

#[test]
fn huge_weights_fuse_everything_in_one_step() {
    let problem = two_by_two(1e6);
    let path = run(&problem, CbassConfig::default());

    assert_eq!(path.len(), 2);
    assert_eq!(path.iterations, 1);
    assert_eq!(path.gamma_path[1], problem.gamma_init());
    assert_eq!(path.termination, Termination::AllFused);
    assert!(!path.early_terminated());
    assert!(path.row_fusions[1].all_fused());
    assert!(path.col_fusions[1].all_fused());
    assert!(path.v_row_path[1].iter().all(|&v| v == 0.0));
    assert!(path.v_col_path[1].iter().all(|&v| v == 0.0));
}

#[test]
fn zero_iteration_budget_returns_only_the_start() {
    let problem = two_by_two(1.0);
    let path = run(&problem, CbassConfig::new().with_max_iter(0));

    assert_eq!(path.len(), 1);
    assert_eq!(path.iterations, 0);
    assert!(path.early_terminated());
    assert_eq!(path.u_path[0], *problem.data());
}

#[test]
fn zero_weights_never_fuse() {
    let problem = chain_problem(five_by_four(), 0.0, 0.5);
    let path = run(&problem, CbassConfig::new().with_max_iter(30));

    // Retained on iterations 0, 10 and 20 only.
    assert_eq!(path.len(), 4);
    assert_eq!(path.termination, Termination::MaxIterReached);
    for k in 0..path.len() {
        assert_eq!(path.row_fusions[k].count(), 0);
        assert_eq!(path.col_fusions[k].count(), 0);
    }
}

#[test]
fn zero_weights_never_fuse_over_the_default_budget() {
    // Gamma grows by 1.1 for the whole run and would overflow without the cap.
    let problem = chain_problem(
        DMatrix::from_row_slice(2, 2, &[1.0, -0.5, 2.0, 0.75]),
        0.0,
        0.5,
    );
    for mode in [ShrinkageMode::Elementwise, ShrinkageMode::BlockNorm] {
        let path = run(&problem, CbassConfig::new().with_shrinkage(mode));

        assert_eq!(path.termination, Termination::MaxIterReached, "{mode:?}");
        assert_eq!(path.iterations, 10_000);
        assert_eq!(path.len(), 1_001);
        assert!(path.gamma_path.iter().all(|g| g.is_finite()), "{mode:?}");
        for k in 0..path.len() {
            assert_eq!(path.row_fusions[k].count(), 0, "{mode:?} point {k}");
            assert_eq!(path.col_fusions[k].count(), 0, "{mode:?} point {k}");
            assert!(path.u_path[k].iter().all(|u| u.is_finite()), "{mode:?} point {k}");
        }
    }
}

#[test]
fn early_termination_is_logged_as_a_warning() {
    let problem = chain_problem(five_by_four(), 0.0, 0.5);
    let mut rec = Recorder::default();
    PathDriver::new(&problem, CbassConfig::new().with_max_iter(3))
        .unwrap()
        .run(&mut rec, &mut Uninterruptible)
        .unwrap();

    assert_eq!(rec.warning.len(), 1);
    assert!(rec.warning[0].contains("ended early"));
    assert_eq!(
        rec.info.iter().filter(|m| m.starts_with("Beginning iteration")).count(),
        3
    );
}

#[test]
fn elementwise_shrinkage_fuses_with_huge_weights() {
    let problem = two_by_two(1e6);
    let path = run(
        &problem,
        CbassConfig::new().with_shrinkage(ShrinkageMode::Elementwise),
    );
    assert_eq!(path.len(), 2);
    assert_eq!(path.termination, Termination::AllFused);
}

// ─── path properties ─────────────────────────────────────────────────────────

#[test]
fn full_path_is_consistent() {
    let problem = chain_problem(five_by_four(), 1.0, 1e-2);
    let max_iter = 5_000;
    let mut rec = Recorder::default();
    let path = PathDriver::new(&problem, CbassConfig::new().with_max_iter(max_iter))
        .unwrap()
        .run(&mut rec, &mut Uninterruptible)
        .unwrap();

    let len = path.len();
    assert!(len >= 1 && len <= max_iter + 1);
    assert_eq!(path.u_path.len(), len);
    assert_eq!(path.v_row_path.len(), len);
    assert_eq!(path.v_col_path.len(), len);
    assert_eq!(path.row_fusions.len(), len);
    assert_eq!(path.col_fusions.len(), len);

    assert_eq!(path.gamma_path[0], problem.gamma_init());
    for w in path.gamma_path.windows(2) {
        assert!(w[1] >= w[0], "gamma decreased: {} -> {}", w[0], w[1]);
    }

    // Indicators agree with the stored split variables after the start.
    for k in 1..len {
        assert_eq!(path.row_fusions[k], FusionPattern::detect(&path.v_row_path[k]));
        assert_eq!(path.col_fusions[k], FusionPattern::detect(&path.v_col_path[k]));
    }

    let last = len - 1;
    let all_fused = path.row_fusions[last].all_fused() && path.col_fusions[last].all_fused();
    assert!(all_fused || path.early_terminated());
    assert_eq!(all_fused, path.termination == Termination::AllFused);

    // Without a forced acceptance, no retained step adds two fusions to one graph.
    if !rec.debug.iter().any(|m| m.starts_with("Trial cap")) {
        for k in 1..len {
            let dr = path.row_fusions[k].count() as isize - path.row_fusions[k - 1].count() as isize;
            let dc = path.col_fusions[k].count() as isize - path.col_fusions[k - 1].count() as isize;
            assert!(dr <= 1 && dc <= 1, "point {k}: +{dr} rows, +{dc} columns");
        }
    }

    // Fused edges stay fused.
    for k in 1..len {
        assert!(path.row_fusions[k - 1].is_subset_of(&path.row_fusions[k]), "rows at {k}");
        assert!(path.col_fusions[k - 1].is_subset_of(&path.col_fusions[k]), "columns at {k}");
    }
}

#[test]
fn fine_multiplier_takes_over_after_first_fusion() {
    let t_init = 1.1;
    let t_switch = 1.05;
    let problem = chain_problem(five_by_four(), 1.0, 1e-2);
    let path = run(
        &problem,
        CbassConfig::new()
            .with_max_iter(3_000)
            .with_keep(1)
            .with_burn_in(0)
            .with_t_switch(t_switch),
    );

    let first = (0..path.len())
        .find(|&k| path.row_fusions[k].count() + path.col_fusions[k].count() > 0)
        .expect("some edge fuses");
    assert!(first + 1 < path.len());

    // Every point is retained, so each gamma is at most the previous one
    // times the multiplier in force; bisection only lowers it.
    let ratio = |k: usize| path.gamma_path[k] / path.gamma_path[k - 1];
    for k in 1..=first {
        assert!(ratio(k) <= t_init * (1.0 + 1e-12), "point {k}: ratio {}", ratio(k));
    }
    for k in first + 1..path.len() {
        assert!(ratio(k) <= t_switch * (1.0 + 1e-12), "point {k}: ratio {}", ratio(k));
    }
    assert!((first + 1..path.len()).any(|k| (ratio(k) - t_switch).abs() < 1e-9));
}

#[test]
fn convenience_entry_point_matches_driver() {
    let problem = chain_problem(five_by_four(), 1.0, 1e-2);
    let config = CbassConfig::new().with_max_iter(200);
    let a = cbass_viz(&problem, &config).unwrap();
    let b = run(&problem, config);
    assert_eq!(a, b);
}

// ─── storage ─────────────────────────────────────────────────────────────────

#[test]
fn storage_doubles_when_full() {
    // 2 × 2 starts with room for 6 points; 11 are retained.
    let problem = two_by_two(0.0);
    let mut rec = Recorder::default();
    let path = PathDriver::new(&problem, CbassConfig::new().with_max_iter(10).with_keep(1))
        .unwrap()
        .run(&mut rec, &mut Uninterruptible)
        .unwrap();

    assert_eq!(path.len(), 11);
    let resizes: Vec<&String> = rec.info.iter().filter(|m| m.starts_with("Resizing")).collect();
    assert_eq!(resizes.len(), 1);
    assert_eq!(resizes[0], "Resizing storage from 6 to 12 iterations.");
}

// ─── backtracking ────────────────────────────────────────────────────────────

#[test]
fn trial_cap_forces_acceptance() {
    let problem = chain_problem(five_by_four(), 1.0, 1e-2);
    let mut rec = Recorder::default();
    let driver =
        PathDriver::with_prox(&problem, CbassConfig::new().with_max_trials(4), ZeroEverything)
            .unwrap();
    let path = driver.run(&mut rec, &mut Uninterruptible).unwrap();

    // Every trial fuses all edges: bisect down three times, then accept.
    assert_eq!(path.len(), 2);
    assert_eq!(path.termination, Termination::AllFused);
    assert_eq!(path.gamma_path[1], problem.gamma_init());
    assert_eq!(
        rec.debug.iter().filter(|m| m.starts_with("fusions identified")).count(),
        4
    );
    assert_eq!(rec.debug.iter().filter(|m| m.starts_with("Trial cap")).count(), 1);
    assert_eq!(
        rec.debug.iter().filter(|m| m.starts_with("Too many fusions")).count(),
        3
    );
}

// ─── cancellation ────────────────────────────────────────────────────────────

#[test]
fn interrupt_is_polled_at_the_configured_rate() {
    let problem = chain_problem(five_by_four(), 0.0, 0.5);
    let polls = Cell::new(0usize);
    let mut hook = || {
        polls.set(polls.get() + 1);
        polls.get() == 3
    };
    let err = PathDriver::new(
        &problem,
        CbassConfig::new().with_max_iter(1_000).with_interrupt_rate(5),
    )
    .unwrap()
    .run(&mut SilentDiagnostics, &mut hook)
    .unwrap_err();

    assert_eq!(err, CbassError::Interrupted { iterations: 15 });
    assert_eq!(polls.get(), 3);
}
