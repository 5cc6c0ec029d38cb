//! Run parameters for the regularization path.
//!
//! Defaults match the Python binding's keyword defaults: `rho = 1`, `max_iter = 10000`,
//! `burn_in = 50`, `ti = 15`, `t_switch = 1.01`, `keep = 10`, block-norm
//! shrinkage.

use crate::error::CbassError;
use crate::prox::ShrinkageMode;

/// Coarse step multiplier used until the first fusion is observed.
pub const DEFAULT_T_INIT: f64 = 1.1;

/// Outer iterations between cancellation checks.
pub const DEFAULT_INTERRUPT_RATE: usize = 50;

/// Parameters controlling one path computation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CbassConfig {
    /// ADMM coupling constant. Fixes both cached factorizations. Default 1.0.
    pub rho: f64,
    /// Outer-iteration budget. Default 10000.
    pub max_iter: usize,
    /// Outer iterations run at `gamma_init` before gamma starts to grow. Default 50.
    pub burn_in: usize,
    /// Trial cap (`ti`) for the inner backtracking search. Default 15.
    pub max_trials: usize,
    /// Fine step multiplier adopted once any fusion has been seen. Default 1.01.
    pub t_switch: f64,
    /// Coarse step multiplier in force before the first fusion. Default 1.1.
    pub t_init: f64,
    /// Retention stride: every `keep`-th outer iteration is stored even
    /// without a fusion event. Default 10.
    pub keep: usize,
    /// Shrinkage applied to split-variable blocks. Default block-norm.
    pub shrinkage: ShrinkageMode,
    /// Outer iterations between cancellation checks. Default 50.
    pub interrupt_rate: usize,
}

impl Default for CbassConfig {
    fn default() -> Self {
        Self {
            rho: 1.0,
            max_iter: 10_000,
            burn_in: 50,
            max_trials: 15,
            t_switch: 1.01,
            t_init: DEFAULT_T_INIT,
            keep: 10,
            shrinkage: ShrinkageMode::BlockNorm,
            interrupt_rate: DEFAULT_INTERRUPT_RATE,
        }
    }
}

impl CbassConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ADMM coupling constant.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Set the outer-iteration budget.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the burn-in length.
    pub fn with_burn_in(mut self, burn_in: usize) -> Self {
        self.burn_in = burn_in;
        self
    }

    /// Set the inner trial cap (`ti`).
    pub fn with_max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = max_trials;
        self
    }

    /// Set the fine step multiplier.
    pub fn with_t_switch(mut self, t_switch: f64) -> Self {
        self.t_switch = t_switch;
        self
    }

    /// Set the coarse step multiplier.
    pub fn with_t_init(mut self, t_init: f64) -> Self {
        self.t_init = t_init;
        self
    }

    /// Set the retention stride.
    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep;
        self
    }

    /// Select the shrinkage mode.
    pub fn with_shrinkage(mut self, shrinkage: ShrinkageMode) -> Self {
        self.shrinkage = shrinkage;
        self
    }

    /// Set the cancellation cadence.
    pub fn with_interrupt_rate(mut self, interrupt_rate: usize) -> Self {
        self.interrupt_rate = interrupt_rate;
        self
    }

    /// Check every parameter against its admissible range.
    pub fn validate(&self) -> Result<(), CbassError> {
        if !(self.rho.is_finite() && self.rho > 0.0) {
            return Err(CbassError::InvalidParameter {
                name: "rho",
                reason: "must be finite and positive",
            });
        }
        if self.max_trials == 0 {
            return Err(CbassError::InvalidParameter {
                name: "max_trials",
                reason: "must allow at least one trial",
            });
        }
        if !(self.t_switch.is_finite() && self.t_switch >= 1.0) {
            return Err(CbassError::InvalidParameter {
                name: "t_switch",
                reason: "must be finite and at least 1",
            });
        }
        if !(self.t_init.is_finite() && self.t_init >= 1.0) {
            return Err(CbassError::InvalidParameter {
                name: "t_init",
                reason: "must be finite and at least 1",
            });
        }
        if self.keep == 0 {
            return Err(CbassError::InvalidParameter {
                name: "keep",
                reason: "must be at least 1",
            });
        }
        if self.interrupt_rate == 0 {
            return Err(CbassError::InvalidParameter {
                name: "interrupt_rate",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
