//! Collaborators injected into the path driver: leveled diagnostics and
//! cooperative cancellation.
//!
//! The driver never logs through global state directly. It reports through a
//! [`Diagnostics`] value supplied by the caller; [`LogDiagnostics`] forwards
//! to the `log` facade, [`SilentDiagnostics`] drops everything.
//!
//! Cancellation is polled only between outer iterations, every
//! `interrupt_rate` iterations, never inside the backtracking search.

use core::fmt;

/// `log` target used by [`LogDiagnostics`].
pub const LOG_TARGET: &str = "cbass";

/// Leveled sink for driver messages.
pub trait Diagnostics {
    /// Progress messages (iteration starts, storage growth).
    fn info(&mut self, args: fmt::Arguments<'_>);
    /// Per-trial detail (gamma values, fusion counts, bisection decisions).
    fn debug(&mut self, args: fmt::Arguments<'_>);
    /// Non-fatal anomalies (early termination).
    fn warning(&mut self, args: fmt::Arguments<'_>);
}

/// Forwards to `log::info!`, `log::debug!` and `log::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&mut self, args: fmt::Arguments<'_>) {
        log::info!(target: LOG_TARGET, "{}", args);
    }

    fn debug(&mut self, args: fmt::Arguments<'_>) {
        log::debug!(target: LOG_TARGET, "{}", args);
    }

    fn warning(&mut self, args: fmt::Arguments<'_>) {
        log::warn!(target: LOG_TARGET, "{}", args);
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn info(&mut self, _args: fmt::Arguments<'_>) {}
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}
    fn warning(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Cancellation hook polled between outer iterations.
///
/// Any `FnMut() -> bool` closure is an `Interrupt`; returning `true` aborts
/// the run with [`crate::error::CbassError::Interrupted`].
pub trait Interrupt {
    /// `true` if the run should stop now.
    fn should_abort(&mut self) -> bool;
}

/// Never asks to stop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uninterruptible;

impl Interrupt for Uninterruptible {
    fn should_abort(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> Interrupt for F {
    fn should_abort(&mut self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_interrupts() {
        let mut polls = 0;
        let mut hook = || {
            polls += 1;
            polls >= 2
        };
        assert!(!hook.should_abort());
        assert!(hook.should_abort());
    }

    #[test]
    fn uninterruptible_never_aborts() {
        let mut never = Uninterruptible;
        assert!(!never.should_abort());
    }

    #[test]
    fn silent_diagnostics_accepts_all_levels() {
        let mut d = SilentDiagnostics;
        d.info(format_args!("k = {}", 1));
        d.debug(format_args!("gamma = {}", 0.5));
        d.warning(format_args!("stopped early"));
    }
}
