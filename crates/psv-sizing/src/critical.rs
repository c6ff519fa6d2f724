//! Critical pressure ratio for two-phase (omega method) relief.
//!
//! `eta_c` is the root of
//! `f(η) = η² + (ω²−1)·η^(2ω) + 2ω²·ln(η) − 2ω − 2ω²`,
//! found by Newton-Raphson. A failed solve never aborts a sizing run: the
//! solver reports how it ended and hands back a usable ratio.

use serde::Serialize;

pub const INITIAL_GUESS: f64 = 0.6;
pub const MAX_ITERATIONS: usize = 50;
pub const STEP_TOLERANCE: f64 = 1e-5;

/// Ratio returned when the iteration leaves the real domain.
pub const FALLBACK_ETA: f64 = INITIAL_GUESS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveOutcome {
    /// `ω ≤ 0`: no iteration, `eta_c = 1`.
    Degenerate,
    Converged,
    /// Iteration budget spent; last iterate returned.
    IterationLimit,
    /// Derivative vanished or was not finite; last iterate returned.
    FlatDerivative,
    /// An iterate left the domain `η > 0`; fallback returned.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalRatio {
    pub eta_c: f64,
    pub iterations: usize,
    pub outcome: SolveOutcome,
}

fn residual(eta: f64, omega: f64) -> f64 {
    let w2 = omega * omega;
    eta * eta + (w2 - 1.0) * eta.powf(2.0 * omega) + 2.0 * w2 * eta.ln() - 2.0 * omega - 2.0 * w2
}

fn derivative(eta: f64, omega: f64) -> f64 {
    let w2 = omega * omega;
    2.0 * eta + (w2 - 1.0) * (2.0 * omega) * eta.powf(2.0 * omega - 1.0) + 2.0 * w2 / eta
}

/// Solve for the critical pressure ratio, reporting how the iteration ended.
pub fn solve_eta_c(omega: f64) -> CriticalRatio {
    if omega.is_nan() || omega <= 0.0 {
        return CriticalRatio {
            eta_c: 1.0,
            iterations: 0,
            outcome: SolveOutcome::Degenerate,
        };
    }

    let mut eta = INITIAL_GUESS;
    for iteration in 1..=MAX_ITERATIONS {
        let f = residual(eta, omega);
        let df = derivative(eta, omega);
        if !f.is_finite() {
            return fallback(omega, iteration);
        }
        if df == 0.0 || !df.is_finite() {
            tracing::warn!(omega, eta, iteration, "eta_c derivative vanished, keeping last iterate");
            return CriticalRatio {
                eta_c: eta,
                iterations: iteration,
                outcome: SolveOutcome::FlatDerivative,
            };
        }

        let next = eta - f / df;
        if !next.is_finite() || next <= 0.0 {
            return fallback(omega, iteration);
        }
        if (next - eta).abs() < STEP_TOLERANCE {
            tracing::debug!(omega, eta_c = next, iteration, "eta_c converged");
            return CriticalRatio {
                eta_c: next,
                iterations: iteration,
                outcome: SolveOutcome::Converged,
            };
        }
        eta = next;
    }

    tracing::warn!(omega, eta, "eta_c did not converge in {MAX_ITERATIONS} iterations");
    CriticalRatio {
        eta_c: eta,
        iterations: MAX_ITERATIONS,
        outcome: SolveOutcome::IterationLimit,
    }
}

fn fallback(omega: f64, iteration: usize) -> CriticalRatio {
    tracing::warn!(omega, iteration, "eta_c iterate left the domain, using {FALLBACK_ETA}");
    CriticalRatio {
        eta_c: FALLBACK_ETA,
        iterations: iteration,
        outcome: SolveOutcome::Fallback,
    }
}

/// Critical pressure ratio for the given omega.
pub fn eta_c(omega: f64) -> f64 {
    solve_eta_c(omega).eta_c
}
