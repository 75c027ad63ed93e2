//! Non-fatal diagnostics accumulated during a fit call.
//!
//! Automatic repairs (clipping, rounding) and ignored overrides never halt a
//! fit; they are recorded here and surfaced on
//! [`FitResult::warnings`](crate::FitResult::warnings). Diagnostics are local
//! to the call — there is no process-wide warning state.

use core::fmt;

/// What kind of non-fatal repair or ignore happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagnosticKind {
    /// A bounds mapping named a parameter the distribution does not have.
    UnrecognizedBound,
    /// A guess mapping named a parameter the distribution does not have.
    UnrecognizedGuess,
    /// A user guess fell outside its bound and was clipped to the nearer edge.
    GuessClipped,
    /// A fractional user guess for an integer-constrained parameter was
    /// rounded to the nearest integer.
    GuessRounded,
}

/// One non-fatal diagnostic: what happened, to which parameter.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    /// The kind of repair or ignore.
    pub kind: DiagnosticKind,
    /// The parameter the diagnostic refers to.
    pub parameter: String,
    /// Human-readable description naming the parameter and the action.
    pub detail: String,
}

impl Diagnostic {
    pub(crate) fn unrecognized_bound(name: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedBound,
            parameter: name.to_string(),
            detail: format!("Bounds provided for unrecognized parameter `{name}` were ignored."),
        }
    }

    pub(crate) fn unrecognized_guess(name: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnrecognizedGuess,
            parameter: name.to_string(),
            detail: format!("A guess provided for unrecognized parameter `{name}` was ignored."),
        }
    }

    pub(crate) fn clipped(name: &str, from: f64, to: f64) -> Self {
        Self {
            kind: DiagnosticKind::GuessClipped,
            parameter: name.to_string(),
            detail: format!("Guess for parameter `{name}` clipped from {from} to {to}."),
        }
    }

    pub(crate) fn rounded(name: &str, from: f64, to: f64) -> Self {
        Self {
            kind: DiagnosticKind::GuessRounded,
            parameter: name.to_string(),
            detail: format!("Guess for parameter `{name}` rounded from {from} to {to}."),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}
