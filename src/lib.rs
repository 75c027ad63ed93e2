#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Maximum-likelihood fitting of distribution parameters with a bounded,
//! derivative-free global search. Where closed-form or gradient-based MLE
//! breaks down — multimodal likelihoods, integer-valued shape parameters,
//! bounded or discontinuous supports — `distfit` minimizes a penalized
//! negative log-likelihood over the intersection of the distribution's
//! natural domain, user bounds, and (where required) the integer lattice.
//!
//! # Getting Started
//!
//! Fit the scale of an exponential distribution with the location pinned:
//!
//! ```
//! use distfit::prelude::*;
//!
//! let data = [0.31, 0.17, 1.52, 0.84, 2.07, 0.45, 0.66, 1.18];
//! let result = Fit::new(&Exponential, &data)
//!     .bounds(Bounds::named([("loc", (0.0, 0.0)), ("scale", (0.01, 10.0))]))
//!     .optimizer(DifferentialEvolution::with_seed(0))
//!     .run()
//!     .unwrap();
//!
//! assert!(result.success);
//! assert!((result.params[1] - 0.9).abs() < 0.5); // scale ≈ sample mean
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Distribution`] | Contract a distribution family implements: shape domains, continuous/discrete tag, standardized log density/mass, support, optional guess hook. |
//! | [`Fit`] | Builder for one fit call: bounds, guess, optimizer, conventions. |
//! | [`Bounds`] / [`Guess`] | User overrides, as an ordered sequence or a name→value mapping. |
//! | [`Optimizer`](optimizer::Optimizer) | Pluggable global search strategy over the free, bounded parameters. |
//! | [`FitResult`] | Immutable outcome: full parameter vector, NNLF, success flag, message, warnings. |
//!
//! # How a fit proceeds
//!
//! 1. **Bound negotiation** — per parameter, intersect the natural domain
//!    with the user interval and, for integer-constrained parameters, with
//!    the integer lattice. Degenerate intervals fix a parameter.
//! 2. **Guess synthesis** — missing guesses are defaulted from the family's
//!    guess hook or data moments; out-of-bound or fractional user guesses
//!    are repaired (clipped/rounded) with warnings.
//! 3. **Objective construction** — a penalized negative log-likelihood that
//!    stays finite outside the support, growing with the squared distance
//!    from the support boundary.
//! 4. **Global search** — differential evolution by default; any
//!    [`Optimizer`](optimizer::Optimizer) may be substituted.
//! 5. **Polish and validation** — a bounded pattern search tightens the
//!    continuous coordinates, then success is decided: convergence, no
//!    support violation, exact integers where required.
//!
//! Optimization failures are never raised: they are encoded in
//! [`FitResult::success`] and [`FitResult::message`], so batch pipelines
//! need no per-call error handling for numerically hard cases.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public result types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key fit stages | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod bounds;
mod diagnostics;
mod distribution;
mod error;
pub mod families;
mod fit;
mod guess;
mod objective;
pub mod optimizer;

pub use bounds::Bounds;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use distribution::{Distribution, Domain, Kind, ShapeInfo};
pub use error::{Error, Result};
pub use fit::{Fit, FitResult, fit};
pub use guess::Guess;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use distfit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::Bounds;
    pub use crate::diagnostics::{Diagnostic, DiagnosticKind};
    pub use crate::distribution::{Distribution, Domain, Kind, ShapeInfo};
    pub use crate::error::{Error, Result};
    pub use crate::families::{Binomial, Exponential, NegativeBinomial, Normal, Poisson, Uniform};
    pub use crate::fit::{Fit, FitResult, fit};
    pub use crate::guess::Guess;
    pub use crate::optimizer::{
        DifferentialEvolution, DifferentialEvolutionBuilder, MutationStrategy, Optimizer, Outcome,
        SearchBound,
    };
}
