//! The fitting engine: builder, pipeline, and result type.
//!
//! A fit call proceeds through bound negotiation, guess synthesis, objective
//! construction, global search, and an optional polish step. Input problems
//! (bad data, impossible bounds, malformed guesses) are reported as
//! [`Error`]s; *optimization* problems (non-convergence, support violations)
//! never error — they are encoded in [`FitResult::success`] and
//! [`FitResult::message`] so batch pipelines can triage after the fact.

use core::fmt;

use crate::bounds::{self, Bounds, ParamBound};
use crate::diagnostics::Diagnostic;
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::guess::{self, Guess};
use crate::objective::Objective;
use crate::optimizer::{DifferentialEvolution, Optimizer, SearchBound, polish};

/// Relative tolerance for deciding that the penalized and plain NNLF agree
/// at the optimum, i.e. that no observation fell outside the support.
const SUPPORT_RTOL: f64 = 1e-8;

const MSG_SUCCESS: &str = "Optimization terminated successfully.";
const MSG_ALL_FIXED: &str =
    "All parameters were fixed by their bounds; no optimization was performed.";
const MSG_SUPPORT: &str = "Optimization converged to parameter values that are inconsistent \
     with the data; the fitted distribution assigns zero probability to at least one \
     observation. Consider relaxing the bounds.";

/// Fits `dist` to `data` with default settings.
///
/// Shorthand for `Fit::new(dist, data).run()`; see [`Fit`] for the
/// configurable version. Note that most families have at least one shape
/// parameter with an infinite natural domain, which must be bounded through
/// [`Fit::bounds`] for the search to be well-posed.
///
/// # Errors
///
/// Returns an error for invalid data or an ill-posed search space; see
/// [`Error`].
pub fn fit<D: Distribution>(dist: &D, data: &[f64]) -> Result<FitResult> {
    Fit::new(dist, data).run()
}

/// Builder for a single fit call.
///
/// # Examples
///
/// ```
/// use distfit::prelude::*;
///
/// let data = [1.0, 3.0, 2.0, 4.0, 2.0, 3.0, 1.0, 2.0];
/// let result = Fit::new(&Poisson, &data)
///     .bounds(Bounds::named([("mu", (0.0, 20.0)), ("loc", (0.0, 0.0))]))
///     .optimizer(DifferentialEvolution::with_seed(1))
///     .run()
///     .unwrap();
///
/// assert!(result.success);
/// assert!((result.params[0] - 2.25).abs() < 0.05); // MLE of mu = sample mean
/// ```
pub struct Fit<'a, D: Distribution + ?Sized> {
    dist: &'a D,
    data: &'a [f64],
    bounds: Option<Bounds>,
    guess: Option<Guess>,
    optimizer: Option<Box<dyn Optimizer + 'a>>,
    default_loc: f64,
    default_scale: f64,
    polish: bool,
}

impl<'a, D: Distribution> Fit<'a, D> {
    /// Starts a fit of `dist` against `data`.
    #[must_use]
    pub fn new(dist: &'a D, data: &'a [f64]) -> Self {
        Self {
            dist,
            data,
            bounds: None,
            guess: None,
            optimizer: None,
            default_loc: 0.0,
            default_scale: 1.0,
            polish: true,
        }
    }

    /// Sets user bounds; omitted parameters keep their natural domain and
    /// the engine's anchoring conventions.
    #[must_use]
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Sets initial guesses. Out-of-bound or fractional values for
    /// integer-constrained parameters are repaired with a warning; a guess
    /// can also anchor an otherwise unbounded `loc`/`scale`.
    #[must_use]
    pub fn guess(mut self, guess: Guess) -> Self {
        self.guess = Some(guess);
        self
    }

    /// Replaces the default [`DifferentialEvolution`] search strategy.
    #[must_use]
    pub fn optimizer(mut self, optimizer: impl Optimizer + 'a) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    /// Value `loc` is pinned to when neither a bound nor a guess mentions
    /// it. Default: 0.
    #[must_use]
    pub fn default_loc(mut self, loc: f64) -> Self {
        self.default_loc = loc;
        self
    }

    /// Value `scale` is pinned to when neither a bound nor a guess mentions
    /// it. Default: 1.
    #[must_use]
    pub fn default_scale(mut self, scale: f64) -> Self {
        self.default_scale = scale;
        self
    }

    /// Enables or disables the local polish step after the global search.
    /// Default: enabled.
    #[must_use]
    pub fn polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    /// Runs the fit.
    ///
    /// # Errors
    ///
    /// Returns an error when the inputs make the problem ill-posed: empty or
    /// non-finite data, malformed or empty bounds, an unbounded free
    /// parameter, or an invalid guess. Optimization failures do *not* error;
    /// inspect [`FitResult::success`].
    pub fn run(self) -> Result<FitResult> {
        validate_data(self.data)?;
        validate_distribution(self.dist)?;

        let mut warnings: Vec<Diagnostic> = Vec::new();
        let overrides = guess::canonicalize(self.dist, self.guess.as_ref(), &mut warnings)?;
        let user = bounds::canonicalize(self.dist, self.bounds.as_ref(), &mut warnings)?;
        let resolved = bounds::resolve(
            self.dist,
            &user,
            &overrides,
            self.default_loc,
            self.default_scale,
        )?;
        let initial = guess::synthesize(self.dist, &resolved, &overrides, self.data, &mut warnings)?;

        let names: Vec<String> = self
            .dist
            .param_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let objective = Objective::new(self.dist, self.data, &resolved);

        // Degenerate search space: every parameter pinned by its bounds.
        if objective.n_free() == 0 {
            let params = objective.merge(&[]);
            let nnlf = objective.nnlf(&params);
            trace_info!(nnlf, "all parameters fixed; skipping optimization");
            return Ok(FitResult {
                names,
                params,
                nnlf,
                success: true,
                message: MSG_ALL_FIXED.to_string(),
                warnings,
            });
        }

        let search_bounds: Vec<SearchBound> = resolved
            .iter()
            .filter(|b| !b.is_fixed())
            .map(|b| SearchBound {
                low: b.low,
                high: b.high,
                integral: b.integral,
            })
            .collect();
        let initial_free = free_components(&initial, &resolved);
        trace_debug!(
            n_free = search_bounds.len(),
            n_data = self.data.len(),
            "starting global search"
        );

        let default_optimizer;
        let optimizer: &dyn Optimizer = match &self.optimizer {
            Some(opt) => opt.as_ref(),
            None => {
                default_optimizer = DifferentialEvolution::new();
                &default_optimizer
            }
        };

        let penalized = |free: &[f64]| objective.penalized_free(free);
        let outcome = optimizer.optimize(&penalized, &search_bounds, Some(&initial_free));

        let mut best_free = outcome.point.clone();
        let mut best_value = outcome.value;
        if self.polish {
            let polished = polish(&penalized, &best_free, &search_bounds);
            let polished_value = objective.penalized_free(&polished);
            if polished_value < best_value {
                best_free = polished;
                best_value = polished_value;
            }
        }

        let params = objective.merge(&best_free);
        let nnlf = objective.nnlf(&params);
        let support_ok =
            nnlf.is_finite() && (best_value - nnlf).abs() <= SUPPORT_RTOL * nnlf.abs().max(1.0);

        let success = outcome.converged && support_ok;
        let message = if support_ok {
            if outcome.converged {
                MSG_SUCCESS.to_string()
            } else {
                outcome.message
            }
        } else {
            MSG_SUPPORT.to_string()
        };
        trace_info!(success, nnlf, %message, "fit finished");

        Ok(FitResult {
            names,
            params,
            nnlf,
            success,
            message,
            warnings,
        })
    }
}

/// Outcome of a fit call.
///
/// Immutable snapshot: the fitted parameter vector in declared order
/// (shapes, then `loc`, then `scale` for continuous families), the plain
/// negative log-likelihood at that vector, the success verdict, and any
/// warnings collected during input repair.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitResult {
    /// Parameter names, aligned with `params`.
    pub names: Vec<String>,
    /// Fitted parameter values; integer-constrained entries are exact
    /// integers.
    pub params: Vec<f64>,
    /// Negative log-likelihood at `params` (`+inf` if any observation lies
    /// outside the fitted support).
    pub nnlf: f64,
    /// Whether the optimizer converged to a feasible optimum.
    pub success: bool,
    /// Human-readable description of how the fit ended.
    pub message: String,
    /// Non-fatal input repairs and ignored entries.
    pub warnings: Vec<Diagnostic>,
}

impl FitResult {
    /// Looks up a fitted parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}",
            if self.success {
                "fit succeeded"
            } else {
                "fit failed"
            }
        )?;
        writeln!(f, "  message: {}", self.message)?;
        writeln!(f, "  nnlf: {}", self.nnlf)?;
        for (name, value) in self.names.iter().zip(&self.params) {
            writeln!(f, "  {name} = {value}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}

fn validate_data(data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyData);
    }
    for (index, &value) in data.iter().enumerate() {
        if !value.is_finite() {
            return Err(Error::NonFiniteData { index, value });
        }
    }
    Ok(())
}

fn validate_distribution<D: Distribution + ?Sized>(dist: &D) -> Result<()> {
    for shape in dist.shapes() {
        let d = shape.domain;
        if d.low.is_nan() || d.high.is_nan() || d.low > d.high {
            return Err(Error::InvalidDistribution {
                reason: format!("shape `{}` has a malformed domain", shape.name),
            });
        }
    }
    Ok(())
}

fn free_components(full: &[f64], bounds: &[ParamBound]) -> Vec<f64> {
    full.iter()
        .zip(bounds)
        .filter(|(_, b)| !b.is_fixed())
        .map(|(&v, _)| v)
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::families::{Normal, Poisson};

    #[test]
    fn test_empty_data_errors() {
        let err = fit(&Normal, &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyData));
    }

    #[test]
    fn test_non_finite_data_errors() {
        let err = fit(&Normal, &[1.0, f64::NAN, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::NonFiniteData { index: 1, value } if value.is_nan()
        ));
        let err = fit(&Normal, &[1.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteData { index: 1, .. }));
    }

    #[test]
    fn test_all_fixed_short_circuits() {
        let data = [0.0, 1.0, -1.0];
        let result = Fit::new(&Normal, &data)
            .bounds(Bounds::ordered([(0.0, 0.0), (1.0, 1.0)]))
            .run()
            .unwrap();
        assert!(result.success);
        assert_eq!(result.message, MSG_ALL_FIXED);
        assert_eq!(result.params, vec![0.0, 1.0]);
        // NNLF = Σ 0.5 x² + 0.5 ln(2π) at the standard normal.
        let expected = 1.0 + 3.0 * 0.918_938_533_204_672_7;
        assert!((result.nnlf - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unanchored_loc_scale_are_pinned() {
        // Normal with no bounds at all: loc and scale fall back to (0, 1),
        // leaving nothing to optimize.
        let result = fit(&Normal, &[0.5, -0.5]).unwrap();
        assert!(result.success);
        assert_eq!(result.params, vec![0.0, 1.0]);
        assert_eq!(result.message, MSG_ALL_FIXED);
    }

    #[test]
    fn test_param_lookup_by_name() {
        let data = [1.0, 2.0, 3.0];
        let result = Fit::new(&Poisson, &data)
            .bounds(Bounds::named([("mu", (0.0, 10.0)), ("loc", (0.0, 0.0))]))
            .optimizer(DifferentialEvolution::with_seed(0))
            .run()
            .unwrap();
        assert!(result.param("mu").is_some());
        assert_eq!(result.param("loc"), Some(0.0));
        assert!(result.param("sigma").is_none());
    }

    #[test]
    fn test_display_includes_parameters() {
        let result = fit(&Normal, &[0.5, -0.5]).unwrap();
        let rendered = result.to_string();
        assert!(rendered.contains("loc = 0"));
        assert!(rendered.contains("scale = 1"));
    }
}
