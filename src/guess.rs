//! Initial-point synthesis and repair.
//!
//! Every parameter gets a feasible starting value: user guesses are
//! validated and repaired (rounded onto the integer lattice, clipped into
//! the bound — each repair recorded as a warning), and missing guesses are
//! defaulted from the family's guess hook or data moments. Defaults are
//! constructed in-bound, so only user-supplied values ever warn.

use crate::bounds::ParamBound;
use crate::diagnostics::Diagnostic;
use crate::distribution::{Distribution, Kind};
use crate::error::{Error, Result};

/// User-supplied initial guesses.
///
/// Either an ordered sequence aligned with the parameter order or a
/// name→value mapping; both may be partial (mapping) or cover a prefix of
/// the parameter vector (sequence).
///
/// # Examples
///
/// ```
/// use distfit::Guess;
///
/// let by_position = Guess::ordered([5.0, 0.5, 0.0]);
/// let by_name = Guess::named([("n", 5.0), ("p", 0.5)]);
/// ```
#[derive(Clone, Debug)]
pub enum Guess {
    /// Values in declared parameter order; length must lie between `numargs`
    /// and the full parameter count.
    Ordered(Vec<f64>),
    /// Values keyed by parameter name; unrecognized names warn and are
    /// ignored.
    Named(Vec<(String, f64)>),
}

impl Guess {
    /// Guesses given in declared parameter order.
    #[must_use]
    pub fn ordered(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Ordered(values.into_iter().collect())
    }

    /// Guesses keyed by parameter name.
    #[must_use]
    pub fn named<S: Into<String>>(entries: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self::Named(
            entries
                .into_iter()
                .map(|(name, v)| (name.into(), v))
                .collect(),
        )
    }
}

/// Turns a user guess into one `Option<f64>` per parameter, in declared
/// order. Runs before bound resolution so guesses can anchor unbounded
/// loc/scale intervals.
pub(crate) fn canonicalize(
    dist: &(dyn Distribution + '_),
    user: Option<&Guess>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Option<f64>>> {
    let names = dist.param_names();
    let mut overrides: Vec<Option<f64>> = vec![None; names.len()];

    match user {
        None => {}
        Some(Guess::Ordered(values)) => {
            let (min, max) = (dist.numargs(), dist.n_params());
            if values.len() < min || values.len() > max {
                return Err(Error::GuessLength {
                    min,
                    max,
                    got: values.len(),
                });
            }
            for (i, (slot, &v)) in overrides.iter_mut().zip(values).enumerate() {
                if !v.is_finite() {
                    return Err(Error::NonFiniteGuess {
                        name: names[i].to_string(),
                        value: v,
                    });
                }
                *slot = Some(v);
            }
        }
        Some(Guess::Named(entries)) => {
            for (name, v) in entries {
                match names.iter().position(|n| n == name) {
                    Some(i) => {
                        if !v.is_finite() {
                            return Err(Error::NonFiniteGuess {
                                name: name.clone(),
                                value: *v,
                            });
                        }
                        overrides[i] = Some(*v);
                    }
                    None => diagnostics.push(Diagnostic::unrecognized_guess(name)),
                }
            }
        }
    }
    Ok(overrides)
}

/// Builds the full initial point: one feasible value per parameter.
///
/// User guesses are rounded (integral parameters) and clipped (bound
/// violations) with a warning per repair; both repairs may apply to the same
/// parameter. Defaults come from the family hook for shapes and from data
/// moments for loc/scale, silently constrained into the bound.
pub(crate) fn synthesize(
    dist: &(dyn Distribution + '_),
    bounds: &[ParamBound],
    overrides: &[Option<f64>],
    data: &[f64],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<f64>> {
    let numargs = dist.numargs();
    let hook = dist.default_guess(data);
    if let Some(shape_guess) = &hook
        && shape_guess.len() != numargs
    {
        return Err(Error::InvalidDistribution {
            reason: format!(
                "default_guess returned {} values for {numargs} shape parameters",
                shape_guess.len()
            ),
        });
    }

    let mut point = Vec::with_capacity(bounds.len());
    for (i, bound) in bounds.iter().enumerate() {
        let value = match overrides[i] {
            Some(g) => repair(g, bound, diagnostics),
            None => {
                let raw = if i < numargs {
                    hook.as_ref().map_or_else(|| midpoint(bound), |s| s[i])
                } else if i == numargs {
                    default_loc_value(dist.kind(), data)
                } else {
                    sample_std(data)
                };
                constrain(raw, bound)
            }
        };
        point.push(value);
    }
    Ok(point)
}

/// Round-then-clip a user guess, warning for each repair.
#[allow(clippy::float_cmp)]
fn repair(guess: f64, bound: &ParamBound, diagnostics: &mut Vec<Diagnostic>) -> f64 {
    let mut value = guess;
    if bound.integral && value.fract() != 0.0 {
        let rounded = value.round();
        diagnostics.push(Diagnostic::rounded(bound.name, value, rounded));
        value = rounded;
    }
    if value < bound.low || value > bound.high {
        let clipped = value.clamp(bound.low, bound.high);
        diagnostics.push(Diagnostic::clipped(bound.name, value, clipped));
        value = clipped;
    }
    value
}

/// Silently force a defaulted value into the bound (and onto the lattice).
fn constrain(value: f64, bound: &ParamBound) -> f64 {
    let v = if bound.integral {
        value.round()
    } else {
        value
    };
    v.clamp(bound.low, bound.high)
}

/// Midpoint of a finalized (finite) interval.
fn midpoint(bound: &ParamBound) -> f64 {
    0.5 * (bound.low + bound.high)
}

fn default_loc_value(kind: Kind, data: &[f64]) -> f64 {
    match kind {
        Kind::Continuous => sample_mean(data),
        Kind::Discrete => data.iter().copied().fold(f64::INFINITY, f64::min).floor(),
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn sample_std(data: &[f64]) -> f64 {
    let mean = sample_mean(data);
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    var.sqrt()
}
