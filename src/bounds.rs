//! Bound negotiation: domain ∩ user bounds ∩ integer lattice, per parameter.

use crate::diagnostics::Diagnostic;
use crate::distribution::{Distribution, Kind};
use crate::error::{Error, Result};

/// User-supplied parameter bounds.
///
/// Either an ordered sequence aligned with the parameter order (shapes, then
/// loc, then scale for continuous families) or a name→interval mapping.
/// Omitted parameters fall back to the distribution's natural domain and the
/// engine's anchoring conventions.
///
/// # Examples
///
/// ```
/// use distfit::Bounds;
///
/// let by_position = Bounds::ordered([(1.0, 10.0), (0.0, 1.0)]);
/// let by_name = Bounds::named([("n", (1.0, 10.0)), ("p", (0.0, 1.0))]);
/// ```
#[derive(Clone, Debug)]
pub enum Bounds {
    /// Intervals in declared parameter order; length must lie between
    /// `numargs` and the full parameter count.
    Ordered(Vec<(f64, f64)>),
    /// Intervals keyed by parameter name; unrecognized names warn and are
    /// ignored.
    Named(Vec<(String, (f64, f64))>),
}

impl Bounds {
    /// Bounds given in declared parameter order.
    #[must_use]
    pub fn ordered(intervals: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::Ordered(intervals.into_iter().collect())
    }

    /// Bounds keyed by parameter name.
    #[must_use]
    pub fn named<S: Into<String>>(entries: impl IntoIterator<Item = (S, (f64, f64))>) -> Self {
        Self::Named(
            entries
                .into_iter()
                .map(|(name, iv)| (name.into(), iv))
                .collect(),
        )
    }
}

/// Finalized closed interval for one parameter.
///
/// `low == high` marks the parameter as fixed; fixed parameters never enter
/// the search space.
#[derive(Clone, Debug)]
pub(crate) struct ParamBound {
    pub(crate) name: &'static str,
    pub(crate) low: f64,
    pub(crate) high: f64,
    pub(crate) integral: bool,
}

impl ParamBound {
    #[allow(clippy::float_cmp)]
    pub(crate) fn is_fixed(&self) -> bool {
        self.low == self.high
    }
}

/// Turns user bounds into one `Option<(low, high)>` per parameter, in
/// declared order. Ordered input is length-checked; named input warns on and
/// drops unrecognized parameters.
pub(crate) fn canonicalize(
    dist: &(dyn Distribution + '_),
    user: Option<&Bounds>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Option<(f64, f64)>>> {
    let names = dist.param_names();
    let mut overrides: Vec<Option<(f64, f64)>> = vec![None; names.len()];

    match user {
        None => {}
        Some(Bounds::Ordered(intervals)) => {
            let (min, max) = (dist.numargs(), dist.n_params());
            if intervals.len() < min || intervals.len() > max {
                return Err(Error::BoundsLength {
                    min,
                    max,
                    got: intervals.len(),
                });
            }
            for (slot, &iv) in overrides.iter_mut().zip(intervals) {
                *slot = Some(iv);
            }
        }
        Some(Bounds::Named(entries)) => {
            for (name, iv) in entries {
                match names.iter().position(|n| n == name) {
                    Some(i) => overrides[i] = Some(*iv),
                    None => diagnostics.push(Diagnostic::unrecognized_bound(name)),
                }
            }
        }
    }
    Ok(overrides)
}

/// Resolves the final per-parameter intervals.
///
/// Processes parameters independently: natural domain, user intersection,
/// integer-lattice narrowing, then the anchoring rules for loc/scale. The
/// guess overrides participate only in anchoring (a guess can stand in for a
/// missing loc/scale bound).
pub(crate) fn resolve(
    dist: &(dyn Distribution + '_),
    user: &[Option<(f64, f64)>],
    guess: &[Option<f64>],
    default_loc: f64,
    default_scale: f64,
) -> Result<Vec<ParamBound>> {
    let numargs = dist.numargs();
    let discrete = dist.kind() == Kind::Discrete;
    let names = dist.param_names();
    let mut out = Vec::with_capacity(names.len());

    for (i, &name) in names.iter().enumerate() {
        let is_loc = i == numargs;
        let is_scale = !discrete && i == numargs + 1;

        // Natural domain.
        let (mut low, mut high, integral) = if is_loc {
            (f64::NEG_INFINITY, f64::INFINITY, discrete)
        } else if is_scale {
            (0.0, f64::INFINITY, false)
        } else {
            let d = dist.shapes()[i].domain;
            (d.low, d.high, d.integral)
        };

        // Intersect with the user interval.
        if let Some((user_low, user_high)) = user[i] {
            if user_low.is_nan() || user_high.is_nan() {
                return Err(Error::MalformedBound {
                    name: name.to_string(),
                });
            }
            low = low.max(user_low);
            high = high.min(user_high);
            if low > high {
                return Err(Error::EmptyBounds {
                    name: name.to_string(),
                    low,
                    high,
                });
            }
        }

        // Narrow to the integer lattice.
        if integral {
            let (ilow, ihigh) = (low.ceil(), high.floor());
            if ilow > ihigh {
                return Err(Error::NoIntegerValues {
                    name: name.to_string(),
                    low,
                    high,
                });
            }
            (low, high) = (ilow, ihigh);
        }

        // Anchoring: a free parameter needs a finite search interval.
        if low < high && (!low.is_finite() || !high.is_finite()) {
            if (is_loc || is_scale) && user[i].is_none() {
                if let Some(g) = guess[i] {
                    // Derive a finite interval around the guess.
                    let w = 10.0 * g.abs().max(1.0);
                    low = low.max(g - w);
                    high = high.min(g + w);
                    if integral {
                        (low, high) = (low.ceil(), high.floor());
                    }
                } else {
                    // Fall back to the fixed convention (loc=0, scale=1 by
                    // default; configurable on the builder).
                    let v = if is_loc { default_loc } else { default_scale };
                    let v = if integral { v.round() } else { v };
                    (low, high) = (v, v);
                }
            } else {
                return Err(Error::UnboundedParameter {
                    name: name.to_string(),
                });
            }
        }

        out.push(ParamBound {
            name,
            low,
            high,
            integral,
        });
    }

    Ok(out)
}
