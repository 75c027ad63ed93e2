//! Penalized negative log-likelihood construction.
//!
//! The objective closes over an immutable snapshot of the data, the
//! distribution, and the fixed-parameter substitutions. Two views exist:
//! the plain NNLF, which is `+inf` whenever any observation falls outside
//! the support (used for final diagnostics), and the penalized NNLF, which
//! replaces each infeasible term with a large finite value growing with the
//! squared distance of the observation from the nearest support boundary.
//! The penalty keeps the surface finite and gradient-like everywhere, so a
//! population-based search is steered back toward feasible parameter
//! regions instead of stalling on infinities.

use crate::bounds::ParamBound;
use crate::distribution::{Distribution, Kind};

/// One infeasible observation costs at least this much; roughly
/// `ln(f64::MAX) * 100`, far above any realistic per-point NNLF term.
const PENALTY_UNIT: f64 = 70_978.271_289_338_4;

/// Cap on the support distance entering the penalty. The distance is
/// squared, so it must stay well below `sqrt(f64::MAX)` for the penalty
/// term to remain finite.
const DISTANCE_CAP: f64 = 1e150;

/// Index of a free slot in the full parameter vector.
#[derive(Clone, Copy, Debug)]
struct FreeSlot {
    index: usize,
    integral: bool,
}

/// Snapshot-backed NNLF evaluator over the full parameter vector.
pub(crate) struct Objective<'a> {
    dist: &'a (dyn Distribution + 'a),
    data: &'a [f64],
    kind: Kind,
    numargs: usize,
    /// Full vector with fixed entries substituted; free entries are
    /// placeholders overwritten on every evaluation.
    template: Vec<f64>,
    free: Vec<FreeSlot>,
}

impl<'a> Objective<'a> {
    pub(crate) fn new(
        dist: &'a (dyn Distribution + 'a),
        data: &'a [f64],
        bounds: &[ParamBound],
    ) -> Self {
        let template: Vec<f64> = bounds.iter().map(|b| b.low).collect();
        let free = bounds
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_fixed())
            .map(|(index, b)| FreeSlot {
                index,
                integral: b.integral,
            })
            .collect();
        Self {
            dist,
            data,
            kind: dist.kind(),
            numargs: dist.numargs(),
            template,
            free,
        }
    }

    pub(crate) fn n_free(&self) -> usize {
        self.free.len()
    }

    /// Expands free-parameter values into the full vector, projecting
    /// integer-constrained entries onto the lattice.
    pub(crate) fn merge(&self, free_values: &[f64]) -> Vec<f64> {
        debug_assert_eq!(free_values.len(), self.free.len());
        let mut full = self.template.clone();
        for (slot, &v) in self.free.iter().zip(free_values) {
            full[slot.index] = if slot.integral { v.round() } else { v };
        }
        full
    }

    /// Penalized NNLF over the free parameters; finite everywhere.
    pub(crate) fn penalized_free(&self, free_values: &[f64]) -> f64 {
        self.penalized(&self.merge(free_values))
    }

    /// Plain NNLF over the full parameter vector: `+inf` on any support
    /// violation or invalid parameter combination.
    pub(crate) fn nnlf(&self, params: &[f64]) -> f64 {
        let mut total = 0.0;
        for &x in self.data {
            let term = self.point_term(x, params);
            if !term.is_finite() {
                return f64::INFINITY;
            }
            total += term;
        }
        total
    }

    /// Penalized NNLF over the full parameter vector.
    pub(crate) fn penalized(&self, params: &[f64]) -> f64 {
        let shapes = &params[..self.numargs];
        let (support_low, support_high) = self.dist.support(shapes);
        let mut total = 0.0;
        for &x in self.data {
            let term = self.point_term(x, params);
            if term.is_finite() {
                total += term;
            } else {
                let d = match self.standardize(x, params) {
                    Some((y, _)) => support_distance(y, support_low, support_high),
                    None => 0.0,
                };
                total += PENALTY_UNIT * (1.0 + d * d);
            }
        }
        total
    }

    /// `-log` density/mass contribution of one observation, or a non-finite
    /// value when infeasible.
    fn point_term(&self, x: f64, params: &[f64]) -> f64 {
        let shapes = &params[..self.numargs];
        match self.standardize(x, params) {
            Some((y, log_jacobian)) => -self.dist.log_prob(y, shapes) + log_jacobian,
            None => f64::INFINITY,
        }
    }

    /// Standardizes an observation; `None` when the transform itself is
    /// invalid (non-positive scale).
    fn standardize(&self, x: f64, params: &[f64]) -> Option<(f64, f64)> {
        let loc = params[self.numargs];
        match self.kind {
            Kind::Discrete => Some((x - loc, 0.0)),
            Kind::Continuous => {
                let scale = params[self.numargs + 1];
                if scale > 0.0 {
                    Some(((x - loc) / scale, scale.ln()))
                } else {
                    None
                }
            }
        }
    }
}

/// Distance from a standardized observation to the support interval; zero
/// inside it.
fn support_distance(y: f64, low: f64, high: f64) -> f64 {
    if y < low {
        (low - y).min(DISTANCE_CAP)
    } else if y > high {
        (y - high).min(DISTANCE_CAP)
    } else {
        0.0
    }
}
