//! Optimizer contract and implementations for the bounded global search.
//!
//! The fitting engine hands an optimizer the penalized objective and the
//! bounds of the *free* parameters only; fixed parameters are merged back
//! into the full vector by the engine. Any strategy satisfying
//! [`Optimizer`] may be substituted — population-based, pattern search,
//! multi-start local — as long as it respects the bounds and reports
//! convergence honestly.

pub mod de;

pub use de::{DifferentialEvolution, DifferentialEvolutionBuilder, MutationStrategy};

/// Search interval for one free parameter.
///
/// `integral` marks a parameter constrained to the integer lattice;
/// candidates for such dimensions are projected (rounded) during evaluation
/// so the search explores a mixed continuous/integer space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchBound {
    /// Lower bound (inclusive, finite).
    pub low: f64,
    /// Upper bound (inclusive, finite).
    pub high: f64,
    /// Whether the dimension is integer-constrained.
    pub integral: bool,
}

/// Outcome of one optimizer run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    /// Best point found, in free-parameter order, integral dimensions
    /// projected onto the lattice.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Whether the strategy's convergence criterion was met.
    pub converged: bool,
    /// Strategy-specific description of how the run ended.
    pub message: String,
}

/// Pluggable bounded global search strategy.
///
/// Implementations must treat the objective as a black box: finite, but
/// possibly discontinuous and multimodal. `init` is a feasible starting
/// point synthesized by the engine; strategies should fold it into their
/// search (e.g. as a population member) so a caller-provided guess can
/// steer the run, but may ignore it.
pub trait Optimizer {
    /// Minimizes `objective` over the box given by `bounds`.
    fn optimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        bounds: &[SearchBound],
        init: Option<&[f64]>,
    ) -> Outcome;
}

/// Bounded compass (pattern) search used to polish the global optimum.
///
/// Moves one continuous coordinate at a time, halving the step whenever no
/// axis move improves; integral coordinates stay put so the qualitative
/// conclusion of the global phase is preserved. Pure improvement only — the
/// returned point is never worse than the input.
#[allow(clippy::float_cmp)]
pub(crate) fn polish(
    objective: &dyn Fn(&[f64]) -> f64,
    point: &[f64],
    bounds: &[SearchBound],
) -> Vec<f64> {
    let mut x = point.to_vec();
    let mut fx = objective(&x);

    let mut steps: Vec<f64> = bounds
        .iter()
        .map(|b| {
            if b.integral {
                0.0
            } else {
                0.05 * (b.high - b.low)
            }
        })
        .collect();
    if steps.iter().all(|&s| s <= 0.0) {
        return x;
    }

    // Hard cap on sweeps; 10k is far beyond what the halving schedule needs.
    for _ in 0..10_000 {
        let mut improved = false;
        for j in 0..x.len() {
            if steps[j] <= 0.0 {
                continue;
            }
            for direction in [1.0, -1.0] {
                let candidate = (x[j] + direction * steps[j]).clamp(bounds[j].low, bounds[j].high);
                if candidate == x[j] {
                    continue;
                }
                let old = x[j];
                x[j] = candidate;
                let fc = objective(&x);
                if fc < fx {
                    fx = fc;
                    improved = true;
                    break;
                }
                x[j] = old;
            }
        }
        if !improved {
            for s in &mut steps {
                *s *= 0.5;
            }
            let widest = steps.iter().copied().fold(0.0_f64, f64::max);
            if widest < 1e-10 {
                break;
            }
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds(n: usize) -> Vec<SearchBound> {
        vec![
            SearchBound {
                low: -10.0,
                high: 10.0,
                integral: false,
            };
            n
        ]
    }

    #[test]
    fn test_polish_refines_to_high_precision() {
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2);
        let polished = polish(&objective, &[2.7, -0.6], &unit_bounds(2));
        assert!((polished[0] - 3.0).abs() < 1e-6);
        assert!((polished[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_polish_never_worsens() {
        // Discontinuous objective: the start sits at the bottom of a plateau.
        let objective = |x: &[f64]| if x[0].abs() < 0.5 { 0.0 } else { 1.0 };
        let polished = polish(&objective, &[0.1], &unit_bounds(1));
        assert!((objective(&polished) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_polish_respects_bounds() {
        let objective = |x: &[f64]| (x[0] - 20.0).powi(2);
        let polished = polish(&objective, &[5.0], &unit_bounds(1));
        assert!(polished[0] <= 10.0);
        assert!((polished[0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_polish_leaves_integral_dimensions_alone() {
        let bounds = [
            SearchBound {
                low: 0.0,
                high: 10.0,
                integral: true,
            },
            SearchBound {
                low: 0.0,
                high: 10.0,
                integral: false,
            },
        ];
        let objective = |x: &[f64]| (x[0] - 7.0).powi(2) + (x[1] - 2.5).powi(2);
        let polished = polish(&objective, &[4.0, 1.0], &bounds);
        assert!((polished[0] - 4.0).abs() < f64::EPSILON, "integral dim moved");
        assert!((polished[1] - 2.5).abs() < 1e-6);
    }
}
