//! Bundled distribution families.
//!
//! These cover the cases the engine has to handle uniformly: loc/scale-only
//! continuous families ([`Normal`], [`Exponential`], [`Uniform`]), a discrete
//! family with an integer-constrained shape ([`Binomial`]), one with an
//! unbounded shape domain ([`Poisson`]), and one whose likelihood collapses
//! to zero under a misplaced location bound ([`NegativeBinomial`]).
//!
//! Every family implements [`Distribution`] over the standardized variable;
//! the engine applies loc/scale itself. Log-mass functions follow the usual
//! `xlogy` conventions so boundary parameter values (`p = 0`, `p = 1`)
//! produce the degenerate point mass rather than NaN.

use statrs::function::gamma::ln_gamma;

use crate::distribution::{Distribution, Domain, Kind, ShapeInfo};

/// `0.5 * ln(2π)`.
const HALF_LN_TWO_PI: f64 = 0.918_938_533_204_672_7;

/// `x * ln(y)` with the convention `0 * ln(0) = 0`.
#[allow(clippy::float_cmp)]
fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x * y.ln() }
}

/// `ln(k!)` via the gamma function.
fn ln_factorial(k: f64) -> f64 {
    ln_gamma(k + 1.0)
}

/// Returns `true` when `x` is a non-negative integer value.
#[allow(clippy::float_cmp)]
fn is_count(x: f64) -> bool {
    x >= 0.0 && x.fract() == 0.0 && x.is_finite()
}

/// Normal distribution; loc/scale only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normal;

impl Distribution for Normal {
    fn kind(&self) -> Kind {
        Kind::Continuous
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &[]
    }

    fn log_prob(&self, x: f64, _shapes: &[f64]) -> f64 {
        -0.5 * x * x - HALF_LN_TWO_PI
    }

    fn support(&self, _shapes: &[f64]) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

/// Exponential distribution; loc/scale only, support `[0, ∞)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exponential;

impl Distribution for Exponential {
    fn kind(&self) -> Kind {
        Kind::Continuous
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &[]
    }

    fn log_prob(&self, x: f64, _shapes: &[f64]) -> f64 {
        if x < 0.0 { f64::NEG_INFINITY } else { -x }
    }

    fn support(&self, _shapes: &[f64]) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
}

/// Uniform distribution on the standardized interval `[0, 1]`; loc/scale
/// only. Density is discontinuous at the support edges, which makes it a
/// useful stress case for the penalized objective.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniform;

impl Distribution for Uniform {
    fn kind(&self) -> Kind {
        Kind::Continuous
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &[]
    }

    fn log_prob(&self, x: f64, _shapes: &[f64]) -> f64 {
        if (0.0..=1.0).contains(&x) {
            0.0
        } else {
            f64::NEG_INFINITY
        }
    }

    fn support(&self, _shapes: &[f64]) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Binomial distribution with shapes `n` (integer-constrained) and `p`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Binomial;

const BINOMIAL_SHAPES: [ShapeInfo; 2] = [
    ShapeInfo::new("n", Domain::integral(0.0, f64::INFINITY)),
    ShapeInfo::new("p", Domain::new(0.0, 1.0)),
];

impl Distribution for Binomial {
    fn kind(&self) -> Kind {
        Kind::Discrete
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &BINOMIAL_SHAPES
    }

    fn log_prob(&self, x: f64, shapes: &[f64]) -> f64 {
        let n = shapes[0].round();
        let p = shapes[1];
        if n < 0.0 || !(0.0..=1.0).contains(&p) || !n.is_finite() {
            return f64::NAN;
        }
        if !is_count(x) || x > n {
            return f64::NEG_INFINITY;
        }
        let ln_coeff = ln_factorial(n) - ln_factorial(x) - ln_factorial(n - x);
        ln_coeff + xlogy(x, p) + xlogy(n - x, 1.0 - p)
    }

    fn support(&self, shapes: &[f64]) -> (f64, f64) {
        (0.0, shapes[0].round())
    }

    #[allow(clippy::cast_precision_loss)]
    fn default_guess(&self, data: &[f64]) -> Option<Vec<f64>> {
        let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 || !max.is_finite() {
            return None;
        }
        let n0 = max.ceil();
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let p0 = (mean / n0).clamp(0.01, 0.99);
        Some(vec![n0, p0])
    }
}

/// Poisson distribution with shape `mu`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Poisson;

const POISSON_SHAPES: [ShapeInfo; 1] = [ShapeInfo::new("mu", Domain::new(0.0, f64::INFINITY))];

impl Distribution for Poisson {
    fn kind(&self) -> Kind {
        Kind::Discrete
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &POISSON_SHAPES
    }

    #[allow(clippy::float_cmp)]
    fn log_prob(&self, x: f64, shapes: &[f64]) -> f64 {
        let mu = shapes[0];
        if mu < 0.0 || !mu.is_finite() {
            return f64::NAN;
        }
        if !is_count(x) {
            return f64::NEG_INFINITY;
        }
        // mu == 0 degenerates to a point mass at zero.
        if mu == 0.0 {
            return if x == 0.0 { 0.0 } else { f64::NEG_INFINITY };
        }
        xlogy(x, mu) - mu - ln_factorial(x)
    }

    fn support(&self, _shapes: &[f64]) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    #[allow(clippy::cast_precision_loss)]
    fn default_guess(&self, data: &[f64]) -> Option<Vec<f64>> {
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        Some(vec![mean.max(0.1)])
    }
}

/// Negative binomial distribution with shapes `n` and `p`, counting failures
/// before the `n`-th success.
#[derive(Clone, Copy, Debug, Default)]
pub struct NegativeBinomial;

const NEG_BINOMIAL_SHAPES: [ShapeInfo; 2] = [
    ShapeInfo::new("n", Domain::new(0.0, f64::INFINITY)),
    ShapeInfo::new("p", Domain::new(0.0, 1.0)),
];

impl Distribution for NegativeBinomial {
    fn kind(&self) -> Kind {
        Kind::Discrete
    }

    fn shapes(&self) -> &[ShapeInfo] {
        &NEG_BINOMIAL_SHAPES
    }

    #[allow(clippy::float_cmp)]
    fn log_prob(&self, x: f64, shapes: &[f64]) -> f64 {
        let n = shapes[0];
        let p = shapes[1];
        if n <= 0.0 || !(0.0..=1.0).contains(&p) || !n.is_finite() {
            return f64::NAN;
        }
        if !is_count(x) {
            return f64::NEG_INFINITY;
        }
        // p == 1 degenerates to a point mass at zero.
        if p == 1.0 {
            return if x == 0.0 { 0.0 } else { f64::NEG_INFINITY };
        }
        let ln_coeff = ln_gamma(x + n) - ln_gamma(n) - ln_factorial(x);
        ln_coeff + n * p.ln() + xlogy(x, 1.0 - p)
    }

    fn support(&self, _shapes: &[f64]) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    #[allow(clippy::cast_precision_loss)]
    fn default_guess(&self, data: &[f64]) -> Option<Vec<f64>> {
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
        // Method of moments; only defined for overdispersed samples.
        if var <= mean || mean <= 0.0 {
            return None;
        }
        let p0 = mean / var;
        let n0 = mean * p0 / (1.0 - p0);
        Some(vec![n0, p0])
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_log_density() {
        // N(0, 1) density at 0 is 1/sqrt(2π).
        let lp = Normal.log_prob(0.0, &[]);
        assert!((lp - (-HALF_LN_TWO_PI)).abs() < 1e-12);
        // At |x| = 1 the density drops by exp(-1/2).
        assert!((Normal.log_prob(1.0, &[]) - (lp - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_outside_support() {
        assert_eq!(Exponential.log_prob(-0.1, &[]), f64::NEG_INFINITY);
        assert_eq!(Exponential.log_prob(0.0, &[]), 0.0);
    }

    #[test]
    fn test_uniform_edges() {
        assert_eq!(Uniform.log_prob(0.0, &[]), 0.0);
        assert_eq!(Uniform.log_prob(1.0, &[]), 0.0);
        assert_eq!(Uniform.log_prob(1.0001, &[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_binomial_pmf_reference() {
        // P(X = 2 | n=5, p=0.5) = 10/32.
        let lp = Binomial.log_prob(2.0, &[5.0, 0.5]);
        assert!((lp - (10.0 / 32.0_f64).ln()).abs() < 1e-12);
        // Outside {0..n} has zero mass; fractional counts too.
        assert_eq!(Binomial.log_prob(6.0, &[5.0, 0.5]), f64::NEG_INFINITY);
        assert_eq!(Binomial.log_prob(2.5, &[5.0, 0.5]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_binomial_degenerate_p() {
        assert_eq!(Binomial.log_prob(0.0, &[5.0, 0.0]), 0.0);
        assert_eq!(Binomial.log_prob(1.0, &[5.0, 0.0]), f64::NEG_INFINITY);
        assert_eq!(Binomial.log_prob(5.0, &[5.0, 1.0]), 0.0);
    }

    #[test]
    fn test_poisson_pmf_reference() {
        // P(X = 3 | mu=2) = 2^3 e^{-2} / 3!
        let lp = Poisson.log_prob(3.0, &[2.0]);
        let expected = (8.0 / 6.0_f64).ln() - 2.0;
        assert!((lp - expected).abs() < 1e-12);
    }

    #[test]
    fn test_neg_binomial_pmf_reference() {
        // P(X = k | n, p) = C(k+n-1, k) p^n (1-p)^k; n=5, p=0.5, k=2 → C(6,2)/2^7.
        let lp = NegativeBinomial.log_prob(2.0, &[5.0, 0.5]);
        let expected = (15.0 / 128.0_f64).ln();
        assert!((lp - expected).abs() < 1e-12);
    }

    #[test]
    fn test_binomial_default_guess_brackets_data() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let guess = Binomial.default_guess(&data).unwrap();
        assert_eq!(guess[0], 5.0);
        assert!(guess[1] > 0.0 && guess[1] < 1.0);
    }

    #[test]
    fn test_neg_binomial_guess_requires_overdispersion() {
        // Underdispersed data has no moment-based guess.
        let data = [2.0, 2.0, 2.0, 2.0];
        assert!(NegativeBinomial.default_guess(&data).is_none());
    }
}
