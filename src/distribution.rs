//! The contract a distribution family implements to be fittable.
//!
//! The fitting engine treats a distribution as an opaque provider of four
//! things: per-shape-parameter domains (with integrality), a
//! continuous-vs-discrete tag, a standardized log density/mass, and the
//! standardized support. An optional hook supplies data-driven starting
//! values for the shape parameters.
//!
//! Location and scale never appear in this contract. The engine standardizes
//! observations itself — `(x - loc) / scale` for continuous families,
//! `x - loc` for discrete ones — so implementations only ever see the
//! standardized variable. Discrete families have no scale parameter.

/// Whether a family has a density (continuous) or a mass function (discrete).
///
/// Chosen once per fit call; the objective dispatches on this tag instead of
/// probing capabilities at run time. Discrete families carry no scale
/// parameter and have an integer-constrained location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// The family has a probability density function.
    Continuous,
    /// The family has a probability mass function.
    Discrete,
}

/// Natural domain of a single shape parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    /// Lower endpoint (inclusive; may be `-inf`).
    pub low: f64,
    /// Upper endpoint (inclusive; may be `+inf`).
    pub high: f64,
    /// Whether the parameter is constrained to integer values.
    pub integral: bool,
}

impl Domain {
    /// A real-valued domain on `[low, high]`.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            integral: false,
        }
    }

    /// An integer-constrained domain on `[low, high]`.
    #[must_use]
    pub const fn integral(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            integral: true,
        }
    }
}

/// Descriptor for one shape parameter: its name and natural domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeInfo {
    /// Parameter name, used in bounds/guess mappings and diagnostics.
    pub name: &'static str,
    /// The parameter's natural domain.
    pub domain: Domain,
}

impl ShapeInfo {
    /// Creates a shape descriptor.
    #[must_use]
    pub const fn new(name: &'static str, domain: Domain) -> Self {
        Self { name, domain }
    }
}

/// External-collaborator contract for a fittable distribution family.
///
/// Implementations must be cheap to query: `shapes` and `kind` are called
/// several times per fit, and `log_prob` once per observation per candidate.
///
/// # Conventions
///
/// - `log_prob(x, shapes)` receives the **standardized** variable and the
///   shape parameters only. Return `-inf` for points outside the support and
///   NaN for invalid shape combinations; never panic on either.
/// - `support(shapes)` returns the standardized support as a closed interval
///   (endpoints may be infinite). It is used to measure how far an
///   infeasible observation lies from feasibility, so a rough interval is
///   acceptable as long as it contains the true support.
pub trait Distribution {
    /// Density or mass semantics of this family.
    fn kind(&self) -> Kind;

    /// Ordered shape-parameter descriptors. Empty for loc/scale-only
    /// families.
    fn shapes(&self) -> &[ShapeInfo];

    /// Log density (continuous) or log mass (discrete) of the standardized
    /// variable `x` under the given shape parameters.
    fn log_prob(&self, x: f64, shapes: &[f64]) -> f64;

    /// Standardized support interval under the given shape parameters.
    fn support(&self, shapes: &[f64]) -> (f64, f64);

    /// Data-driven starting values for the shape parameters, in declared
    /// order. `None` defers to the engine's midpoint heuristic.
    fn default_guess(&self, _data: &[f64]) -> Option<Vec<f64>> {
        None
    }

    /// Number of shape parameters.
    fn numargs(&self) -> usize {
        self.shapes().len()
    }

    /// Full parameter count: shapes plus loc, plus scale when continuous.
    fn n_params(&self) -> usize {
        match self.kind() {
            Kind::Continuous => self.numargs() + 2,
            Kind::Discrete => self.numargs() + 1,
        }
    }

    /// Ordered names of the full parameter vector.
    fn param_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.shapes().iter().map(|s| s.name).collect();
        names.push("loc");
        if self.kind() == Kind::Continuous {
            names.push("scale");
        }
        names
    }
}
