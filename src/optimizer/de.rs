//! Differential Evolution (DE), the default global search strategy.
//!
//! DE is a population-based metaheuristic that maintains a pool of candidate
//! parameter vectors and creates new candidates through **mutation**
//! (combining difference vectors of existing members) and **binomial
//! crossover**. A trial vector replaces its parent only if it achieves a
//! better objective value, guaranteeing monotonic improvement of the
//! population — which is also why a caller-supplied guess, seeded into the
//! initial population, is never lost.
//!
//! # Algorithm overview
//!
//! Each generation, for every population member *xᵢ*:
//! 1. **Mutation** — create a mutant vector *v* from other population
//!    members using the selected [`MutationStrategy`]:
//!    - `Rand1`:  `v = x_r1 + F * (x_r2 - x_r3)`
//!    - `Best1`:  `v = x_best + F * (x_r1 - x_r2)`
//!    - `CurrentToBest1`:  `v = x_i + F * (x_best - x_i) + F * (x_r1 - x_r2)`
//! 2. **Crossover** — create a trial vector *u* by mixing *v* and *xᵢ*
//!    dimension-by-dimension with probability CR.
//! 3. **Selection** — replace *xᵢ* with *u* if `f(u) ≤ f(xᵢ)`.
//!
//! Integer-constrained dimensions keep a continuous internal representation;
//! candidates are projected onto the lattice for every evaluation, so the
//! search explores a mixed continuous/integer space without special-casing
//! the mutation arithmetic.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `population_size` | `max(10n, 15)` | Candidates per generation |
//! | `mutation_factor` (F) | 0.8 | Differential amplification — higher = more exploration |
//! | `crossover_rate` (CR) | 0.9 | Probability of taking a dimension from the mutant |
//! | `strategy` | `Rand1` | Mutation strategy (see [`MutationStrategy`]) |
//! | `max_generations` | 1000 | Budget before giving up on convergence |
//! | `tol` | 0.01 | Population-spread convergence tolerance |
//! | `seed` | random | RNG seed for reproducibility |

use crate::optimizer::{Optimizer, Outcome, SearchBound};

/// Differential Evolution mutation strategy.
///
/// Controls how mutant vectors are created from the current population.
#[derive(Clone, Copy, Debug, Default)]
pub enum MutationStrategy {
    /// DE/rand/1: `v = x_r1 + F * (x_r2 - x_r3)`
    ///
    /// The most robust strategy. Uses three random population members.
    #[default]
    Rand1,
    /// DE/best/1: `v = x_best + F * (x_r1 - x_r2)`
    ///
    /// Greedier strategy that biases toward the current best solution.
    Best1,
    /// DE/current-to-best/1: `v = x_i + F * (x_best - x_i) + F * (x_r1 - x_r2)`
    ///
    /// Balances exploration and exploitation by blending the current
    /// individual with the best.
    CurrentToBest1,
}

/// Differential Evolution optimizer for bounded global minimization.
///
/// # Examples
///
/// ```
/// use distfit::optimizer::{DifferentialEvolution, MutationStrategy, Optimizer, SearchBound};
///
/// let de = DifferentialEvolution::builder()
///     .mutation_factor(0.7)
///     .crossover_rate(0.9)
///     .strategy(MutationStrategy::Best1)
///     .seed(42)
///     .build();
///
/// let bounds = [SearchBound { low: -10.0, high: 10.0, integral: false }];
/// let outcome = de.optimize(&|x| (x[0] - 3.0).powi(2), &bounds, None);
/// assert!(outcome.converged);
/// assert!((outcome.point[0] - 3.0).abs() < 0.1);
/// ```
#[derive(Clone, Debug)]
pub struct DifferentialEvolution {
    population_size: Option<usize>,
    mutation_factor: f64,
    crossover_rate: f64,
    strategy: MutationStrategy,
    max_generations: usize,
    tol: f64,
    seed: Option<u64>,
}

impl DifferentialEvolution {
    /// Creates a DE optimizer with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a DE optimizer with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::builder().seed(seed).build()
    }

    /// Creates a builder for configuring a `DifferentialEvolution`.
    #[must_use]
    pub fn builder() -> DifferentialEvolutionBuilder {
        DifferentialEvolutionBuilder::new()
    }
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`DifferentialEvolution`] optimizer.
///
/// All options have sensible defaults; see the [module docs](self) for the
/// full table.
#[derive(Clone, Debug)]
pub struct DifferentialEvolutionBuilder {
    population_size: Option<usize>,
    mutation_factor: f64,
    crossover_rate: f64,
    strategy: MutationStrategy,
    max_generations: usize,
    tol: f64,
    seed: Option<u64>,
}

impl Default for DifferentialEvolutionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DifferentialEvolutionBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            population_size: None,
            mutation_factor: 0.8,
            crossover_rate: 0.9,
            strategy: MutationStrategy::Rand1,
            max_generations: 1000,
            tol: 0.01,
            seed: None,
        }
    }

    /// Sets the population size.
    ///
    /// Larger populations improve robustness but cost more evaluations per
    /// generation. Default: `max(10 * n_dims, 15)`, never below 4.
    #[must_use]
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Sets the mutation factor (F).
    ///
    /// Typical values are in `[0.5, 1.0]`. Higher values increase
    /// exploration. Default: 0.8.
    #[must_use]
    pub fn mutation_factor(mut self, f: f64) -> Self {
        self.mutation_factor = f;
        self
    }

    /// Sets the crossover rate (CR).
    ///
    /// Probability of each dimension being taken from the mutant vector
    /// rather than the parent. Default: 0.9.
    #[must_use]
    pub fn crossover_rate(mut self, cr: f64) -> Self {
        self.crossover_rate = cr;
        self
    }

    /// Sets the mutation strategy. Default: [`MutationStrategy::Rand1`].
    #[must_use]
    pub fn strategy(mut self, strategy: MutationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the generation budget. Default: 1000.
    #[must_use]
    pub fn max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the convergence tolerance on the population value spread.
    ///
    /// The run converges when the standard deviation of the population's
    /// objective values drops below `1e-8 + tol * |mean|`. Default: 0.01.
    #[must_use]
    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`DifferentialEvolution`].
    #[must_use]
    pub fn build(self) -> DifferentialEvolution {
        DifferentialEvolution {
            population_size: self.population_size,
            mutation_factor: self.mutation_factor,
            crossover_rate: self.crossover_rate,
            strategy: self.strategy,
            max_generations: self.max_generations,
            tol: self.tol,
            seed: self.seed,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a random `f64` in the range `[low, high)`.
#[inline]
fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Project a candidate onto the mixed continuous/integer lattice.
fn project(x: &[f64], bounds: &[SearchBound]) -> Vec<f64> {
    x.iter()
        .zip(bounds)
        .map(|(&v, b)| if b.integral { v.round() } else { v })
        .collect()
}

/// NaN-safe objective wrapper: undefined values lose every comparison.
fn sanitize(value: f64) -> f64 {
    if value.is_nan() { f64::INFINITY } else { value }
}

/// Select `count` distinct random indices from `0..n`, all different from
/// the entries of `exclude`.
fn select_random_indices(
    rng: &mut fastrand::Rng,
    n: usize,
    count: usize,
    exclude: &[usize],
) -> Vec<usize> {
    let mut selected = Vec::with_capacity(count);
    while selected.len() < count {
        let idx = rng.usize(0..n);
        if !exclude.contains(&idx) && !selected.contains(&idx) {
            selected.push(idx);
        }
    }
    selected
}

// ---------------------------------------------------------------------------
// DE algorithm
// ---------------------------------------------------------------------------

struct Population {
    members: Vec<Vec<f64>>,
    values: Vec<f64>,
    best_idx: usize,
}

impl Population {
    fn update_best(&mut self) {
        let mut best_value = f64::INFINITY;
        let mut best_idx = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v < best_value {
                best_value = v;
                best_idx = i;
            }
        }
        self.best_idx = best_idx;
    }

    /// Spread-based convergence: std of values ≤ `1e-8 + tol * |mean|`.
    #[allow(clippy::cast_precision_loss)]
    fn converged(&self, tol: f64) -> bool {
        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;
        if !mean.is_finite() {
            return false;
        }
        let var = self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        var.sqrt() <= 1e-8 + tol * mean.abs()
    }
}

impl DifferentialEvolution {
    fn create_mutant(
        &self,
        rng: &mut fastrand::Rng,
        population: &Population,
        target_idx: usize,
    ) -> Vec<f64> {
        let pop = &population.members;
        let best_idx = population.best_idx;
        let f = self.mutation_factor;
        let n_dims = pop[0].len();
        let pop_size = pop.len();

        match self.strategy {
            MutationStrategy::Rand1 => {
                let indices = select_random_indices(rng, pop_size, 3, &[target_idx]);
                let (r1, r2, r3) = (indices[0], indices[1], indices[2]);
                (0..n_dims)
                    .map(|j| pop[r1][j] + f * (pop[r2][j] - pop[r3][j]))
                    .collect()
            }
            MutationStrategy::Best1 => {
                let indices = select_random_indices(rng, pop_size, 2, &[target_idx]);
                let (r1, r2) = (indices[0], indices[1]);
                (0..n_dims)
                    .map(|j| pop[best_idx][j] + f * (pop[r1][j] - pop[r2][j]))
                    .collect()
            }
            MutationStrategy::CurrentToBest1 => {
                let indices = select_random_indices(rng, pop_size, 2, &[target_idx]);
                let (r1, r2) = (indices[0], indices[1]);
                (0..n_dims)
                    .map(|j| {
                        pop[target_idx][j]
                            + f * (pop[best_idx][j] - pop[target_idx][j])
                            + f * (pop[r1][j] - pop[r2][j])
                    })
                    .collect()
            }
        }
    }
}

impl Optimizer for DifferentialEvolution {
    fn optimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        bounds: &[SearchBound],
        init: Option<&[f64]>,
    ) -> Outcome {
        let n_dims = bounds.len();
        if n_dims == 0 {
            return Outcome {
                point: Vec::new(),
                value: sanitize(objective(&[])),
                converged: true,
                message: "search space is empty; nothing to optimize".to_string(),
            };
        }

        let mut rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        let pop_size = self
            .population_size
            .unwrap_or_else(|| (10 * n_dims).max(15))
            .max(4);

        // Initial population: uniform over the box, with the engine's
        // synthesized guess embedded as member 0 so it is never lost.
        let mut members: Vec<Vec<f64>> = (0..pop_size)
            .map(|_| {
                bounds
                    .iter()
                    .map(|b| f64_range(&mut rng, b.low, b.high))
                    .collect()
            })
            .collect();
        if let Some(x0) = init {
            members[0] = x0
                .iter()
                .zip(bounds)
                .map(|(&v, b)| v.clamp(b.low, b.high))
                .collect();
        }
        let values: Vec<f64> = members
            .iter()
            .map(|m| sanitize(objective(&project(m, bounds))))
            .collect();
        let mut population = Population {
            members,
            values,
            best_idx: 0,
        };
        population.update_best();

        let mut converged = false;
        let mut generations = 0;
        for generation in 0..self.max_generations {
            generations = generation + 1;
            for i in 0..pop_size {
                let mutant = self.create_mutant(&mut rng, &population, i);

                // Binomial crossover; j_rand guarantees at least one mutant
                // dimension survives.
                let j_rand = rng.usize(0..n_dims);
                let trial: Vec<f64> = (0..n_dims)
                    .map(|j| {
                        let use_mutant = j == j_rand || rng.f64() < self.crossover_rate;
                        let v = if use_mutant {
                            mutant[j]
                        } else {
                            population.members[i][j]
                        };
                        v.clamp(bounds[j].low, bounds[j].high)
                    })
                    .collect();

                let trial_value = sanitize(objective(&project(&trial, bounds)));
                if trial_value <= population.values[i] {
                    population.members[i] = trial;
                    population.values[i] = trial_value;
                }
            }
            population.update_best();

            if population.converged(self.tol) {
                converged = true;
                break;
            }
        }

        let best = population.best_idx;
        let message = if converged {
            format!("convergence criterion satisfied after {generations} generations")
        } else {
            format!("maximum number of generations ({generations}) reached without convergence")
        };
        trace_debug!(
            generations,
            converged,
            best_value = population.values[best],
            "differential evolution finished"
        );
        Outcome {
            point: project(&population.members[best], bounds),
            value: population.values[best],
            converged,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_bounds(low: f64, high: f64, n: usize) -> Vec<SearchBound> {
        vec![
            SearchBound {
                low,
                high,
                integral: false,
            };
            n
        ]
    }

    #[test]
    fn test_de_minimizes_quadratic() {
        let de = DifferentialEvolution::with_seed(42);
        let outcome = de.optimize(
            &|x| (x[0] - 3.0).powi(2),
            &float_bounds(-10.0, 10.0, 1),
            None,
        );
        assert!(outcome.converged, "{}", outcome.message);
        assert!(
            (outcome.point[0] - 3.0).abs() < 0.1,
            "best point {} too far from optimum",
            outcome.point[0]
        );
    }

    #[test]
    fn test_de_minimizes_multimodal_rastrigin() {
        // 2-d Rastrigin: global minimum 0 at the origin, many local minima.
        let rastrigin = |x: &[f64]| {
            20.0 + x
                .iter()
                .map(|&v| v * v - 10.0 * (2.0 * core::f64::consts::PI * v).cos())
                .sum::<f64>()
        };
        let de = DifferentialEvolution::builder()
            .seed(7)
            .population_size(40)
            .build();
        let outcome = de.optimize(&rastrigin, &float_bounds(-5.12, 5.12, 2), None);
        assert!(
            outcome.value < 1.0,
            "DE should come close to the global minimum, got {}",
            outcome.value
        );
    }

    #[test]
    fn test_de_respects_bounds() {
        let de = DifferentialEvolution::with_seed(3);
        let outcome = de.optimize(
            &|x| (x[0] - 100.0).powi(2),
            &float_bounds(-1.0, 1.0, 1),
            None,
        );
        assert!((-1.0..=1.0).contains(&outcome.point[0]));
        assert!((outcome.point[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_de_projects_integral_dimensions() {
        let bounds = [
            SearchBound {
                low: 0.0,
                high: 20.0,
                integral: true,
            },
            SearchBound {
                low: 0.0,
                high: 1.0,
                integral: false,
            },
        ];
        let de = DifferentialEvolution::with_seed(11);
        let outcome = de.optimize(&|x| (x[0] - 7.0).powi(2) + (x[1] - 0.3).powi(2), &bounds, None);
        assert!(
            (outcome.point[0].fract()).abs() < f64::EPSILON,
            "integral dimension must land on the lattice"
        );
        assert!((outcome.point[0] - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_de_reproducible_with_seed() {
        let run = |seed: u64| {
            DifferentialEvolution::with_seed(seed).optimize(
                &|x| x[0].powi(2) + x[1].powi(2),
                &float_bounds(-5.0, 5.0, 2),
                None,
            )
        };
        let (a, b) = (run(42), run(42));
        assert_eq!(a.point, b.point);
        assert!((a.value - b.value).abs() < f64::EPSILON);
    }

    #[test]
    fn test_de_init_is_never_lost() {
        // With a tiny budget, the embedded init must survive selection.
        let de = DifferentialEvolution::builder()
            .seed(5)
            .population_size(8)
            .max_generations(2)
            .build();
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2);
        let outcome = de.optimize(&objective, &float_bounds(-1000.0, 1000.0, 1), Some(&[3.0]));
        assert!(
            outcome.value <= objective(&[3.0]) + 1e-12,
            "final value must be at least as good as the init"
        );
    }

    #[test]
    fn test_builder_defaults() {
        let builder = DifferentialEvolutionBuilder::new();
        assert!(builder.population_size.is_none());
        assert!((builder.mutation_factor - 0.8).abs() < f64::EPSILON);
        assert!((builder.crossover_rate - 0.9).abs() < f64::EPSILON);
        assert!(matches!(builder.strategy, MutationStrategy::Rand1));
        assert_eq!(builder.max_generations, 1000);
        assert!(builder.seed.is_none());
    }
}
