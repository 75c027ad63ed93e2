//! Input validation and diagnostics, end to end through the builder.
//!
//! Malformed inputs must error before any search starts; repairable inputs
//! must be repaired with a warning on the result.

use distfit::prelude::*;

fn poisson_fit(data: &[f64]) -> Fit<'_, Poisson> {
    Fit::new(&Poisson, data).bounds(Bounds::named([("mu", (0.0, 20.0)), ("loc", (0.0, 0.0))]))
}

#[test]
fn test_empty_data_is_rejected() {
    let err = fit(&Normal, &[]).unwrap_err();
    assert!(matches!(err, Error::EmptyData));
}

#[test]
fn test_non_finite_data_is_rejected() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = fit(&Normal, &[1.0, bad, 2.0]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteData { index: 1, .. }));
    }
}

#[test]
fn test_ordered_bounds_length_is_checked() {
    let data = [1.0, 2.0, 3.0];

    // Binomial takes between 2 (shapes only) and 3 (shapes + loc) intervals.
    let err = Fit::new(&Binomial, &data)
        .bounds(Bounds::ordered([(1.0, 10.0)]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::BoundsLength { min: 2, max: 3, got: 1 }));
    assert!(err.to_string().contains("at least 2"));
    assert!(err.to_string().contains("at most 3"));

    let err = Fit::new(&Binomial, &data)
        .bounds(Bounds::ordered(vec![(1.0, 10.0); 4]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::BoundsLength { got: 4, .. }));
}

#[test]
fn test_nan_bound_endpoint_is_rejected() {
    let err = poisson_fit(&[1.0, 2.0])
        .bounds(Bounds::named([("mu", (f64::NAN, 20.0)), ("loc", (0.0, 0.0))]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::MalformedBound { .. }));
}

#[test]
fn test_empty_bound_intersection_is_rejected() {
    // The interval for p lies entirely outside its natural domain [0, 1].
    let err = Fit::new(&Binomial, &[1.0, 2.0])
        .bounds(Bounds::named([
            ("n", (1.0, 10.0)),
            ("p", (2.0, 3.0)),
            ("loc", (0.0, 0.0)),
        ]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::EmptyBounds { .. }));
    assert!(err.to_string().contains("there are no values for `p`"));
}

#[test]
fn test_integer_free_interval_is_rejected() {
    // n is integer-constrained and (1.4, 1.6) contains no integer.
    let err = Fit::new(&Binomial, &[1.0])
        .bounds(Bounds::named([("n", (1.4, 1.6)), ("loc", (0.0, 0.0))]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::NoIntegerValues { .. }));
    assert!(err.to_string().contains("no integer values for `n`"));
}

#[test]
fn test_unbounded_shape_is_rejected() {
    // mu has natural domain [0, inf); without a user bound the search is
    // ill-posed.
    let err = Fit::new(&Poisson, &[1.0, 2.0])
        .bounds(Bounds::named([("loc", (0.0, 0.0))]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::UnboundedParameter { .. }));
    assert!(err.to_string().contains("`mu`"));
}

#[test]
fn test_unrecognized_bound_name_warns() {
    let result = poisson_fit(&[1.0, 2.0, 3.0])
        .bounds(Bounds::named([
            ("mu", (0.0, 20.0)),
            ("lambda", (0.0, 1.0)),
            ("loc", (0.0, 0.0)),
        ]))
        .optimizer(DifferentialEvolution::with_seed(0))
        .run()
        .unwrap();

    let kinds: Vec<_> = result.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UnrecognizedBound]);
    assert_eq!(result.warnings[0].parameter, "lambda");
}

#[test]
fn test_unrecognized_guess_name_warns() {
    let result = poisson_fit(&[1.0, 2.0, 3.0])
        .guess(Guess::named([("mu", 2.0), ("rate", 2.0)]))
        .optimizer(DifferentialEvolution::with_seed(0))
        .run()
        .unwrap();

    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, DiagnosticKind::UnrecognizedGuess);
    assert_eq!(result.warnings[0].parameter, "rate");
}

#[test]
fn test_out_of_bound_guess_is_clipped_with_warning() {
    let result = poisson_fit(&[1.0, 2.0, 3.0])
        .guess(Guess::named([("mu", 100.0)]))
        .optimizer(DifferentialEvolution::with_seed(0))
        .run()
        .unwrap();

    assert!(result.success, "{}", result.message);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, DiagnosticKind::GuessClipped);
    assert_eq!(result.warnings[0].parameter, "mu");
    assert!(result.warnings[0].detail.contains("clipped"));
}

#[test]
fn test_fractional_integer_guess_is_rounded_with_warning() {
    let result = Fit::new(&Binomial, &[1.0, 2.0, 2.0, 3.0])
        .bounds(Bounds::named([("n", (1.0, 10.0)), ("loc", (0.0, 0.0))]))
        .guess(Guess::named([("n", 4.5)]))
        .optimizer(DifferentialEvolution::with_seed(0))
        .run()
        .unwrap();

    let rounded: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == DiagnosticKind::GuessRounded)
        .collect();
    assert_eq!(rounded.len(), 1);
    assert_eq!(rounded[0].parameter, "n");
    assert!(rounded[0].detail.contains("rounded"));
}

#[test]
fn test_non_finite_guess_is_rejected() {
    let err = poisson_fit(&[1.0, 2.0])
        .guess(Guess::named([("mu", f64::NAN)]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::NonFiniteGuess { .. }));
}

#[test]
fn test_ordered_guess_length_is_checked() {
    let err = Fit::new(&Binomial, &[1.0, 2.0])
        .bounds(Bounds::named([("n", (1.0, 10.0)), ("loc", (0.0, 0.0))]))
        .guess(Guess::ordered([5.0]))
        .run()
        .unwrap_err();
    assert!(matches!(err, Error::GuessLength { min: 2, max: 3, got: 1 }));
}

#[test]
fn test_guess_anchors_unbounded_loc() {
    // No loc bound, but a guess for it: loc becomes a free parameter
    // searched in a finite interval around the guess instead of being
    // pinned at 0.
    let data = [2.4, 2.6, 3.0, 3.4, 3.6];
    let result = Fit::new(&Normal, &data)
        .bounds(Bounds::named([("scale", (0.1, 10.0))]))
        .guess(Guess::named([("loc", 3.0)]))
        .optimizer(DifferentialEvolution::with_seed(1))
        .run()
        .unwrap();

    assert!(result.success, "{}", result.message);
    assert!((result.param("loc").unwrap() - 3.0).abs() < 0.1);
}

#[test]
fn test_warnings_accumulate_across_sources() {
    let result = poisson_fit(&[1.0, 2.0, 3.0])
        .bounds(Bounds::named([
            ("mu", (0.0, 20.0)),
            ("bogus", (0.0, 1.0)),
            ("loc", (0.0, 0.0)),
        ]))
        .guess(Guess::named([("mu", -5.0)]))
        .optimizer(DifferentialEvolution::with_seed(1))
        .run()
        .unwrap();

    let kinds: Vec<_> = result.warnings.iter().map(|w| w.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::UnrecognizedBound));
    assert!(kinds.contains(&DiagnosticKind::GuessClipped));
}
