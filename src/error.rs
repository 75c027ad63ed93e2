#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when `data` contains no observations.
    #[error("`data` must contain at least one observation")]
    EmptyData,

    /// Returned when `data` contains a NaN or infinite entry.
    #[error("all elements of `data` must be finite numbers; element {index} is {value}")]
    NonFiniteData {
        /// Index of the offending element.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a distribution descriptor violates its own contract.
    #[error("unsupported distribution descriptor: {reason}")]
    InvalidDistribution {
        /// Why the descriptor was rejected.
        reason: String,
    },

    /// Returned when an ordered `bounds` sequence has the wrong length.
    #[error(
        "a `bounds` sequence must contain at least {min} and at most {max} elements, got {got}"
    )]
    BoundsLength {
        /// Minimum accepted length (the number of shape parameters).
        min: usize,
        /// Maximum accepted length (the full parameter count).
        max: usize,
        /// The length that was provided.
        got: usize,
    },

    /// Returned when a bound endpoint is NaN.
    #[error("the bounds for `{name}` must be finite numbers or infinities, not NaN")]
    MalformedBound {
        /// Name of the parameter with the NaN endpoint.
        name: String,
    },

    /// Returned when domain ∩ user bounds is empty for a parameter.
    #[error("there are no values for `{name}` on the interval [{low}, {high}]")]
    EmptyBounds {
        /// Name of the parameter whose intersection is empty.
        name: String,
        /// Lower endpoint of the intersection attempt.
        low: f64,
        /// Upper endpoint of the intersection attempt.
        high: f64,
    },

    /// Returned when an integer-constrained interval contains no integer.
    #[error("there are no integer values for `{name}` on the interval [{low}, {high}]")]
    NoIntegerValues {
        /// Name of the integer-constrained parameter.
        name: String,
        /// Lower endpoint of the intersection.
        low: f64,
        /// Upper endpoint of the intersection.
        high: f64,
    },

    /// Returned when a free parameter has no finite search interval and no
    /// anchor (bound or guess) to derive one from.
    #[error(
        "the intersection of the domain of `{name}` and the given bounds is not finite; \
         provide finite bounds or a guess for `{name}`"
    )]
    UnboundedParameter {
        /// Name of the unanchored parameter.
        name: String,
    },

    /// Returned when an ordered `guess` sequence has the wrong length.
    #[error("a `guess` sequence must contain at least {min} and at most {max} elements, got {got}")]
    GuessLength {
        /// Minimum accepted length (the number of shape parameters).
        min: usize,
        /// Maximum accepted length (the full parameter count).
        max: usize,
        /// The length that was provided.
        got: usize,
    },

    /// Returned when a guess value is NaN or infinite.
    #[error("the guess for `{name}` must be a finite number, got {value}")]
    NonFiniteGuess {
        /// Name of the parameter with the non-finite guess.
        name: String,
        /// The offending value.
        value: f64,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
