use std::{
    error::Error,
    fmt::{self, Display},
};

/// The result type used across the regression crates.
pub type Result<T> = std::result::Result<T, RegressionErr>;

/// Errors produced while building, training or evaluating a linear regression.
#[derive(Debug)]
pub enum RegressionErr {
    /// An input has no rows, no columns, or nothing has been accumulated yet.
    EmptyInput { what: &'static str },
    /// A shape invariant was violated.
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// An identifier value with no corresponding slot.
    UnknownId { kind: &'static str, value: i32 },
    /// A requested slot has never been set.
    MissingSlot { kind: &'static str, value: i32 },
    /// Two partial models computed with different methods.
    MethodMismatch {
        got: &'static str,
        expected: &'static str,
    },
    /// Two partial models disagree on the intercept term.
    InterceptMismatch,
    /// The cross product matrix can't be Cholesky factorized.
    NotPositiveDefinite { column: usize },
    /// The triangular factor has a (numerically) zero pivot.
    SingularMatrix { column: usize },
    /// An input contains NaN or infinite values.
    NonFinite { what: &'static str },
    /// The compute runtime couldn't be initialized.
    Runtime(String),
}

impl Display for RegressionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionErr::EmptyInput { what } => write!(f, "{what} is empty"),
            RegressionErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "size mismatch for {what}: got {got}, expected {expected}"
            ),
            RegressionErr::UnknownId { kind, value } => {
                write!(f, "{value} is not a valid {kind} identifier")
            }
            RegressionErr::MissingSlot { kind, value } => {
                write!(f, "the {kind} with identifier {value} has not been set")
            }
            RegressionErr::MethodMismatch { got, expected } => write!(
                f,
                "partial models were computed with different methods, got {got} and expected {expected}"
            ),
            RegressionErr::InterceptMismatch => {
                f.write_str("partial models disagree on the intercept term")
            }
            RegressionErr::NotPositiveDefinite { column } => write!(
                f,
                "the cross product matrix is not positive definite (failed at column {column})"
            ),
            RegressionErr::SingularMatrix { column } => write!(
                f,
                "the triangular factor is singular (zero pivot at column {column})"
            ),
            RegressionErr::NonFinite { what } => {
                write!(f, "{what} contains NaN or infinite values")
            }
            RegressionErr::Runtime(msg) => write!(f, "runtime initialization failed: {msg}"),
        }
    }
}

impl Error for RegressionErr {}
