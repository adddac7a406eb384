//! Error types for the symcalc crate.
//!
//! This module defines the error types that can occur while parsing formulas,
//! building expression trees, evaluating them and fitting polynomials. The main
//! error types are:
//!
//! - `ParseError`: Malformed or empty formula text
//! - `ExprError`: Invalid construction of an expression node
//! - `EvalError`: Failures during numeric evaluation, differentiation or integration
//! - `SolveError`: Failures during Gaussian elimination and polynomial fitting
//! - `CalcError`: High-level error wrapping all of the above
//!
//! Each error type implements the standard Error trait and provides detailed error messages.

use thiserror::Error;

/// Errors that can occur while reading a prefix-notation formula.
///
/// The parser does not recover: the first error aborts the whole parse and the
/// caller is expected to discard the attempt.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The formula is empty or consists only of whitespace
    #[error("formula is empty")]
    Empty,
    /// The formula ended while an operand was still expected
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    /// The character does not start any production of the grammar
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },
    /// A required delimiter was not found before the end of the formula
    #[error("expected '{expected}' after position {position}")]
    MissingDelimiter { expected: char, position: usize },
    /// A numeric literal could not be converted into a number
    #[error("invalid number literal: {text}")]
    InvalidNumber { text: String },
    /// Operators are nested deeper than the reader allows
    #[error("formula nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Errors that can occur when constructing expression nodes directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Error when a `Power` node is built with an exponent that is not a natural number
    #[error("exponent must be a natural number, got {0}")]
    InvalidExponent(String),
}

/// Numeric domain violations raised by scalar evaluation.
///
/// Vectorized evaluation never reports these; the offending sample becomes NaN instead.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    /// Division by an exact zero
    #[error("division by zero")]
    DivisionByZero,
    /// Natural logarithm of a non-positive value
    #[error("logarithm of non-positive value {value}")]
    Logarithm { value: f64 },
    /// Factorial of a negative or non-integer value
    #[error("factorial of non-natural value {value}")]
    Factorial { value: f64 },
    /// Power without a real result (negative base with fractional exponent, or zero to a negative power)
    #[error("power {base} ^ {exponent} has no real value")]
    Power { base: f64, exponent: f64 },
}

/// Errors that can occur while evaluating, differentiating or integrating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A scalar evaluation left the domain of one of the operators
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    /// The integration interval or sampling step is unusable
    #[error("invalid interval [{start}, {end}) with step {step}")]
    InvalidInterval { start: f64, end: f64, step: f64 },
    /// The finite-difference step is zero, negative or not finite
    #[error("invalid finite-difference step {0}")]
    InvalidStep(f64),
}

/// Errors that can occur during Gaussian elimination and polynomial fitting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The best available pivot in a column is exactly zero
    #[error("matrix is singular (zero pivot in column {column})")]
    SingularMatrix { column: usize },
    /// The matrix is not an augmented square system
    #[error("invalid matrix shape: expected k x (k + 1), got {rows} x {cols}")]
    InvalidShape { rows: usize, cols: usize },
    /// No sample points were supplied
    #[error("at least one point is required")]
    NoPoints,
    /// A point in the textual point list could not be read
    #[error("malformed point #{index}: '{text}'")]
    MalformedPoint { index: usize, text: String },
}

/// High-level errors that can occur when working with functions.
///
/// This enum wraps the lower-level errors from parsing, evaluation and solving so
/// that callers working through [`crate::function::Function`] or the command line
/// can use a single error type.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Error when reading the formula text
    #[error("Failed to parse formula")]
    Parse(#[from] ParseError),
    /// Error when building an expression node
    #[error("Failed to build expression")]
    Expr(#[from] ExprError),
    /// Error when evaluating the expression
    #[error("Failed to evaluate expression")]
    Eval(#[from] EvalError),
    /// Error when solving the linear system of a polynomial fit
    #[error("Failed to fit polynomial")]
    Solve(#[from] SolveError),
}
