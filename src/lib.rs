//! Single-variable symbolic calculus.
//!
//! This crate reads functions of one real variable `x` written in a compact prefix
//! notation, and provides symbolic differentiation, algebraic simplification, numeric
//! evaluation, finite-difference derivatives, Riemann integration, Taylor series and
//! polynomial interpolation on top of a shared expression tree.
//!
//! # Features
//!
//! - Prefix-notation parser (`+(x,1)`, `s(*(p,x))`, `!(x)`)
//! - Symbolic differentiation with sum, product, quotient, power and chain rules
//! - Single-pass simplification with constant folding
//! - Strict scalar evaluation and NaN-propagating vectorized evaluation
//! - Analytical and numerical Taylor series
//! - Polynomial fitting through Gaussian elimination with partial pivoting
//! - Optional `ndarray` and `nalgebra` sample and matrix backends
//!
//! # Example
//!
//! ```rust
//! use symcalc::prelude::*;
//!
//! // Parse sin(x) * x
//! let expr = parse("*(s(x),x)").unwrap();
//!
//! // Differentiate and simplify: cos(x) * x + sin(x)
//! let derivative = expr.analytical_derivative().simplify();
//! assert_eq!(derivative.to_string(), "((cos(x) * x) + sin(x))");
//!
//! // Evaluate at a point and over samples
//! assert_eq!(derivative.eval(0.0).unwrap(), 0.0);
//! let ys = derivative.eval_samples(&vec![0.0, 1.0]);
//! assert_eq!(ys.len(), 2);
//! ```

pub use function::Function;

pub mod prelude {
    pub use crate::backends::matrix::Matrix;
    pub use crate::backends::vector::Vector;
    pub use crate::errors::{CalcError, DomainError, EvalError, ExprError, ParseError, SolveError};
    pub use crate::eval::{RiemannSum, Scheme, Value, DEFAULT_STEP, MAX_SAMPLES};
    pub use crate::expr::Expr;
    pub use crate::function::Function;
    pub use crate::parser::{parse, MAX_DEPTH};
    pub use crate::solver::{
        fit_polynomial, fit_polynomial_str, gaussian_elimination, parse_points, AugmentedMatrix,
    };
    pub use crate::taylor::{
        taylor_analytical, taylor_numerical, TaylorOptions, DEFAULT_ORDER,
    };
    pub use crate::types::Point;
}

/// Sample and matrix containers the algorithms are generic over
pub mod backends {
    pub mod matrix;
    pub mod vector;
}
/// Error types for the various failure modes
pub mod errors;
/// Numeric evaluation, finite differences and integration
pub mod eval;
/// Expression tree representation, differentiation and simplification
pub mod expr;
/// High-level function handle
pub mod function;
/// Prefix-notation formula reader
pub mod parser;
/// Gaussian elimination and polynomial fitting
pub mod solver;
/// Analytical and numerical Taylor series
pub mod taylor;
/// Shared type aliases
pub mod types;
/// Domain-checked scalar kernels shared by evaluation and constant folding
pub(crate) mod operators {
    pub(crate) mod factorial;
    pub(crate) mod ln;
    pub(crate) mod pow;
    pub(crate) mod quotient;
}

#[cfg(test)]
mod proptests;
