//! Taylor series of an expression around an expansion point.
//!
//! Two constructions are available:
//!
//! - [`taylor_analytical`] differentiates symbolically and returns the series as a new
//!   expression tree, `f(a) + sum_i f^(i)(a) / i! * (x - a)^i`.
//! - [`taylor_numerical`] estimates the derivatives at `a` with central finite
//!   differences and evaluates the resulting polynomial directly at the given samples.
//!
//! Both agree up to finite-difference error for smooth functions.

use tracing::{debug, trace};

use crate::errors::EvalError;
use crate::eval::Value;
use crate::expr::Expr;
use crate::operators::factorial::factorial;

/// Default number of terms after the constant one.
pub const DEFAULT_ORDER: usize = 8;

/// Parameters of a Taylor expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaylorOptions {
    /// Highest derivative order included in the series
    pub order: usize,
    /// Expansion point `a`
    pub point: f64,
    /// Fixed finite-difference step for the numerical series; `None` picks a step per order
    pub step: Option<f64>,
}

impl Default for TaylorOptions {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            point: 0.0,
            step: None,
        }
    }
}

impl TaylorOptions {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn at(mut self, point: f64) -> Self {
        self.point = point;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

/// Builds the Taylor polynomial of `expr` as an expression tree.
///
/// Derivatives are taken with [`Expr::analytical_derivative`], simplified after each
/// step and evaluated at the expansion point. Term i is
/// `(f^(i)(a) / i!) * (x - a)^i` with the factorial left symbolic; the full series is
/// simplified once. Order 0 yields the constant `f(a)`.
///
/// # Errors
/// Returns `EvalError::Domain` if the function or one of its derivatives is undefined
/// at the expansion point.
///
/// # Example
/// ```
/// use symcalc::prelude::*;
///
/// let series = taylor_analytical(&parse("e(x)").unwrap(), &TaylorOptions::new(10)).unwrap();
/// assert!((series.eval(1.0).unwrap() - std::f64::consts::E).abs() < 1e-6);
/// ```
pub fn taylor_analytical(expr: &Expr, options: &TaylorOptions) -> Result<Expr, EvalError> {
    let a = options.point;
    debug!(order = options.order, point = a, "building analytical Taylor series");

    let constant = expr.eval(a)?;
    let mut derivative = expr.clone();
    let mut terms = Vec::with_capacity(options.order);
    for n in 1..=options.order {
        derivative = derivative.analytical_derivative().simplify();
        let value = derivative.eval(a)?;
        trace!(order = n, %derivative, value, "derivative at expansion point");
        terms.push(taylor_term(value, n as u64, a));
    }

    Ok(match Expr::sum_all(terms) {
        Some(tail) => Expr::sum(Expr::RealNumber(constant), tail).simplify(),
        None => Expr::RealNumber(constant),
    })
}

fn taylor_term(derivative: f64, n: u64, a: f64) -> Expr {
    Expr::product(
        Expr::quotient(
            Expr::RealNumber(derivative),
            Expr::factorial(Expr::NaturalNumber(n)),
        ),
        Expr::power_natural(Expr::difference(Expr::Variable, Expr::RealNumber(a)), n),
    )
}

/// Finite-difference step used for the n-th derivative when none is configured.
///
/// Balances truncation error, O(h^2), against rounding error, O(eps / h^n), and scales
/// with the magnitude of the expansion point.
pub fn default_step(order: usize, point: f64) -> f64 {
    f64::EPSILON.powf(1.0 / (order as f64 + 2.0)) * point.abs().max(1.0)
}

/// Estimates the Taylor coefficients `f^(n)(a) / n!` for `n = 0..=order`.
///
/// Each derivative is a central n-th difference around `a` rather than `n` nested
/// forward differences ([`Expr::newton_derivative`]). The central stencil is
/// second-order accurate and needs `n + 1` evaluations instead of `2^n`.
///
/// # Errors
/// * `EvalError::Domain` - if the function is undefined at one of the stencil points
/// * `EvalError::InvalidStep` - if a configured step is not positive and finite
pub fn taylor_coefficients_numerical(
    expr: &Expr,
    options: &TaylorOptions,
) -> Result<Vec<f64>, EvalError> {
    let a = options.point;
    (0..=options.order)
        .map(|n| -> Result<f64, EvalError> {
            let h = options.step.unwrap_or_else(|| default_step(n, a));
            let derivative = expr.central_difference(a, n, h)?;
            Ok(derivative / factorial(n as f64)?)
        })
        .collect()
}

/// Evaluates the numerically estimated Taylor polynomial at a scalar or at every sample.
///
/// The polynomial is evaluated with Horner's scheme in powers of `x - a`.
///
/// # Errors
/// See [`taylor_coefficients_numerical`].
pub fn taylor_numerical(
    expr: &Expr,
    input: &Value,
    options: &TaylorOptions,
) -> Result<Value, EvalError> {
    debug!(order = options.order, point = options.point, "building numerical Taylor series");
    let coefficients = taylor_coefficients_numerical(expr, options)?;
    trace!(?coefficients, "numerical Taylor coefficients");

    let a = options.point;
    Ok(input.map(|x| {
        let t = x - a;
        coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use approx::assert_abs_diff_eq;

    fn samples(from: f64, to: f64, count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| from + (to - from) * i as f64 / (count - 1) as f64)
            .collect()
    }

    #[test]
    fn test_default_options() {
        let options = TaylorOptions::default();
        assert_eq!(options.order, DEFAULT_ORDER);
        assert_eq!(options.point, 0.0);
        assert_eq!(options.step, None);

        let options = TaylorOptions::new(3).at(1.5).with_step(0.01);
        assert_eq!(options.order, 3);
        assert_eq!(options.point, 1.5);
        assert_eq!(options.step, Some(0.01));
    }

    #[test]
    fn test_analytical_sine() {
        let series = taylor_analytical(&Expr::sin(Expr::Variable), &TaylorOptions::new(7)).unwrap();
        for x in samples(-1.0, 1.0, 9) {
            assert_abs_diff_eq!(series.eval(x).unwrap(), x.sin(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_analytical_polynomial_is_exact() {
        let cubic = Expr::power_natural(Expr::Variable, 3);
        let series = taylor_analytical(&cubic, &TaylorOptions::new(3).at(1.0)).unwrap();
        assert_abs_diff_eq!(series.eval(2.0).unwrap(), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(series.eval(-1.5).unwrap(), -3.375, epsilon = 1e-12);
    }

    #[test]
    fn test_order_zero() {
        let expr = Expr::exp(Expr::Variable);
        let series = taylor_analytical(&expr, &TaylorOptions::new(0).at(1.0)).unwrap();
        assert!(matches!(series, Expr::RealNumber(_)));
        assert_abs_diff_eq!(series.eval(0.0).unwrap(), std::f64::consts::E, epsilon = 1e-12);

        let value = taylor_numerical(&expr, &Value::Scalar(5.0), &TaylorOptions::new(0)).unwrap();
        assert_eq!(value, Value::Scalar(1.0));
    }

    #[test]
    fn test_analytical_matches_numerical() {
        let sine = Expr::sin(Expr::Variable);
        let options = TaylorOptions::new(6);
        let analytical = taylor_analytical(&sine, &options).unwrap();
        let xs = samples(-1.0, 1.0, 21);
        let numerical = taylor_numerical(&sine, &Value::Vector(xs.clone()), &options).unwrap();
        for (x, y) in xs.iter().zip(numerical.as_slice()) {
            assert_abs_diff_eq!(analytical.eval(*x).unwrap(), *y, epsilon = 1e-3);
        }

        let exp = Expr::exp(Expr::Variable);
        let options = TaylorOptions::new(5).at(0.5);
        let analytical = taylor_analytical(&exp, &options).unwrap();
        let xs = samples(0.0, 1.0, 5);
        let numerical = taylor_numerical(&exp, &Value::Vector(xs.clone()), &options).unwrap();
        for (x, y) in xs.iter().zip(numerical.as_slice()) {
            assert_abs_diff_eq!(analytical.eval(*x).unwrap(), *y, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_numerical_coefficients() {
        let coefficients = taylor_coefficients_numerical(
            &Expr::exp(Expr::Variable),
            &TaylorOptions::new(4),
        )
        .unwrap();
        let expected = [1.0, 1.0, 0.5, 1.0 / 6.0, 1.0 / 24.0];
        assert_eq!(coefficients.len(), expected.len());
        for (c, e) in coefficients.iter().zip(expected) {
            assert_abs_diff_eq!(*c, e, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_numerical_coefficients_use_central_stencil() {
        // a forward difference would give 0.5 for the linear term of x^2 at 0
        let square = Expr::power_natural(Expr::Variable, 2);
        let options = TaylorOptions::new(2).with_step(0.5);
        let coefficients = taylor_coefficients_numerical(&square, &options).unwrap();
        assert_eq!(coefficients, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_domain_error_at_point() {
        let ln = Expr::ln(Expr::Variable);
        assert_eq!(
            taylor_analytical(&ln, &TaylorOptions::new(3)),
            Err(EvalError::Domain(DomainError::Logarithm { value: 0.0 }))
        );
        assert!(taylor_numerical(&ln, &Value::Scalar(1.0), &TaylorOptions::new(3)).is_err());
        assert!(taylor_analytical(&ln, &TaylorOptions::new(3).at(1.0)).is_ok());
    }

    #[test]
    fn test_invalid_step() {
        let options = TaylorOptions::new(2).with_step(0.0);
        assert_eq!(
            taylor_numerical(&Expr::Variable, &Value::Scalar(1.0), &options),
            Err(EvalError::InvalidStep(0.0))
        );
    }
}
