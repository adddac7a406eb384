//! Numeric evaluation of expression trees.
//!
//! Expressions can be evaluated in two ways:
//!
//! - Scalar evaluation ([`Expr::eval`]) is strict: the first domain violation
//!   (division by zero, logarithm of a non-positive value, factorial of a non-natural
//!   value, or a power without a real result) aborts with a [`DomainError`].
//! - Vectorized evaluation ([`Expr::evaluate`] with a [`Value::Vector`],
//!   [`Expr::eval_samples`] and [`Expr::eval_samples_parallel`]) never fails: a sample
//!   whose computation leaves the domain of an operator becomes NaN while the other
//!   samples are unaffected.
//!
//! Wherever scalar evaluation succeeds, the vectorized result at the same sample is
//! identical, since both walk the tree with the same operator kernels.
//!
//! The module also provides the numeric calculus built on evaluation: forward,
//! backward and central finite differences, the central n-th difference used by the
//! numerical Taylor series, and a left Riemann sum.

use std::f64::consts::PI;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::backends::vector::Vector;
use crate::errors::{DomainError, EvalError};
use crate::expr::Expr;
use crate::operators::{factorial, ln, pow, quotient};

/// Default step for the forward-difference ("Newton") derivative.
pub const DEFAULT_STEP: f64 = 0.001;

/// Largest number of samples a single Riemann sum may take.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Input or output of an evaluation: a single point or a list of samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    /// Number of samples; 1 for a scalar.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Vector(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(value) => Some(*value),
            Value::Vector(_) => None,
        }
    }

    /// Views the samples as a slice; a scalar is a slice of length one.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Value::Scalar(value) => std::slice::from_ref(value),
            Value::Vector(values) => values,
        }
    }

    /// Applies `f` to every sample, preserving the shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(value) => Value::Scalar(f(*value)),
            Value::Vector(values) => Value::Vector(values.iter().map(|v| f(*v)).collect()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Vector(values)
    }
}

impl From<&[f64]> for Value {
    fn from(values: &[f64]) -> Self {
        Value::Vector(values.to_vec())
    }
}

/// Finite-difference scheme used by [`Expr::finite_difference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// (f(x + h) - f(x)) / h
    #[default]
    Forward,
    /// (f(x) - f(x - h)) / h
    Backward,
    /// (f(x + h) - f(x - h)) / 2h
    Central,
}

/// Result of a left Riemann sum: the sample grid, the sampled values and the area.
#[derive(Debug, Clone, PartialEq)]
pub struct RiemannSum {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub area: f64,
}

impl Expr {
    /// Evaluates the expression at a single point.
    ///
    /// # Errors
    /// Returns the first [`DomainError`] raised by any operator in the tree.
    ///
    /// # Example
    /// ```
    /// use symcalc::prelude::*;
    ///
    /// let expr = parse("+(*(2,x),1)").unwrap();
    /// assert_eq!(expr.eval(3.0), Ok(7.0));
    /// assert!(parse("l(x)").unwrap().eval(0.0).is_err());
    /// ```
    pub fn eval(&self, x: f64) -> Result<f64, DomainError> {
        Ok(match self {
            Expr::NaturalNumber(n) => *n as f64,
            Expr::RealNumber(v) => *v,
            Expr::Pi => PI,
            Expr::Variable => x,
            Expr::Sum(a, b) => a.eval(x)? + b.eval(x)?,
            Expr::Difference(a, b) => a.eval(x)? - b.eval(x)?,
            Expr::Product(a, b) => a.eval(x)? * b.eval(x)?,
            Expr::Quotient(a, b) => quotient::divide(a.eval(x)?, b.eval(x)?)?,
            Expr::Power(a, b) => pow::pow(a.eval(x)?, b.eval(x)?)?,
            Expr::Sine(a) => a.eval(x)?.sin(),
            Expr::Cosine(a) => a.eval(x)?.cos(),
            Expr::Exponent(a) => a.eval(x)?.exp(),
            Expr::NaturalLog(a) => ln::ln(a.eval(x)?)?,
            Expr::Factorial(a) => factorial::factorial(a.eval(x)?)?,
        })
    }

    /// Evaluates every sample in `xs`, substituting NaN where an operator leaves its domain.
    pub(crate) fn eval_slice(&self, xs: &[f64]) -> Vec<f64> {
        let len = xs.len();
        match self {
            Expr::NaturalNumber(n) => vec![*n as f64; len],
            Expr::RealNumber(v) => vec![*v; len],
            Expr::Pi => vec![PI; len],
            Expr::Variable => xs.to_vec(),
            Expr::Sum(a, b) => zip_with(a.eval_slice(xs), b.eval_slice(xs), |l, r| Ok(l + r)),
            Expr::Difference(a, b) => {
                zip_with(a.eval_slice(xs), b.eval_slice(xs), |l, r| Ok(l - r))
            }
            Expr::Product(a, b) => zip_with(a.eval_slice(xs), b.eval_slice(xs), |l, r| Ok(l * r)),
            Expr::Quotient(a, b) => zip_with(a.eval_slice(xs), b.eval_slice(xs), quotient::divide),
            Expr::Power(a, b) => zip_with(a.eval_slice(xs), b.eval_slice(xs), pow::pow),
            Expr::Sine(a) => map_with(a.eval_slice(xs), |v| Ok(v.sin())),
            Expr::Cosine(a) => map_with(a.eval_slice(xs), |v| Ok(v.cos())),
            Expr::Exponent(a) => map_with(a.eval_slice(xs), |v| Ok(v.exp())),
            Expr::NaturalLog(a) => map_with(a.eval_slice(xs), ln::ln),
            Expr::Factorial(a) => map_with(a.eval_slice(xs), factorial::factorial),
        }
    }

    /// Evaluates the expression at a scalar or at every sample of a vector.
    ///
    /// # Errors
    /// Scalar input propagates domain errors as [`EvalError::Domain`]. Vector input
    /// never fails; out-of-domain samples are NaN.
    pub fn evaluate(&self, input: &Value) -> Result<Value, EvalError> {
        match input {
            Value::Scalar(x) => Ok(Value::Scalar(self.eval(*x)?)),
            Value::Vector(xs) => Ok(Value::Vector(self.eval_slice(xs))),
        }
    }

    /// Evaluates the expression over any [`Vector`] backend, returning the same backend type.
    ///
    /// # Example
    /// ```
    /// use symcalc::prelude::*;
    ///
    /// let expr = parse("!(x)").unwrap();
    /// let ys = expr.eval_samples(&vec![0.0, 3.0, -1.0]);
    /// assert_eq!(&ys[..2], &[1.0, 6.0]);
    /// assert!(ys[2].is_nan());
    /// ```
    pub fn eval_samples<V: Vector>(&self, xs: &V) -> V {
        V::from_samples(self.eval_slice(&xs.samples()))
    }

    /// Evaluates a large sample set in parallel using rayon.
    ///
    /// The samples are split into chunks, roughly four per available thread, and the
    /// results are concatenated in input order.
    pub fn eval_samples_parallel(&self, xs: &[f64]) -> Vec<f64> {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);

        let chunk_size = (xs.len() / (num_threads * 4)).max(1);
        trace!(samples = xs.len(), chunk_size, "parallel evaluation");

        xs.par_chunks(chunk_size)
            .flat_map_iter(|chunk| self.eval_slice(chunk))
            .collect()
    }

    /// Forward-difference derivative `(f(x + h) - f(x)) / h` at a scalar or every sample.
    ///
    /// # Arguments
    /// * `input` - Point or samples at which to differentiate
    /// * `h` - Step size, usually [`DEFAULT_STEP`]
    ///
    /// # Errors
    /// * `EvalError::InvalidStep` - if `h` is not a positive finite number
    /// * `EvalError::Domain` - for scalar input where f(x) or f(x + h) is undefined
    pub fn newton_derivative(&self, input: &Value, h: f64) -> Result<Value, EvalError> {
        check_step(h)?;
        match input {
            Value::Scalar(x) => Ok(Value::Scalar(self.finite_difference(
                *x,
                h,
                Scheme::Forward,
            )?)),
            Value::Vector(xs) => {
                let shifted: Vec<f64> = xs.iter().map(|x| x + h).collect();
                let ahead = self.eval_slice(&shifted);
                let here = self.eval_slice(xs);
                Ok(Value::Vector(
                    ahead
                        .into_iter()
                        .zip(here)
                        .map(|(a, b)| (a - b) / h)
                        .collect(),
                ))
            }
        }
    }

    /// First derivative at `x` using the given finite-difference scheme.
    pub fn finite_difference(&self, x: f64, h: f64, scheme: Scheme) -> Result<f64, EvalError> {
        check_step(h)?;
        let (upper, lower, width) = match scheme {
            Scheme::Forward => (x + h, x, h),
            Scheme::Backward => (x, x - h, h),
            Scheme::Central => (x + h, x - h, 2.0 * h),
        };
        Ok((self.eval(upper)? - self.eval(lower)?) / width)
    }

    /// n-th derivative at `a` by the central difference
    /// `sum_k (-1)^k C(n, k) f(a + (n/2 - k) h) / h^n`.
    ///
    /// Order 0 is f(a) itself. The truncation error is O(h^2) but rounding error grows
    /// like eps / h^n, so higher orders need larger steps.
    pub fn central_difference(&self, a: f64, order: usize, h: f64) -> Result<f64, EvalError> {
        check_step(h)?;
        let n = order as f64;
        let mut binomial = 1.0;
        let mut total = 0.0;
        for k in 0..=order {
            let k_f = k as f64;
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            total += sign * binomial * self.eval(a + (n / 2.0 - k_f) * h)?;
            binomial = binomial * (n - k_f) / (k_f + 1.0);
        }
        Ok(total / h.powi(order as i32))
    }

    /// Left Riemann sum of the expression over `[x1, x2)`.
    ///
    /// Samples `x1, x1 + step, ...` strictly below `x2` (`ceil((x2 - x1) / step)` of them)
    /// and returns them with their values and `sum(ys) * step`. Out-of-domain samples
    /// are NaN and make the area NaN.
    ///
    /// # Errors
    /// Returns `EvalError::InvalidInterval` unless both bounds are finite, `x2 > x1`,
    /// `step` is positive and finite, and the interval needs at most [`MAX_SAMPLES`] samples.
    pub fn riemann_integral(&self, x1: f64, x2: f64, step: f64) -> Result<RiemannSum, EvalError> {
        let valid = x1.is_finite() && x2.is_finite() && x2 > x1 && step.is_finite() && step > 0.0;
        let samples = ((x2 - x1) / step).ceil();
        if !valid || samples > MAX_SAMPLES as f64 {
            return Err(EvalError::InvalidInterval {
                start: x1,
                end: x2,
                step,
            });
        }

        let count = samples as usize;
        let xs: Vec<f64> = (0..count).map(|i| x1 + i as f64 * step).collect();
        let ys = self.eval_slice(&xs);
        let area = ys.iter().sum::<f64>() * step;
        debug!(samples = count, area, "riemann sum");

        Ok(RiemannSum { xs, ys, area })
    }
}

fn check_step(h: f64) -> Result<(), EvalError> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(EvalError::InvalidStep(h))
    }
}

/// Applies a unary kernel in place; samples outside its domain become NaN.
fn map_with(mut values: Vec<f64>, op: impl Fn(f64) -> Result<f64, DomainError>) -> Vec<f64> {
    for value in values.iter_mut() {
        *value = op(*value).unwrap_or(f64::NAN);
    }
    values
}

/// Applies a binary kernel pairwise, writing into `left`; failures become NaN.
fn zip_with(
    mut left: Vec<f64>,
    right: Vec<f64>,
    op: impl Fn(f64, f64) -> Result<f64, DomainError>,
) -> Vec<f64> {
    for (l, r) in left.iter_mut().zip(right) {
        *l = op(*l, r).unwrap_or(f64::NAN);
    }
    left
}
