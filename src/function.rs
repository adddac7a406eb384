//! High-level handle on a parsed single-variable function.
//!
//! `Function` keeps the formula text next to its expression tree and exposes every
//! operation of the crate behind a single error type, [`CalcError`]. It is what the
//! command line tool works with.
//!
//! # Example
//!
//! ```
//! use symcalc::Function;
//!
//! let f = Function::new("^(x,3)").unwrap();
//! assert_eq!(f.eval(2.0).unwrap(), 8.0);
//!
//! let df = f.derivative();
//! assert_eq!(df.infix(), "(3 * (x ^ 2))");
//! assert_eq!(df.eval(2.0).unwrap(), 12.0);
//! ```

use colored::Colorize;

use crate::backends::vector::Vector;
use crate::errors::{CalcError, EvalError};
use crate::eval::{RiemannSum, Value};
use crate::expr::Expr;
use crate::parser::parse;
use crate::solver::fit_polynomial_str;
use crate::taylor::{taylor_analytical, taylor_numerical, TaylorOptions};

/// A single-variable function together with the formula it was read from.
///
/// Functions produced by transformations (derivative, simplification, series, fit)
/// carry the prefix formula of their new tree, so that every `Function` can be
/// written back out and read again.
#[derive(Clone, PartialEq)]
pub struct Function {
    formula: String,
    expr: Expr,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{\n")?;
        writeln!(f, "    {}: {}\n", "Formula".cyan(), self.formula)?;
        writeln!(f, "    {}: {}\n", "Infix".cyan(), self.expr)?;
        writeln!(f, "    {}: {}\n", "Nodes".cyan(), self.expr.node_count())?;
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", "f(x)".cyan(), self.expr)
    }
}

impl Function {
    /// Parses a prefix-notation formula.
    ///
    /// # Errors
    /// Returns `CalcError::Parse` if the formula is empty or malformed.
    pub fn new(formula: impl Into<String>) -> Result<Self, CalcError> {
        let formula = formula.into();
        let expr = parse(&formula)?;
        Ok(Self { formula, expr })
    }

    /// Wraps an existing tree, rendering its formula.
    pub fn from_expr(expr: Expr) -> Self {
        Self {
            formula: expr.to_formula(),
            expr,
        }
    }

    /// Fits the interpolating polynomial through a `"x,y;x,y;..."` point list.
    pub fn fit(points: &str) -> Result<Self, CalcError> {
        Ok(Self::from_expr(fit_polynomial_str(points)?))
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Infix rendering of the tree, e.g. `(x + 1)`.
    pub fn infix(&self) -> String {
        self.expr.to_string()
    }

    /// Evaluates the function at a single point.
    pub fn eval(&self, x: f64) -> Result<f64, CalcError> {
        self.expr
            .eval(x)
            .map_err(|e| CalcError::Eval(EvalError::from(e)))
    }

    /// Evaluates at a scalar or a vector of samples; see [`Expr::evaluate`].
    pub fn evaluate(&self, input: &Value) -> Result<Value, CalcError> {
        Ok(self.expr.evaluate(input)?)
    }

    /// Evaluates over any [`Vector`] backend; out-of-domain samples are NaN.
    pub fn eval_samples<V: Vector>(&self, xs: &V) -> V {
        self.expr.eval_samples(xs)
    }

    /// Symbolic derivative, simplified once.
    pub fn derivative(&self) -> Function {
        Self::from_expr(self.expr.analytical_derivative().simplify())
    }

    /// Forward-difference derivative at a scalar or a vector of samples.
    pub fn newton_derivative(&self, input: &Value, h: f64) -> Result<Value, CalcError> {
        Ok(self.expr.newton_derivative(input, h)?)
    }

    pub fn simplify(&self) -> Function {
        Self::from_expr(self.expr.simplify())
    }

    /// Left Riemann sum over `[x1, x2)`.
    pub fn integrate(&self, x1: f64, x2: f64, step: f64) -> Result<RiemannSum, CalcError> {
        Ok(self.expr.riemann_integral(x1, x2, step)?)
    }

    /// Taylor polynomial built by symbolic differentiation.
    pub fn taylor(&self, options: &TaylorOptions) -> Result<Function, CalcError> {
        Ok(Self::from_expr(taylor_analytical(&self.expr, options)?))
    }

    /// Taylor polynomial from finite differences, evaluated at `input`.
    pub fn taylor_numerical(
        &self,
        input: &Value,
        options: &TaylorOptions,
    ) -> Result<Value, CalcError> {
        Ok(taylor_numerical(&self.expr, input, options)?)
    }
}

impl From<Expr> for Function {
    fn from(expr: Expr) -> Self {
        Self::from_expr(expr)
    }
}
