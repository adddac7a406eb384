//! Expression module for representing single-variable real functions.
//!
//! This module defines the core expression type used by every algorithm in the crate.
//! The expression tree is built recursively using `Arc<Expr>` for nested expressions.
//! Nodes are never mutated after construction, so a subtree can be shared between
//! several trees (a derivative reuses the factors of the product it came from, for
//! example) without any copying.
//!
//! # Expression Tree Structure
//! The expression tree is built recursively with each node being one of:
//! - Leaf nodes: natural numbers, real numbers, π and the variable `x`
//! - Binary operations: Sum, Difference, Product, Quotient, Power
//! - Unary operations: Sine, Cosine, Exponent (e^f), NaturalLog, Factorial
//!
//! # Symbolic Differentiation
//! The `analytical_derivative` method implements symbolic differentiation by recursively
//! applying calculus rules like:
//! - Sum and difference rules
//! - Product rule
//! - Quotient rule
//! - Power rule (natural, constant and general exponents)
//! - Chain rule for sin, cos, exp and ln
//!
//! # Expression Simplification
//! The `simplify` method performs a single bottom-up pass of:
//! - Constant folding (e.g. 2 + 3 → 5)
//! - Identity rules (e.g. x + 0 → x, x * 1 → x)
//! - Annihilator rules (e.g. x * 0 → 0)
//! - Exponent rules (e.g. x^0 → 1, x^1 → x)
//! - Special function simplifications (e.g. sin(0) → 0, e^ln(f) → f)
//!
//! # Rendering
//! `Display` produces the fully parenthesized infix form (`(x + 1)`, `sin(x)`, `x!`),
//! while [`Expr::to_formula`] produces the prefix notation accepted by
//! [`crate::parser::parse`].

use std::fmt::{self, Write as _};
use std::sync::Arc;

use crate::errors::{DomainError, ExprError};
use crate::operators;
use crate::types::Node;

/// An expression tree node representing a function of the single variable `x`.
///
/// The set of variants is closed; every algorithm in this crate is an exhaustive
/// `match` over it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A non-negative integer constant
    NaturalNumber(u64),
    /// A floating point constant
    RealNumber(f64),
    /// The constant π
    Pi,
    /// The variable `x`
    Variable,
    /// Addition of two expressions
    Sum(Node, Node),
    /// Subtraction of two expressions
    Difference(Node, Node),
    /// Multiplication of two expressions
    Product(Node, Node),
    /// Division of two expressions
    Quotient(Node, Node),
    /// Exponentiation of a base by an exponent
    Power(Node, Node),
    /// Sine of an expression (argument in radians)
    Sine(Node),
    /// Cosine of an expression (argument in radians)
    Cosine(Node),
    /// Natural exponential e^f of an expression
    Exponent(Node),
    /// Natural logarithm of an expression
    NaturalLog(Node),
    /// Factorial of an expression, defined for natural numbers only
    Factorial(Node),
}

impl Expr {
    pub fn natural(n: u64) -> Self {
        Expr::NaturalNumber(n)
    }

    pub fn real(value: f64) -> Self {
        Expr::RealNumber(value)
    }

    pub fn sum(left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Expr::Sum(left.into(), right.into())
    }

    pub fn difference(left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Expr::Difference(left.into(), right.into())
    }

    pub fn product(left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Expr::Product(left.into(), right.into())
    }

    pub fn quotient(left: impl Into<Node>, right: impl Into<Node>) -> Self {
        Expr::Quotient(left.into(), right.into())
    }

    /// Builds a `Power` node, enforcing a natural-number exponent.
    ///
    /// # Errors
    /// Returns `ExprError::InvalidExponent` when `exponent` is not a `NaturalNumber`.
    pub fn power(base: impl Into<Node>, exponent: impl Into<Node>) -> Result<Self, ExprError> {
        let exponent = exponent.into();
        if matches!(*exponent, Expr::NaturalNumber(_)) {
            Ok(Expr::Power(base.into(), exponent))
        } else {
            Err(ExprError::InvalidExponent(exponent.to_string()))
        }
    }

    /// Builds a `Power` node with a natural exponent. Never fails.
    pub fn power_natural(base: impl Into<Node>, exponent: u64) -> Self {
        Expr::Power(base.into(), Arc::new(Expr::NaturalNumber(exponent)))
    }

    /// Builds a `Power` node with an arbitrary exponent expression.
    ///
    /// This is the generalized power used by the parser; its derivative falls back
    /// to the general rule `f^g * (g' * ln(f) + g * f'/f)` when `g` is not a constant.
    pub fn power_unchecked(base: impl Into<Node>, exponent: impl Into<Node>) -> Self {
        Expr::Power(base.into(), exponent.into())
    }

    pub fn sin(arg: impl Into<Node>) -> Self {
        Expr::Sine(arg.into())
    }

    pub fn cos(arg: impl Into<Node>) -> Self {
        Expr::Cosine(arg.into())
    }

    pub fn exp(arg: impl Into<Node>) -> Self {
        Expr::Exponent(arg.into())
    }

    pub fn ln(arg: impl Into<Node>) -> Self {
        Expr::NaturalLog(arg.into())
    }

    pub fn factorial(arg: impl Into<Node>) -> Self {
        Expr::Factorial(arg.into())
    }

    /// Folds a list of terms into a right-nested sum: `t0 + (t1 + (t2 + ...))`.
    ///
    /// Returns `None` for an empty list.
    pub fn sum_all(terms: impl IntoIterator<Item = Expr>) -> Option<Expr> {
        let mut terms: Vec<Expr> = terms.into_iter().collect();
        let last = terms.pop()?;
        Some(
            terms
                .into_iter()
                .rev()
                .fold(last, |acc, term| Expr::sum(term, acc)),
        )
    }

    /// Returns the numeric value of a `NaturalNumber` or `RealNumber` leaf.
    pub fn number(&self) -> Option<f64> {
        match self {
            Expr::NaturalNumber(n) => Some(*n as f64),
            Expr::RealNumber(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true for `NaturalNumber` and `RealNumber` leaves (π is not a number leaf).
    pub fn is_number(&self) -> bool {
        self.number().is_some()
    }

    fn has_value(&self, value: f64) -> bool {
        self.number() == Some(value)
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            Expr::NaturalNumber(_) | Expr::RealNumber(_) | Expr::Pi | Expr::Variable => 1,
            Expr::Sum(a, b)
            | Expr::Difference(a, b)
            | Expr::Product(a, b)
            | Expr::Quotient(a, b)
            | Expr::Power(a, b) => 1 + a.node_count() + b.node_count(),
            Expr::Sine(a)
            | Expr::Cosine(a)
            | Expr::Exponent(a)
            | Expr::NaturalLog(a)
            | Expr::Factorial(a) => 1 + a.node_count(),
        }
    }

    /// Returns the height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Expr::NaturalNumber(_) | Expr::RealNumber(_) | Expr::Pi | Expr::Variable => 1,
            Expr::Sum(a, b)
            | Expr::Difference(a, b)
            | Expr::Product(a, b)
            | Expr::Quotient(a, b)
            | Expr::Power(a, b) => 1 + a.depth().max(b.depth()),
            Expr::Sine(a)
            | Expr::Cosine(a)
            | Expr::Exponent(a)
            | Expr::NaturalLog(a)
            | Expr::Factorial(a) => 1 + a.depth(),
        }
    }

    /// Computes the symbolic derivative of this expression with respect to `x`.
    ///
    /// Recursively applies the rules of differentiation to build a new expression tree
    /// representing the derivative. The rules implemented are:
    /// - d/dx(c) = 0 for constants (including π)
    /// - d/dx(x) = 1
    /// - Sum rule: d/dx(f + g) = df/dx + dg/dx
    /// - Difference rule: d/dx(f - g) = df/dx - dg/dx
    /// - Product rule: d/dx(f * g) = df/dx * g + f * dg/dx
    /// - Quotient rule: d/dx(f/g) = (df/dx * g - f * dg/dx) / g^2
    /// - Power rule: d/dx(f^n) = n * f^(n-1) * df/dx for a natural or real constant n
    /// - General power rule: d/dx(f^g) = f^g * (dg/dx * ln(f) + g * df/dx / f)
    /// - Chain rule for sin: d/dx(sin(f)) = cos(f) * df/dx
    /// - Chain rule for cos: d/dx(cos(f)) = (0 - sin(f)) * df/dx
    /// - Chain rule for exp: d/dx(e^f) = e^f * df/dx
    /// - Chain rule for ln: d/dx(ln(f)) = 1/f * df/dx
    /// - d/dx(f!) = 0, factorial is treated as a step function
    ///
    /// The result is not simplified; call [`Expr::simplify`] on it for a compact form.
    pub fn analytical_derivative(&self) -> Expr {
        match self {
            Expr::NaturalNumber(_) | Expr::RealNumber(_) | Expr::Pi => Expr::NaturalNumber(0),

            Expr::Variable => Expr::NaturalNumber(1),

            Expr::Sum(left, right) => {
                // d/dx(f + g) = df/dx + dg/dx
                Expr::sum(left.analytical_derivative(), right.analytical_derivative())
            }

            Expr::Difference(left, right) => {
                // d/dx(f - g) = df/dx - dg/dx
                Expr::difference(left.analytical_derivative(), right.analytical_derivative())
            }

            Expr::Product(left, right) => {
                // d/dx(f * g) = df/dx * g + f * dg/dx
                Expr::sum(
                    Expr::product(left.analytical_derivative(), right.clone()),
                    Expr::product(left.clone(), right.analytical_derivative()),
                )
            }

            Expr::Quotient(left, right) => {
                // d/dx(f/g) = (df/dx * g - f * dg/dx) / g^2
                Expr::quotient(
                    Expr::difference(
                        Expr::product(left.analytical_derivative(), right.clone()),
                        Expr::product(left.clone(), right.analytical_derivative()),
                    ),
                    Expr::power_natural(right.clone(), 2),
                )
            }

            Expr::Power(base, exponent) => match **exponent {
                Expr::NaturalNumber(0) => Expr::NaturalNumber(0),
                Expr::NaturalNumber(n) => {
                    // d/dx(f^n) = n * f^(n-1) * df/dx
                    Expr::product(
                        Expr::product(
                            Expr::NaturalNumber(n),
                            Expr::power_natural(base.clone(), n - 1),
                        ),
                        base.analytical_derivative(),
                    )
                }
                Expr::RealNumber(c) => {
                    // d/dx(f^c) = c * f^(c-1) * df/dx
                    Expr::product(
                        Expr::product(
                            Expr::RealNumber(c),
                            Expr::power_unchecked(base.clone(), Expr::RealNumber(c - 1.0)),
                        ),
                        base.analytical_derivative(),
                    )
                }
                _ => {
                    // d/dx(f^g) = f^g * (g' * ln(f) + g * f'/f)
                    Expr::product(
                        Expr::Power(base.clone(), exponent.clone()),
                        Expr::sum(
                            Expr::product(exponent.analytical_derivative(), Expr::ln(base.clone())),
                            Expr::product(
                                exponent.clone(),
                                Expr::quotient(base.analytical_derivative(), base.clone()),
                            ),
                        ),
                    )
                }
            },

            Expr::Sine(arg) => {
                // d/dx(sin(f)) = cos(f) * df/dx
                Expr::product(Expr::cos(arg.clone()), arg.analytical_derivative())
            }

            Expr::Cosine(arg) => {
                // d/dx(cos(f)) = (0 - sin(f)) * df/dx
                Expr::product(
                    Expr::difference(Expr::NaturalNumber(0), Expr::sin(arg.clone())),
                    arg.analytical_derivative(),
                )
            }

            Expr::Exponent(arg) => {
                // d/dx(e^f) = e^f * df/dx
                Expr::product(Expr::exp(arg.clone()), arg.analytical_derivative())
            }

            Expr::NaturalLog(arg) => {
                // d/dx(ln(f)) = 1/f * df/dx
                Expr::product(
                    Expr::quotient(Expr::NaturalNumber(1), arg.clone()),
                    arg.analytical_derivative(),
                )
            }

            Expr::Factorial(_) => Expr::NaturalNumber(0),
        }
    }

    /// Simplifies the expression by folding constants and applying basic algebraic rules.
    ///
    /// Children are simplified before their parent, in a single pass:
    ///
    /// # Constant Folding
    /// - Binary operations over two number leaves: 2 + 3 → 5, 1 / 4 → 0.25
    /// - The result stays a natural number when it is one (2 * 3 → 6, 1 - 2 → -1.0)
    /// - Folds that leave the real domain (division by zero) keep the node as is
    ///
    /// # Identity and Annihilator Rules
    /// - x + 0 → x, 0 + x → x
    /// - x * 0 → 0, 0 * x → 0
    /// - x * 1 → x, 1 * x → x
    /// - x / 1 → x
    ///
    /// # Exponent Rules
    /// - x^1 → x
    /// - x^0 → 1
    ///
    /// # Special Functions
    /// - sin(0) → 0, cos(0) → 1
    /// - e^0 → 1, e^ln(f) → f
    /// - ln(1) → 0
    ///
    /// # Returns
    /// A new simplified expression tree
    pub fn simplify(&self) -> Expr {
        match self {
            // Base cases - leaves remain unchanged
            Expr::NaturalNumber(_) | Expr::RealNumber(_) | Expr::Pi | Expr::Variable => {
                self.clone()
            }

            Expr::Sum(left, right) => {
                let l = left.simplify();
                let r = right.simplify();
                if let Some(folded) = fold_numbers(&l, &r, u64::checked_add, |a, b| Ok(a + b)) {
                    return folded;
                }
                if l.has_value(0.0) {
                    return r;
                }
                if r.has_value(0.0) {
                    return l;
                }
                Expr::sum(l, r)
            }

            Expr::Difference(left, right) => {
                let l = left.simplify();
                let r = right.simplify();
                fold_numbers(&l, &r, u64::checked_sub, |a, b| Ok(a - b))
                    .unwrap_or_else(|| Expr::difference(l, r))
            }

            Expr::Product(left, right) => {
                let l = left.simplify();
                let r = right.simplify();
                if let Some(folded) = fold_numbers(&l, &r, u64::checked_mul, |a, b| Ok(a * b)) {
                    return folded;
                }
                if l.has_value(0.0) || r.has_value(0.0) {
                    return Expr::NaturalNumber(0);
                }
                if l.has_value(1.0) {
                    return r;
                }
                if r.has_value(1.0) {
                    return l;
                }
                Expr::product(l, r)
            }

            Expr::Quotient(left, right) => {
                let l = left.simplify();
                let r = right.simplify();
                let exact = |a: u64, b: u64| (b != 0 && a % b == 0).then(|| a / b);
                if let Some(folded) = fold_numbers(&l, &r, exact, operators::quotient::divide) {
                    return folded;
                }
                if r.has_value(1.0) {
                    return l;
                }
                Expr::quotient(l, r)
            }

            Expr::Power(base, exponent) => {
                let b = base.simplify();
                let e = exponent.simplify();
                let natural = |a: u64, n: u64| u32::try_from(n).ok().and_then(|n| a.checked_pow(n));
                if let Some(folded) = fold_numbers(&b, &e, natural, operators::pow::pow) {
                    return folded;
                }
                if e.has_value(1.0) {
                    return b;
                }
                if e.has_value(0.0) {
                    return Expr::NaturalNumber(1);
                }
                Expr::power_unchecked(b, e)
            }

            Expr::Sine(arg) => {
                let a = arg.simplify();
                if a.has_value(0.0) {
                    return Expr::NaturalNumber(0);
                }
                Expr::sin(a)
            }

            Expr::Cosine(arg) => {
                let a = arg.simplify();
                if a.has_value(0.0) {
                    return Expr::NaturalNumber(1);
                }
                Expr::cos(a)
            }

            Expr::Exponent(arg) => {
                let a = arg.simplify();
                if a.has_value(0.0) {
                    return Expr::NaturalNumber(1);
                }
                // e^ln(f) -> f
                if let Expr::NaturalLog(inner) = &a {
                    return (**inner).clone();
                }
                Expr::exp(a)
            }

            Expr::NaturalLog(arg) => {
                let a = arg.simplify();
                if a.has_value(1.0) {
                    return Expr::NaturalNumber(0);
                }
                Expr::ln(a)
            }

            Expr::Factorial(arg) => Expr::factorial(arg.simplify()),
        }
    }

    /// Renders the expression in the prefix notation read by [`crate::parser::parse`].
    ///
    /// Parsing the returned text yields a tree that evaluates identically to `self`.
    /// Negative reals are written as `-(0,v)` since the grammar has no signed literals.
    ///
    /// # Example
    /// ```
    /// use symcalc::prelude::*;
    ///
    /// let expr = Expr::sum(Expr::natural(1), Expr::sin(Expr::Variable));
    /// assert_eq!(expr.to_formula(), "+(1,s(x))");
    /// ```
    pub fn to_formula(&self) -> String {
        let mut out = String::new();
        self.write_formula(&mut out);
        out
    }

    fn write_formula(&self, out: &mut String) {
        let binary = |out: &mut String, op: char, a: &Expr, b: &Expr| {
            out.push(op);
            out.push('(');
            a.write_formula(out);
            out.push(',');
            b.write_formula(out);
            out.push(')');
        };
        let unary = |out: &mut String, tag: char, a: &Expr| {
            out.push(tag);
            out.push('(');
            a.write_formula(out);
            out.push(')');
        };

        match self {
            Expr::NaturalNumber(n) => {
                let _ = write!(out, "{n}");
            }
            Expr::RealNumber(v) if !v.is_finite() => {
                let _ = write!(out, "r{v})");
            }
            Expr::RealNumber(v) if *v < 0.0 => {
                let _ = write!(out, "-(0,{})", format_real(-v));
            }
            // Also covers -0.0, which would otherwise render with a sign
            Expr::RealNumber(v) => out.push_str(&format_real(v.abs())),
            Expr::Pi => out.push('p'),
            Expr::Variable => out.push('x'),
            Expr::Sum(a, b) => binary(out, '+', a, b),
            Expr::Difference(a, b) => binary(out, '-', a, b),
            Expr::Product(a, b) => binary(out, '*', a, b),
            Expr::Quotient(a, b) => binary(out, '/', a, b),
            Expr::Power(a, b) => binary(out, '^', a, b),
            Expr::Sine(a) => unary(out, 's', a),
            Expr::Cosine(a) => unary(out, 'c', a),
            Expr::Exponent(a) => unary(out, 'e', a),
            Expr::NaturalLog(a) => unary(out, 'l', a),
            Expr::Factorial(a) => unary(out, '!', a),
        }
    }
}

/// Folds two number leaves with the given operators.
///
/// Two naturals are combined with `natural` first; if that has no natural result the
/// real operator is used. Returns `None` when either side is not a number leaf or the
/// real operator leaves its domain.
fn fold_numbers(
    left: &Expr,
    right: &Expr,
    natural: impl Fn(u64, u64) -> Option<u64>,
    real: impl Fn(f64, f64) -> Result<f64, DomainError>,
) -> Option<Expr> {
    if let (Expr::NaturalNumber(a), Expr::NaturalNumber(b)) = (left, right) {
        if let Some(n) = natural(*a, *b) {
            return Some(Expr::NaturalNumber(n));
        }
    }
    let (a, b) = (left.number()?, right.number()?);
    real(a, b).ok().map(Expr::RealNumber)
}

/// Formats a real so that it always carries a decimal point (`3` -> `3.0`).
fn format_real(value: f64) -> String {
    let mut text = format!("{value}");
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::RealNumber(value)
    }
}

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Expr::NaturalNumber(value)
    }
}

/// Implements string formatting for expressions.
///
/// This implementation converts expressions to fully parenthesized infix notation:
/// - Natural numbers are formatted as integers, reals always with a decimal point
/// - π is formatted as `π` and the variable as `x`
/// - Binary operations (+, -, *, /, ^) are wrapped in parentheses
/// - sin, cos and ln use function call notation
/// - The exponential uses `(e ^ f)` and the factorial a postfix `!`
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::NaturalNumber(n) => write!(f, "{n}"),
            Expr::RealNumber(v) => write!(f, "{}", format_real(*v)),
            Expr::Pi => write!(f, "\u{03C0}"),
            Expr::Variable => write!(f, "x"),
            Expr::Sum(a, b) => write!(f, "({a} + {b})"),
            Expr::Difference(a, b) => write!(f, "({a} - {b})"),
            Expr::Product(a, b) => write!(f, "({a} * {b})"),
            Expr::Quotient(a, b) => write!(f, "({a} / {b})"),
            Expr::Power(a, b) => write!(f, "({a} ^ {b})"),
            Expr::Sine(a) => write!(f, "sin({a})"),
            Expr::Cosine(a) => write!(f, "cos({a})"),
            Expr::Exponent(a) => write!(f, "(e ^ {a})"),
            Expr::NaturalLog(a) => write!(f, "ln({a})"),
            Expr::Factorial(a) => write!(f, "{a}!"),
        }
    }
}
