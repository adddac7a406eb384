use std::sync::Arc;

use crate::expr::Expr;

/// Shared, immutable child of an expression node.
///
/// Subtrees are reference counted so that derivative and simplification results can
/// reuse parts of their input without copying them.
pub type Node = Arc<Expr>;

/// A sample point `(x, y)` used for polynomial fitting.
pub type Point = (f64, f64);
