//! Polynomial interpolation through a set of points.
//!
//! For k points the unique polynomial of degree k - 1 passing through them is found by
//! solving the Vandermonde system `V c = y` with Gaussian elimination (partial
//! pivoting and back substitution). The solution is turned back into an expression
//! tree `c0 * x^(k-1) + (c1 * x^(k-2) + (... + c(k-1) * x^0))`.
//!
//! # Example
//! ```
//! use symcalc::prelude::*;
//!
//! let poly = fit_polynomial_str("-3,-1; -2,0; -1,-1; 0,2").unwrap();
//! assert!((poly.eval(-2.0).unwrap() - 0.0).abs() < 1e-9);
//! ```

use std::fmt;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::backends::matrix::Matrix;
use crate::errors::SolveError;
use crate::expr::Expr;
use crate::types::Point;

/// Dense row-major matrix holding a linear system with its right-hand side as the
/// last column.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl AugmentedMatrix {
    /// Builds a matrix from equally long rows.
    ///
    /// # Errors
    /// Returns `SolveError::InvalidShape` if the rows differ in length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, SolveError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(SolveError::InvalidShape {
                rows: rows.len(),
                cols: bad.len(),
            });
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }
}

impl Matrix for AugmentedMatrix {
    fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.data.split_at_mut(high * self.cols);
        head[low * self.cols..(low + 1) * self.cols].swap_with_slice(&mut tail[..self.cols]);
    }
}

impl fmt::Display for AugmentedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = (0..self.rows)
            .map(|i| format!("[{}]", self.row(i).iter().join(", ")))
            .join("\n");
        write!(f, "{text}")
    }
}

/// Builds the augmented Vandermonde system for `points`.
///
/// Row i is `[x_i^(k-1), ..., x_i^1, x_i^0, y_i]` for k points.
pub fn vandermonde(points: &[Point]) -> AugmentedMatrix {
    let k = points.len();
    let mut matrix = AugmentedMatrix::zeros(k, k + 1);
    for (row, (x, y)) in points.iter().enumerate() {
        for col in 0..k {
            matrix.set(row, col, x.powi((k - 1 - col) as i32));
        }
        matrix.set(row, k, *y);
    }
    matrix
}

/// Solves the `k x (k + 1)` augmented system in place.
///
/// Uses partial pivoting: for each column the row with the largest absolute value at
/// or below the diagonal becomes the pivot row (the first one on ties). Entries below
/// the pivot are set to exactly zero. Back substitution then updates the augmented
/// column as each unknown is found.
///
/// # Errors
/// * `SolveError::InvalidShape` - if the matrix is not `k x (k + 1)`
/// * `SolveError::SingularMatrix` - if the best pivot in some column is exactly zero
pub fn gaussian_elimination<M: Matrix>(matrix: &mut M) -> Result<Vec<f64>, SolveError> {
    let (rows, cols) = matrix.dims();
    if cols != rows + 1 {
        return Err(SolveError::InvalidShape { rows, cols });
    }

    for h in 0..rows {
        let pivot = (h..rows).fold(h, |best, i| {
            if matrix.get(i, h).abs() > matrix.get(best, h).abs() {
                i
            } else {
                best
            }
        });
        if matrix.get(pivot, h) == 0.0 {
            return Err(SolveError::SingularMatrix { column: h });
        }
        trace!(column = h, pivot_row = pivot, "selected pivot");
        matrix.swap_rows(pivot, h);

        for i in h + 1..rows {
            let factor = matrix.get(i, h) / matrix.get(h, h);
            for j in h + 1..cols {
                matrix.set(i, j, matrix.get(i, j) - matrix.get(h, j) * factor);
            }
            matrix.set(i, h, 0.0);
        }
    }

    let mut solution = vec![0.0; rows];
    for i in (0..rows).rev() {
        solution[i] = matrix.get(i, rows) / matrix.get(i, i);
        for h in (0..i).rev() {
            matrix.set(h, rows, matrix.get(h, rows) - matrix.get(h, i) * solution[i]);
        }
    }
    Ok(solution)
}

/// Turns polynomial coefficients, highest degree first, into an expression tree.
///
/// Each coefficient `c_i` becomes `c_i * x^(n - 1 - i)`; the terms are joined with a
/// right-nested sum. An empty slice gives the zero polynomial.
pub fn coefficients_to_expr(coefficients: &[f64]) -> Expr {
    let degree = coefficients.len().saturating_sub(1);
    let terms = coefficients.iter().enumerate().map(|(i, c)| {
        Expr::product(
            Expr::RealNumber(*c),
            Expr::power_natural(Expr::Variable, (degree - i) as u64),
        )
    });
    Expr::sum_all(terms).unwrap_or(Expr::NaturalNumber(0))
}

/// Finds the interpolating polynomial of degree `points.len() - 1`.
///
/// # Errors
/// * `SolveError::NoPoints` - if `points` is empty
/// * `SolveError::SingularMatrix` - if two points share an x value
pub fn fit_polynomial(points: &[Point]) -> Result<Expr, SolveError> {
    if points.is_empty() {
        return Err(SolveError::NoPoints);
    }
    let mut matrix = vandermonde(points);
    trace!("vandermonde system:\n{matrix}");
    let coefficients = gaussian_elimination(&mut matrix)?;
    debug!(points = points.len(), ?coefficients, "fitted polynomial");
    Ok(coefficients_to_expr(&coefficients))
}

/// Reads a point list of the form `"x,y;x,y;..."`.
///
/// Whitespace around numbers is allowed. An empty or blank string yields no points.
///
/// # Errors
/// Returns `SolveError::MalformedPoint` with the zero-based index of the first entry
/// that is not a pair of numbers.
pub fn parse_points(text: &str) -> Result<Vec<Point>, SolveError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(';')
        .enumerate()
        .map(|(index, entry)| -> Result<Point, SolveError> {
            let malformed = || SolveError::MalformedPoint {
                index,
                text: entry.trim().to_string(),
            };
            let (x, y) = entry
                .split(',')
                .map(str::trim)
                .collect_tuple()
                .ok_or_else(malformed)?;
            let x = x.parse::<f64>().map_err(|_| malformed())?;
            let y = y.parse::<f64>().map_err(|_| malformed())?;
            Ok((x, y))
        })
        .collect()
}

/// Parses a point list and fits the interpolating polynomial through it.
pub fn fit_polynomial_str(text: &str) -> Result<Expr, SolveError> {
    fit_polynomial(&parse_points(text)?)
}
