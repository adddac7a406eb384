/// A trait for dense matrix types that the linear solver can operate on.
///
/// This trait provides a common interface for different matrix implementations,
/// allowing Gaussian elimination to run in place on whichever storage the caller
/// already has. Access is by (row, column) so that both row-major and column-major
/// layouts are supported.
///
/// # Examples
///
/// ```rust
/// use symcalc::prelude::*;
///
/// let mut mat = AugmentedMatrix::zeros(2, 3);
/// mat.set(0, 2, 5.0);
/// mat.swap_rows(0, 1);
/// assert_eq!(mat.dims(), (2, 3));
/// assert_eq!(mat.get(1, 2), 5.0);
/// ```
pub trait Matrix {
    /// Creates a new matrix of the specified dimensions filled with zeros.
    ///
    /// # Arguments
    /// * `rows` - Number of rows in the matrix
    /// * `cols` - Number of columns in the matrix
    fn zeros(rows: usize, cols: usize) -> Self;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the element at (`row`, `col`).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn get(&self, row: usize, col: usize) -> f64;

    /// Overwrites the element at (`row`, `col`).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    fn set(&mut self, row: usize, col: usize, value: f64);

    /// Exchanges two rows. Swapping a row with itself is a no-op.
    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (_, cols) = self.dims();
        for col in 0..cols {
            let tmp = self.get(a, col);
            self.set(a, col, self.get(b, col));
            self.set(b, col, tmp);
        }
    }
}

/// Implementation of Matrix trait for a vector of rows.
impl Matrix for Vec<Vec<f64>> {
    fn zeros(rows: usize, cols: usize) -> Self {
        vec![vec![0.0; cols]; rows]
    }

    fn dims(&self) -> (usize, usize) {
        (self.len(), self.first().map_or(0, Vec::len))
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[row][col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[row][col] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        self.swap(a, b);
    }
}

/// Implementation of Matrix trait for ndarray's Array2<f64>.
#[cfg(feature = "ndarray")]
impl Matrix for ndarray::Array2<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        ndarray::Array2::zeros((rows, cols))
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[[row, col]]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[[row, col]] = value;
    }
}

/// Implementation of Matrix trait for nalgebra's DMatrix<f64>.
///
/// nalgebra stores its elements column-major; element access hides the difference.
#[cfg(feature = "nalgebra")]
impl Matrix for nalgebra::DMatrix<f64> {
    fn zeros(rows: usize, cols: usize) -> Self {
        nalgebra::DMatrix::zeros(rows, cols)
    }

    fn dims(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self[(row, col)]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self[(row, col)] = value;
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        nalgebra::DMatrix::swap_rows(self, a, b);
    }
}
