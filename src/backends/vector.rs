use std::borrow::Cow;

/// Sample containers an expression can be evaluated over with
/// [`crate::expr::Expr::eval_samples`].
///
/// Evaluation reads the samples as one contiguous run and hands the results back
/// in a container of the same type, built from the evaluated values.
///
/// # Examples
///
/// ```rust
/// use symcalc::prelude::*;
///
/// let xs = vec![1.0, 2.0, 3.0];
/// assert_eq!(Vector::samples(&xs)[0], 1.0);
///
/// let ys: Vec<f64> = Vector::from_samples(vec![0.5; 2]);
/// assert_eq!(Vector::len(&ys), 2);
/// ```
pub trait Vector: Sized {
    /// The samples in order, borrowed when the storage is already contiguous.
    fn samples(&self) -> Cow<'_, [f64]>;

    /// Wraps evaluated values in this container type.
    fn from_samples(values: Vec<f64>) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Vector for Vec<f64> {
    fn samples(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(self)
    }

    fn from_samples(values: Vec<f64>) -> Self {
        values
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Strided arrays are copied into a contiguous buffer before evaluation.
#[cfg(feature = "ndarray")]
impl Vector for ndarray::Array1<f64> {
    fn samples(&self) -> Cow<'_, [f64]> {
        match ndarray::Array1::as_slice(self) {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(self.to_vec()),
        }
    }

    fn from_samples(values: Vec<f64>) -> Self {
        ndarray::Array1::from_vec(values)
    }

    fn len(&self) -> usize {
        ndarray::Array1::len(self)
    }
}

#[cfg(feature = "nalgebra")]
impl Vector for nalgebra::DVector<f64> {
    fn samples(&self) -> Cow<'_, [f64]> {
        Cow::Borrowed(nalgebra::DVector::as_slice(self))
    }

    fn from_samples(values: Vec<f64>) -> Self {
        nalgebra::DVector::from_vec(values)
    }

    fn len(&self) -> usize {
        nalgebra::DVector::len(self)
    }
}
