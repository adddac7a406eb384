//! Factorial over the reals, restricted to natural arguments.

use crate::errors::DomainError;

/// Largest n whose factorial is finite in f64. 171! overflows.
const MAX_FINITE: f64 = 170.0;

/// Computes `value!` for a natural `value`.
///
/// The product is accumulated in f64, so arguments above 170 yield infinity.
///
/// # Returns
/// * `Ok(f64)` - the factorial
/// * `Err(DomainError::Factorial)` - if `value` is negative, fractional or NaN
pub(crate) fn factorial(value: f64) -> Result<f64, DomainError> {
    if !(value >= 0.0) || value.fract() != 0.0 {
        return Err(DomainError::Factorial { value });
    }
    if value > MAX_FINITE {
        return Ok(f64::INFINITY);
    }
    Ok((2..=value as u64).fold(1.0, |acc, k| acc * k as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(1.0), Ok(1.0));
        assert_eq!(factorial(5.0), Ok(120.0));
        assert_eq!(factorial(20.0), Ok(2_432_902_008_176_640_000.0));
        assert!(factorial(170.0).unwrap().is_finite());
        assert_eq!(factorial(171.0), Ok(f64::INFINITY));
    }

    #[test]
    fn test_factorial_domain() {
        assert_eq!(factorial(-1.0), Err(DomainError::Factorial { value: -1.0 }));
        assert_eq!(factorial(2.5), Err(DomainError::Factorial { value: 2.5 }));
        assert!(factorial(f64::NAN).is_err());
        assert!(factorial(f64::INFINITY).is_err());
    }
}
