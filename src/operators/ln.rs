//! Domain-checked natural logarithm.

use crate::errors::DomainError;

/// Natural logarithm of `value`.
///
/// # Returns
/// * `Ok(f64)` - ln(value) for positive input, NaN for NaN input
/// * `Err(DomainError::Logarithm)` - if `value` is zero or negative
pub(crate) fn ln(value: f64) -> Result<f64, DomainError> {
    if value <= 0.0 {
        return Err(DomainError::Logarithm { value });
    }
    Ok(value.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln() {
        assert_eq!(ln(1.0), Ok(0.0));
        assert!((ln(std::f64::consts::E).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(ln(0.0), Err(DomainError::Logarithm { value: 0.0 }));
        assert_eq!(ln(-2.0), Err(DomainError::Logarithm { value: -2.0 }));
        assert!(ln(f64::NAN).unwrap().is_nan());
    }
}
