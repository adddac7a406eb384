//! Domain-checked real exponentiation.
//!
//! Integral exponents go through `powi`, which is exact for small integers and
//! defined for negative bases. Everything else uses `powf`.

use crate::errors::DomainError;

/// Raises `base` to `exponent`.
///
/// # Returns
/// * `Ok(f64)` - the real power
/// * `Err(DomainError::Power)` - for zero raised to a negative power, or a negative
///   base raised to a non-integral power
pub(crate) fn pow(base: f64, exponent: f64) -> Result<f64, DomainError> {
    let integral = exponent.fract() == 0.0;
    if (base == 0.0 && exponent < 0.0) || (base < 0.0 && !integral) {
        return Err(DomainError::Power { base, exponent });
    }
    if integral && exponent.abs() <= i32::MAX as f64 {
        Ok(base.powi(exponent as i32))
    } else {
        Ok(base.powf(exponent))
    }
}
