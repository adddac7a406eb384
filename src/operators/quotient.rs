use crate::errors::DomainError;

/// Divides `numerator` by `denominator`, rejecting an exact zero denominator.
pub(crate) fn divide(numerator: f64, denominator: f64) -> Result<f64, DomainError> {
    if denominator == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    Ok(numerator / denominator)
}
