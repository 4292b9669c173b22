//! Numeric validation utilities
//!
//! Provides range checks and overflow-safe dimension arithmetic for
//! composition parameters.

use crate::error::{BgExtendError, Result};

/// Validator for numeric parameters and dimension arithmetic
pub struct NumericValidator;

impl NumericValidator {
    /// Validate that a value is positive
    pub fn validate_positive<T>(value: T, name: &str) -> Result<T>
    where
        T: PartialOrd + std::fmt::Display + Copy + Default,
    {
        if value <= T::default() {
            return Err(BgExtendError::invalid_config(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        Ok(value)
    }

    /// Validate that a float is finite and strictly positive
    pub fn validate_positive_finite(value: f32, name: &str) -> Result<f32> {
        if !value.is_finite() {
            return Err(BgExtendError::invalid_config(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        Self::validate_positive(value, name)
    }

    /// Validate quality setting (0-100)
    pub fn validate_quality(value: u8, name: &str, recommended: u8) -> Result<u8> {
        if value > 100 {
            return Err(BgExtendError::config_value_error(
                name,
                value,
                "0-100",
                Some(recommended),
            ));
        }
        Ok(value)
    }

    /// Compute `base + 2 * margin` without overflowing `u32`
    pub fn padded_extent(base: u32, margin: u32, axis: &str) -> Result<u32> {
        margin
            .checked_mul(2)
            .and_then(|both| base.checked_add(both))
            .ok_or_else(|| {
                BgExtendError::invalid_config(format!(
                    "Output {} overflows: {} + 2 * {}",
                    axis, base, margin
                ))
            })
    }

    /// Safely convert f64 to u32 with bounds checking
    pub fn validate_f64_to_u32(value: f64) -> Result<u32> {
        if !value.is_finite() {
            return Err(BgExtendError::processing(format!(
                "Cannot convert non-finite value {} to u32",
                value
            )));
        }

        if value < 0.0 {
            return Err(BgExtendError::processing(format!(
                "Cannot convert negative value {} to u32",
                value
            )));
        }

        if value > f64::from(u32::MAX) {
            return Err(BgExtendError::processing(format!(
                "Value {} exceeds u32::MAX ({})",
                value,
                u32::MAX
            )));
        }

        Ok(value as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert_eq!(NumericValidator::validate_positive(5u32, "edge").unwrap(), 5);
        assert!(NumericValidator::validate_positive(0u32, "edge").is_err());
        assert!(NumericValidator::validate_positive(-1.0f32, "sigma").is_err());
    }

    #[test]
    fn test_validate_positive_finite() {
        assert!(NumericValidator::validate_positive_finite(2.5, "sigma").is_ok());
        assert!(NumericValidator::validate_positive_finite(f32::NAN, "sigma").is_err());
        assert!(NumericValidator::validate_positive_finite(f32::INFINITY, "sigma").is_err());
        assert!(NumericValidator::validate_positive_finite(0.0, "sigma").is_err());
    }

    #[test]
    fn test_validate_quality() {
        assert_eq!(NumericValidator::validate_quality(100, "JPEG quality", 90).unwrap(), 100);
        let err = NumericValidator::validate_quality(101, "JPEG quality", 90).unwrap_err();
        assert!(err.to_string().contains("0-100"));
    }

    #[test]
    fn test_padded_extent() {
        assert_eq!(NumericValidator::padded_extent(100, 20, "width").unwrap(), 140);
        assert_eq!(NumericValidator::padded_extent(100, 0, "width").unwrap(), 100);
        assert!(NumericValidator::padded_extent(u32::MAX, 1, "width").is_err());
        assert!(NumericValidator::padded_extent(1, u32::MAX / 2 + 1, "height").is_err());
    }

    #[test]
    fn test_validate_f64_to_u32() {
        assert_eq!(NumericValidator::validate_f64_to_u32(42.9).unwrap(), 42);
        assert!(NumericValidator::validate_f64_to_u32(-1.0).is_err());
        assert!(NumericValidator::validate_f64_to_u32(f64::NAN).is_err());
        assert!(NumericValidator::validate_f64_to_u32(1e12).is_err());
    }
}
