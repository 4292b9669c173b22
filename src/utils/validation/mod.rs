//! Validation utilities for composition parameters

pub mod numeric;

pub use numeric::NumericValidator;
