//! Error type for spectrum mapping.

use thiserror::Error;

/// Input that has no defined color.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SpectrumError {
    /// Frequency is zero, negative, NaN or infinite.
    #[error("invalid frequency: {0} (expected a finite positive number)")]
    InvalidFrequency(f64),

    /// Wavelength is NaN or infinite.
    #[error("invalid wavelength: {0} nm (expected a finite number)")]
    InvalidWavelength(f64),
}
