use thiserror::Error;

/// Rejected configuration values.
///
/// Runtime geometry is always clamped rather than rejected; this type is only
/// produced by explicit validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A size that must be strictly positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// A fraction was outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    FractionOutOfRange {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
    /// Released threshold above pressed threshold.
    #[error("released fraction {released} exceeds pressed fraction {pressed}")]
    ThresholdOrder {
        /// Pressed fraction.
        pressed: f32,
        /// Released fraction.
        released: f32,
    },
    /// A rate or radius was negative.
    #[error("{name} must not be negative, got {value}")]
    NegativeRate {
        /// Field name.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
}
