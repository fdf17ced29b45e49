use mrtouch_core::ConfigError;
use serde::{Deserialize, Serialize};

use crate::button::DEFAULT_RECOVERY_SPEED;

/// Tunable button geometry and thresholds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Extent along local X.
    pub width: f32,
    /// Extent along local Y.
    pub height: f32,
    /// Maximum travel along local -Z.
    pub max_push_distance: f32,
    /// Fraction of the max push distance at which the button is pressed.
    pub pressed_fraction: f32,
    /// Fraction of the max push distance at which a pressed button is released.
    pub released_fraction: f32,
    /// Release speed in distance units per second.
    pub recovery_speed: f32,
    /// How far the hover volume reaches in front of the face.
    pub hover_depth: f32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            width: 0.04,
            height: 0.04,
            max_push_distance: 0.01,
            pressed_fraction: 0.5,
            released_fraction: 0.2,
            recovery_speed: DEFAULT_RECOVERY_SPEED,
            hover_depth: 0.01,
        }
    }
}

impl ButtonConfig {
    /// Push distance at which the button is pressed.
    pub fn pressed_distance(&self) -> f32 {
        self.max_push_distance * self.pressed_fraction
    }

    /// Push distance at which a pressed button is released.
    pub fn released_distance(&self) -> f32 {
        self.max_push_distance * self.released_fraction
    }

    /// Check values for sanity.
    ///
    /// Buttons built from an invalid config still work (thresholds are
    /// clamped), so callers decide whether a failure here is fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("max_push_distance", self.max_push_distance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        for (name, value) in [
            ("pressed_fraction", self.pressed_fraction),
            ("released_fraction", self.released_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::FractionOutOfRange { name, value });
            }
        }

        if self.released_fraction > self.pressed_fraction {
            return Err(ConfigError::ThresholdOrder {
                pressed: self.pressed_fraction,
                released: self.released_fraction,
            });
        }

        for (name, value) in [
            ("recovery_speed", self.recovery_speed),
            ("hover_depth", self.hover_depth),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeRate { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ButtonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn thresholds_scale_with_travel() {
        let config = ButtonConfig {
            max_push_distance: 2.0,
            ..Default::default()
        };
        assert_eq!(config.pressed_distance(), 1.0);
        assert!((config.released_distance() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = ButtonConfig {
            pressed_fraction: 0.3,
            released_fraction: 0.6,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn rejects_zero_width_and_nan() {
        let zero = ButtonConfig {
            width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::NonPositiveDimension { name: "width", .. })
        ));

        let nan = ButtonConfig {
            height: f32::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rejects_negative_recovery() {
        let config = ButtonConfig {
            recovery_speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeRate { name: "recovery_speed", .. })
        ));
    }
}
