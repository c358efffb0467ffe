use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Robot limits and dimensions as supplied by the editor.
///
/// `max_velocity` and `max_acceleration` are optional on the wire so that a
/// half-filled settings record can be represented; profiling rejects it via
/// [`RobotSettings::limits`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSettings {
    /// Inches per second
    #[serde(default)]
    pub max_velocity: Option<f64>,
    /// Inches per second squared
    #[serde(default)]
    pub max_acceleration: Option<f64>,
    /// Degrees per second
    #[serde(default)]
    pub max_angular_velocity: Option<f64>,
    /// Inches
    pub robot_length: f64,
    /// Inches
    pub robot_width: f64,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            max_velocity: Some(40.0),
            max_acceleration: Some(30.0),
            max_angular_velocity: Some(180.0),
            robot_length: 18.0,
            robot_width: 18.0,
        }
    }
}

impl RobotSettings {
    pub fn new(max_velocity: f64, max_acceleration: f64) -> Self {
        Self {
            max_velocity: Some(max_velocity),
            max_acceleration: Some(max_acceleration),
            ..Self::default()
        }
    }

    pub fn with_angular_velocity(mut self, degrees_per_second: Option<f64>) -> Self {
        self.max_angular_velocity = degrees_per_second;
        self
    }

    /// Validate the kinematic limits, failing fast on anything that would
    /// make a duration infinite or `NaN`.
    pub fn limits(&self) -> Result<KinematicLimits, ConfigError> {
        let max_velocity = require_positive("maxVelocity", self.max_velocity)?;
        let max_acceleration = require_positive("maxAcceleration", self.max_acceleration)?;
        let max_angular_velocity = self
            .max_angular_velocity
            .filter(|w| w.is_finite() && *w > 0.0);

        Ok(KinematicLimits {
            max_velocity,
            max_acceleration,
            max_angular_velocity,
        })
    }
}

fn require_positive(name: &str, value: Option<f64>) -> Result<f64, ConfigError> {
    match value {
        None => Err(ConfigError::missing(name)),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(ConfigError::non_positive(name, v)),
    }
}

/// Validated limits used by the profiler. Construct through [`RobotSettings::limits`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicLimits {
    pub max_velocity: f64,
    pub max_acceleration: f64,
    /// `None` when no usable angular bound was configured.
    pub max_angular_velocity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_accept_positive_values() {
        let limits = RobotSettings::new(50.0, 100.0).limits().unwrap();
        assert_eq!(limits.max_velocity, 50.0);
        assert_eq!(limits.max_acceleration, 100.0);
        assert_eq!(limits.max_angular_velocity, Some(180.0));
    }

    #[test]
    fn test_limits_reject_missing_velocity() {
        let settings = RobotSettings {
            max_velocity: None,
            ..RobotSettings::default()
        };
        assert_eq!(
            settings.limits(),
            Err(ConfigError::missing("maxVelocity"))
        );
    }

    #[test]
    fn test_limits_reject_non_positive_acceleration() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let settings = RobotSettings {
                max_acceleration: Some(bad),
                ..RobotSettings::default()
            };
            let err = settings.limits().unwrap_err();
            assert!(matches!(err, ConfigError::NonPositive { ref name, .. } if name == "maxAcceleration"));
        }
    }

    #[test]
    fn test_unusable_angular_velocity_is_dropped() {
        let limits = RobotSettings::new(10.0, 10.0)
            .with_angular_velocity(Some(0.0))
            .limits()
            .unwrap();
        assert_eq!(limits.max_angular_velocity, None);
    }
}
