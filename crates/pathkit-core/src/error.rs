//! Error handling for PathKit
//!
//! Provides error types for all layers of the engine:
//! - Configuration errors (missing or invalid kinematic limits)
//! - Planner errors (profiling and geometry input problems)
//! - Optimizer errors (search lifecycle misuse)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised before any profiling happens so that a bad limit can never
/// turn into a `NaN` or infinite duration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("Missing required setting '{name}'")]
    MissingSetting {
        /// The setting name as it appears in the settings record.
        name: String,
    },

    /// A setting that must be strictly positive is zero, negative, or not finite
    #[error("Setting '{name}' must be a positive finite number, got {value}")]
    NonPositive {
        /// The setting name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Generic invalid configuration value
    #[error("Invalid configuration for '{name}': {reason}")]
    Invalid {
        /// The setting name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingSetting { name: name.into() }
    }

    pub fn non_positive(name: impl Into<String>, value: f64) -> Self {
        Self::NonPositive {
            name: name.into(),
            value,
        }
    }

    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Planner error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    /// Sampling resolution must be at least one step
    #[error("Invalid sampling resolution: {resolution}")]
    InvalidResolution {
        /// The rejected resolution.
        resolution: usize,
    },

    /// Segment index out of range
    #[error("Segment index {index} out of range (have {count})")]
    SegmentOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of segments available.
        count: usize,
    },
}

/// Optimizer error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizerError {
    /// `optimize` was called while a search was already running
    #[error("Optimizer is already running")]
    AlreadyRunning,

    /// The path has no coordinates the search is allowed to move
    #[error("Nothing to optimize: every segment is locked")]
    NothingToOptimize,
}

/// Main error type for PathKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Planner error
    #[error(transparent)]
    Planner(#[from] PlannerError),

    /// Optimizer error
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

impl Error {
    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this is an optimizer lifecycle error
    pub fn is_optimizer_error(&self) -> bool {
        matches!(self, Error::Optimizer(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::missing("maxVelocity");
        assert_eq!(err.to_string(), "Missing required setting 'maxVelocity'");

        let err = ConfigError::non_positive("maxAcceleration", -2.0);
        assert_eq!(
            err.to_string(),
            "Setting 'maxAcceleration' must be a positive finite number, got -2"
        );
    }

    #[test]
    fn test_planner_error_display() {
        let err = PlannerError::InvalidResolution { resolution: 0 };
        assert_eq!(err.to_string(), "Invalid sampling resolution: 0");

        let err = PlannerError::SegmentOutOfRange { index: 4, count: 2 };
        assert_eq!(err.to_string(), "Segment index 4 out of range (have 2)");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ConfigError::missing("maxVelocity").into();
        assert!(err.is_config_error());
        assert!(!err.is_optimizer_error());

        let err: Error = OptimizerError::AlreadyRunning.into();
        assert!(err.is_optimizer_error());
        assert_eq!(err.to_string(), "Optimizer is already running");
    }
}
