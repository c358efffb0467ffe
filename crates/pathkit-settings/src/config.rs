//! Configuration and settings management for PathKit
//!
//! Configuration is organized into logical sections:
//! - Profiler settings (sampling fidelity, angular velocity handling)
//! - Collision settings (sampling, robot footprint inflation)
//! - Optimizer settings (population, operators, penalty weight)
//!
//! Files are JSON or TOML, chosen by extension.

use pathkit_core::constants::{DEFAULT_COMPOSITE_STEPS, DEFAULT_RESOLUTION};
use pathkit_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Motion profiler fidelity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilerSettings {
    /// Arc-length samples per travel segment
    pub resolution: usize,
    /// Parameter steps used when sampling composite curves
    pub composite_steps: usize,
    /// Stretch linear-heading segments whose turn needs longer than the translation
    pub respect_angular_velocity: bool,
}

impl Default for ProfilerSettings {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            composite_steps: DEFAULT_COMPOSITE_STEPS,
            respect_angular_velocity: true,
        }
    }
}

/// Collision checker options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollisionSettings {
    /// Samples per segment used for obstacle tests
    pub sample_resolution: usize,
    /// Also test the corners of the robot rectangle at each sample
    pub inflate_footprint: bool,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            sample_resolution: DEFAULT_RESOLUTION,
            inflate_footprint: false,
        }
    }
}

/// Genetic search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizerSettings {
    pub population_size: usize,
    pub max_generations: usize,
    /// Best candidates copied unchanged into the next generation
    pub elitism: usize,
    pub tournament_size: usize,
    /// Probability that two parents are blended rather than cloned
    pub crossover_rate: f64,
    /// Per-coordinate probability of a Gaussian nudge
    pub mutation_rate: f64,
    /// Mutation standard deviation in inches for the first generation
    pub initial_sigma: f64,
    /// Multiplier applied to sigma after every generation
    pub sigma_decay: f64,
    pub min_sigma: f64,
    /// Seconds of penalty per colliding sample
    pub collision_penalty_weight: f64,
    /// Allow non-locked end points to move as well as control points
    pub perturb_endpoints: bool,
    /// Give non-locked straight segments a mid-point control point before searching
    pub seed_straight_segments: bool,
    /// Fixed random seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            population_size: 60,
            max_generations: 100,
            elitism: 2,
            tournament_size: 3,
            crossover_rate: 0.9,
            mutation_rate: 0.3,
            initial_sigma: 12.0,
            sigma_decay: 0.97,
            min_sigma: 0.5,
            collision_penalty_weight: 1000.0,
            perturb_endpoints: false,
            seed_straight_segments: true,
            seed: None,
        }
    }
}

impl OptimizerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::invalid(
                "populationSize",
                "must be at least 2",
            ));
        }
        if self.elitism >= self.population_size {
            return Err(ConfigError::invalid(
                "elitism",
                "must be smaller than the population",
            ));
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::invalid("tournamentSize", "must be > 0"));
        }
        for (name, rate) in [
            ("crossoverRate", self.crossover_rate),
            ("mutationRate", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::invalid(name, "must be within [0, 1]"));
            }
        }
        for (name, value) in [
            ("initialSigma", self.initial_sigma),
            ("sigmaDecay", self.sigma_decay),
            ("collisionPenaltyWeight", self.collision_penalty_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::non_positive(name, value));
            }
        }
        if !self.min_sigma.is_finite() || self.min_sigma < 0.0 {
            return Err(ConfigError::invalid("minSigma", "must be >= 0"));
        }
        Ok(())
    }
}

/// Main engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub profiler: ProfilerSettings,
    pub collision: CollisionSettings,
    pub optimizer: OptimizerSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location, e.g. `~/.config/pathkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("pathkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.profiler.resolution == 0 {
            return Err(ConfigError::invalid("profiler.resolution", "must be > 0"));
        }
        if self.profiler.composite_steps == 0 {
            return Err(ConfigError::invalid(
                "profiler.compositeSteps",
                "must be > 0",
            ));
        }
        if self.collision.sample_resolution == 0 {
            return Err(ConfigError::invalid(
                "collision.sampleResolution",
                "must be > 0",
            ));
        }
        self.optimizer.validate()
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
