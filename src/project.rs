//! Project files consumed by the command line tool.
//!
//! A project is the editor's view of one autonomous routine: where the robot
//! starts, the segments, the obstacles, the execution order, and the robot's
//! limits. Engine tuning may ride along in an optional `config` section.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use pathkit_core::{PathSegment, RobotSettings, SequenceItem, Shape, StartPoint};
use pathkit_optimizer::OptimizationProblem;
use pathkit_settings::Config;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub start_point: StartPoint,
    #[serde(default)]
    pub segments: Vec<PathSegment>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub sequence: Vec<SequenceItem>,
    #[serde(default)]
    pub settings: RobotSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Config>,
}

impl Project {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading project {}", path.display()))?;
        let project: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing project {}", path.display()))?;
        if let Some(config) = &project.config {
            config
                .validate()
                .with_context(|| format!("invalid config in {}", path.display()))?;
        }
        tracing::debug!(
            "Loaded {} segments, {} shapes, {} sequence items from {}",
            project.segments.len(),
            project.shapes.len(),
            project.sequence.len(),
            path.display()
        );
        Ok(project)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Engine configuration: the embedded section, else defaults.
    pub fn config(&self) -> Config {
        self.config.clone().unwrap_or_default()
    }

    pub fn optimization_problem(&self) -> OptimizationProblem {
        OptimizationProblem {
            start: self.start_point,
            segments: self.segments.clone(),
            shapes: self.shapes.clone(),
            sequence: self.sequence.clone(),
            robot: self.settings,
        }
    }

    /// Same project with its segments replaced.
    pub fn with_segments(&self, segments: Vec<PathSegment>) -> Self {
        Self {
            segments,
            ..self.clone()
        }
    }
}
