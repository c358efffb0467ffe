//! # PathKit Core
//!
//! Core types, errors, and events for PathKit.
//! Provides the path data model shared by the planner and optimizer crates:
//! points, segments, obstacle shapes, sequence items, and robot settings.

pub mod angle;
pub mod constants;
pub mod error;
pub mod event_bus;
pub mod model;
pub mod types;

pub use error::{ConfigError, Error, OptimizerError, PlannerError, Result};

pub use model::{
    EndPoint, EventMarker, HeadingMode, KinematicLimits, PathSegment, Point, RobotSettings,
    SequenceItem, Shape, ShapeKind, StartPoint,
};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, EventBus, EventCategory, EventFilter, PlannerEvent,
};

pub use types::{stop_flag, thread_safe_rw, StopFlag, ThreadSafeRw};
