//! # PathKit
//!
//! Motion profiling and path optimization for a 2D wheeled robot on a
//! bounded field.
//!
//! ## Architecture
//!
//! PathKit is organized as a workspace with multiple crates:
//!
//! 1. **pathkit-core** - Path data model, errors, heading math, event bus
//! 2. **pathkit-settings** - Profiler, collision and optimizer configuration
//! 3. **pathkit-planner** - Curve geometry, motion profiler, collision checker
//! 4. **pathkit-optimizer** - Genetic search for faster collision-free paths
//! 5. **pathkit** - Project files and the `pathkit` command line tool
//!
//! ## Example
//!
//! ```no_run
//! use pathkit::{calculate_path_time, PathSegment, RobotSettings, StartPoint};
//!
//! let segments = vec![PathSegment::line_to(100.0, 0.0)];
//! let prediction = calculate_path_time(
//!     &StartPoint::default(),
//!     &segments,
//!     &RobotSettings::new(50.0, 100.0),
//!     &[],
//! )?;
//! assert!((prediction.total_time - 2.5).abs() < 1e-9);
//! # Ok::<(), pathkit::Error>(())
//! ```

pub mod project;

pub use pathkit_core::{
    angle, event_bus, ConfigError, EndPoint, Error, EventBus, EventCategory, EventFilter,
    EventMarker, HeadingMode, OptimizerError, PathSegment, PlannerError, PlannerEvent, Point,
    Result, RobotSettings, SequenceItem, Shape, ShapeKind, StartPoint,
};
pub use pathkit_optimizer::{
    GenerationProgress, OptimizationProblem, OptimizationResult, OptimizerState, PathOptimizer,
};
pub use pathkit_planner::{
    analyze_segment, calculate_path_time, CollisionChecker, EventKind, MotionProfiler, Pose,
    SegmentAnalysis, TimePrediction, TimelineEvent,
};
pub use pathkit_settings::{CollisionSettings, Config, OptimizerSettings, ProfilerSettings};
pub use project::Project;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Cargo profile the binary was built with
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

/// Version line shown by `pathkit --version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_PROFILE"),
    ", built ",
    env!("BUILD_DATE"),
    ")"
);

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr so command output stays pipeable
/// - RUST_LOG environment variable support, `info` by default
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
