//! Path data model.
//!
//! The editor owns these values; the planner and optimizer only read them.
//! Every type round-trips through serde in the editor's camelCase layout.

mod point;
mod segment;
mod sequence;
mod settings;
mod shape;

pub use point::{Point, StartPoint};
pub use segment::{EndPoint, EventMarker, HeadingMode, PathSegment};
pub use sequence::{synchronize_wait_durations, wait_duration_groups, SequenceItem};
pub use settings::{KinematicLimits, RobotSettings};
pub use shape::{Shape, ShapeKind};

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
