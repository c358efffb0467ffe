//! # PathKit Planner
//!
//! Turns a path description into time and checks it against the field.
//!
//! - [`geometry`]: curve evaluation and arc-length sampling
//! - [`trapezoid`]: trapezoidal velocity profile over a distance
//! - [`profiler`]: the motion profiler producing a [`TimePrediction`]
//! - [`collision`]: obstacle and keep-in zone penalties
//! - [`timeline`]: marker resolution and pose playback
//!
//! Everything in this crate is pure and safe to call from many threads at
//! once.

pub mod collision;
pub mod geometry;
pub mod profiler;
pub mod sequence;
pub mod timeline;
pub mod trapezoid;

pub use collision::{point_in_polygon, segment_penalty, valid_shapes, CollisionChecker};
pub use geometry::{analyze_segment, evaluate, sample_arc_length, ArcSample, Curve, SegmentAnalysis};
pub use profiler::{calculate_path_time, MotionProfiler};
pub use sequence::{resolve, ResolvedSequence, Step};
pub use timeline::{EventKind, MarkerTime, Pose, TimePrediction, TimelineEvent};
pub use trapezoid::TrapezoidProfile;
