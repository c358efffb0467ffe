//! Kinematic motion profiler.
//!
//! Walks a resolved sequence, builds a trapezoidal profile for every travel
//! segment, and lays waits and rotates out between them. Position and heading
//! are chained from one item to the next.

use pathkit_core::angle::{angular_difference, normalize_degrees};
use pathkit_core::constants::EPSILON;
use pathkit_core::model::wait_duration_groups;
use pathkit_core::{
    EndPoint, HeadingMode, KinematicLimits, PathSegment, PlannerError, Point,
    RobotSettings, SequenceItem, StartPoint,
};
use pathkit_settings::ProfilerSettings;

use crate::geometry::{sample_curve, sampled_length, ArcSample, Curve};
use crate::sequence::{resolve, Step};
use crate::timeline::{EventKind, TimePrediction, TimelineEvent};
use crate::trapezoid::TrapezoidProfile;

/// Parameter steps used for a curve: composite curves get their own count.
pub fn steps_for(curve: &Curve, resolution: usize, composite_steps: usize) -> usize {
    if curve.is_composite() {
        composite_steps
    } else {
        resolution
    }
}

/// Heading the robot holds at each arc-length sample of a travel segment.
///
/// `fractions` is the progress through the segment at each sample, used by
/// linear heading interpolation. `carried` is the heading the robot arrives
/// with, held on zero-length tangential segments.
pub fn heading_samples(
    heading: HeadingMode,
    samples: &[ArcSample],
    fractions: &[f64],
    length: f64,
    carried: f64,
) -> Vec<f64> {
    match heading {
        HeadingMode::Tangential { .. } if length <= EPSILON => vec![carried; samples.len()],
        HeadingMode::Tangential { reverse } => samples
            .iter()
            .map(|s| {
                if reverse {
                    normalize_degrees(s.tangent_heading + 180.0)
                } else {
                    s.tangent_heading
                }
            })
            .collect(),
        HeadingMode::Linear { start_deg, end_deg } => fractions
            .iter()
            .map(|f| normalize_degrees(start_deg + (end_deg - start_deg) * f))
            .collect(),
        HeadingMode::Constant { degrees } => vec![normalize_degrees(degrees); samples.len()],
    }
}

/// Share of the segment's travel time elapsed at each sample. Segments that
/// take no time fall back to the sample index.
pub(crate) fn progress_fractions(samples: &[ArcSample], profile: &TrapezoidProfile) -> Vec<f64> {
    let total = profile.total_time();
    let last = samples.len().saturating_sub(1).max(1) as f64;
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if total > EPSILON {
                (profile.time_at_distance(s.cumulative_length) / total).clamp(0.0, 1.0)
            } else {
                i as f64 / last
            }
        })
        .collect()
}

/// Converts geometry plus kinematic limits into a timeline.
#[derive(Debug, Clone)]
pub struct MotionProfiler {
    limits: KinematicLimits,
    settings: ProfilerSettings,
}

impl MotionProfiler {
    /// Fails fast when the velocity or acceleration limit is missing or not
    /// positive, or when a sampling resolution is zero.
    pub fn new(robot: &RobotSettings, settings: ProfilerSettings) -> pathkit_core::Result<Self> {
        let limits = robot.limits()?;
        for resolution in [settings.resolution, settings.composite_steps] {
            if resolution == 0 {
                return Err(PlannerError::InvalidResolution { resolution }.into());
            }
        }
        Ok(Self { limits, settings })
    }

    pub fn limits(&self) -> &KinematicLimits {
        &self.limits
    }

    pub fn settings(&self) -> &ProfilerSettings {
        &self.settings
    }

    /// Profile the whole sequence. An empty sequence travels every segment
    /// in list order.
    pub fn profile_path(
        &self,
        start: &StartPoint,
        segments: &[PathSegment],
        sequence: &[SequenceItem],
    ) -> TimePrediction {
        let resolved = resolve(segments, sequence);
        let wait_groups = wait_duration_groups(sequence);

        let mut position = start.point();
        let mut heading = normalize_degrees(start.heading);
        let mut clock = 0.0;
        let mut total_distance = 0.0;
        let mut timeline = Vec::with_capacity(resolved.steps.len());

        for step in &resolved.steps {
            let mut event = match *step {
                Step::Travel {
                    line_index,
                    segment,
                    end,
                } => {
                    let mut event = self.profile_segment(position, heading, segment, end);
                    event.line_index = Some(line_index);
                    position = end.point();
                    event
                }
                Step::Wait {
                    id,
                    name,
                    duration_ms,
                    markers,
                } => {
                    let ms = if name.is_empty() {
                        duration_ms
                    } else {
                        wait_groups.get(name).copied().unwrap_or(duration_ms)
                    };
                    let mut event = stationary(EventKind::Wait, position, heading, heading);
                    event.duration = clamp_duration(ms / 1000.0);
                    event.wait_id = Some(id.to_string());
                    event.name = name.to_string();
                    event.markers = markers.to_vec();
                    event
                }
                Step::Rotate {
                    id,
                    name,
                    degrees,
                    markers,
                } => {
                    let target = if degrees.is_finite() {
                        normalize_degrees(degrees)
                    } else {
                        heading
                    };
                    let mut event = stationary(EventKind::Rotate, position, heading, target);
                    event.duration = clamp_duration(self.rotation_time(heading, target));
                    event.rotate_id = Some(id.to_string());
                    event.name = name.to_string();
                    event.markers = markers.to_vec();
                    event
                }
            };

            event.start_time = clock;
            clock += event.duration;
            total_distance += event.distance;
            heading = event.end_heading;

            tracing::debug!(
                "{} event at {:.3}s lasting {:.3}s",
                event.kind,
                event.start_time,
                event.duration
            );
            timeline.push(event);
        }

        TimePrediction {
            total_time: clock,
            total_distance,
            timeline,
            skipped_segments: resolved.skipped,
        }
    }

    /// Profile one travel segment starting at `start` with the robot facing
    /// `carried_heading`. The returned event starts at time zero.
    pub fn profile_segment(
        &self,
        start: Point,
        carried_heading: f64,
        segment: &PathSegment,
        end: EndPoint,
    ) -> TimelineEvent {
        let curve = Curve::new(start, &segment.control_points, end.point());
        let steps = steps_for(&curve, self.settings.resolution, self.settings.composite_steps);
        let samples = sample_curve(&curve, steps);
        let length = sampled_length(&samples);
        let profile = TrapezoidProfile::new(length, &self.limits);

        let mut motion_profile: Vec<f64> = samples
            .iter()
            .map(|s| profile.time_at_distance(s.cumulative_length))
            .collect();
        let mut velocity_profile: Vec<f64> = samples
            .iter()
            .map(|s| profile.velocity_at_distance(s.cumulative_length))
            .collect();
        let mut duration = motion_profile.last().copied().unwrap_or(0.0);

        if let HeadingMode::Linear { start_deg, end_deg } = end.heading {
            let turn_time = self.rotation_time_raw((end_deg - start_deg).abs());
            if self.settings.respect_angular_velocity
                && length > EPSILON
                && turn_time > duration
                && duration > EPSILON
            {
                let stretch = turn_time / duration;
                tracing::debug!(
                    "Segment '{}' stretched x{:.3} to respect angular velocity",
                    segment.id,
                    stretch
                );
                motion_profile.iter_mut().for_each(|t| *t *= stretch);
                velocity_profile.iter_mut().for_each(|v| *v /= stretch);
                duration = turn_time;
            }
        }

        // A stretch scales every time equally, so the fractions are unchanged.
        let fractions = progress_fractions(&samples, &profile);
        let heading_profile =
            heading_samples(end.heading, &samples, &fractions, length, carried_heading);

        let start_heading = heading_profile.first().copied().unwrap_or(carried_heading);
        let end_heading = heading_profile.last().copied().unwrap_or(carried_heading);

        TimelineEvent {
            kind: EventKind::Travel,
            start_time: 0.0,
            duration,
            line_index: None,
            segment_id: Some(segment.id.clone()),
            wait_id: None,
            rotate_id: None,
            name: segment.name.clone(),
            distance: length,
            start_heading,
            end_heading,
            motion_profile,
            velocity_profile,
            heading_profile,
            samples: samples.iter().map(|s| s.point).collect(),
            at_point: None,
            markers: segment.event_markers.clone(),
        }
    }

    /// Seconds to turn in place from `from` to `to` along the shortest arc.
    pub fn rotation_time(&self, from: f64, to: f64) -> f64 {
        self.rotation_time_raw(angular_difference(from, to).abs())
    }

    fn rotation_time_raw(&self, degrees: f64) -> f64 {
        match self.limits.max_angular_velocity {
            Some(omega) => degrees / omega,
            None => 0.0,
        }
    }
}

fn stationary(kind: EventKind, at: Point, start_heading: f64, end_heading: f64) -> TimelineEvent {
    TimelineEvent {
        kind,
        start_time: 0.0,
        duration: 0.0,
        line_index: None,
        segment_id: None,
        wait_id: None,
        rotate_id: None,
        name: String::new(),
        distance: 0.0,
        start_heading,
        end_heading,
        motion_profile: Vec::new(),
        velocity_profile: Vec::new(),
        heading_profile: Vec::new(),
        samples: Vec::new(),
        at_point: Some(at),
        markers: Vec::new(),
    }
}

fn clamp_duration(seconds: f64) -> f64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Profile a path in one call.
///
/// Fails with a configuration error when `maxVelocity` or `maxAcceleration`
/// is missing or not positive.
pub fn calculate_path_time(
    start: &StartPoint,
    segments: &[PathSegment],
    settings: &RobotSettings,
    sequence: &[SequenceItem],
) -> pathkit_core::Result<TimePrediction> {
    let profiler = MotionProfiler::new(settings, ProfilerSettings::default())?;
    Ok(profiler.profile_path(start, segments, sequence))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiler(v: f64, a: f64) -> MotionProfiler {
        MotionProfiler::new(&RobotSettings::new(v, a), ProfilerSettings::default()).unwrap()
    }

    #[test]
    fn test_rejects_missing_limits() {
        let settings = RobotSettings {
            max_acceleration: None,
            ..RobotSettings::default()
        };
        let err = MotionProfiler::new(&settings, ProfilerSettings::default()).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rejects_zero_resolution() {
        let settings = ProfilerSettings {
            resolution: 0,
            ..ProfilerSettings::default()
        };
        let err = MotionProfiler::new(&RobotSettings::default(), settings).unwrap_err();
        assert!(matches!(
            err,
            pathkit_core::Error::Planner(PlannerError::InvalidResolution { resolution: 0 })
        ));
    }

    #[test]
    fn test_straight_segment_profile() {
        let seg = PathSegment::line_to(100.0, 0.0);
        let end = seg.end_point.unwrap();
        let event = profiler(50.0, 100.0).profile_segment(Point::new(0.0, 0.0), 0.0, &seg, end);
        assert!((event.duration - 2.5).abs() < 1e-9);
        assert!((event.distance - 100.0).abs() < 1e-9);
        assert_eq!(event.motion_profile.len(), 101);
        assert_eq!(event.heading_profile.len(), 101);
        assert!(event
            .motion_profile
            .windows(2)
            .all(|w| w[1] >= w[0]));
        assert!(event.velocity_profile.iter().all(|v| *v <= 50.0 + 1e-9));
    }

    #[test]
    fn test_reverse_tangential_heading() {
        let seg = PathSegment::line_to(0.0, 50.0).with_heading(HeadingMode::Tangential { reverse: true });
        let end = seg.end_point.unwrap();
        let event = profiler(50.0, 100.0).profile_segment(Point::new(0.0, 0.0), 0.0, &seg, end);
        assert!(event.heading_profile.iter().all(|h| (h + 90.0).abs() < 1e-9));
    }

    #[test]
    fn test_linear_heading_stretches_when_turn_is_slow() {
        // 10in at 50in/s takes well under a second; 180deg at 90deg/s takes 2s.
        let robot = RobotSettings::new(50.0, 100.0).with_angular_velocity(Some(90.0));
        let profiler = MotionProfiler::new(&robot, ProfilerSettings::default()).unwrap();
        let seg = PathSegment::line_to(10.0, 0.0).with_heading(HeadingMode::Linear {
            start_deg: 0.0,
            end_deg: 180.0,
        });
        let end = seg.end_point.unwrap();
        let event = profiler.profile_segment(Point::new(0.0, 0.0), 0.0, &seg, end);
        assert!((event.duration - 2.0).abs() < 1e-9);
        assert!((event.end_heading - 180.0).abs() < 1e-9);
        assert!((event.motion_profile.last().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_heading_follows_time_fraction() {
        let seg = PathSegment::line_to(100.0, 0.0).with_heading(HeadingMode::Linear {
            start_deg: 0.0,
            end_deg: 90.0,
        });
        let end = seg.end_point.unwrap();
        let event = profiler(50.0, 100.0).profile_segment(Point::new(0.0, 0.0), 0.0, &seg, end);

        for (heading, t) in event.heading_profile.iter().zip(&event.motion_profile) {
            assert!((heading - 90.0 * t / event.duration).abs() < 1e-9);
        }
        // 10in in, still accelerating: ahead of the 9deg a distance split gives
        let early = event.heading_profile[10];
        assert!((early - 90.0 * 0.2_f64.sqrt() / 2.5).abs() < 1e-9);
        assert!(early > 15.0);
    }

    #[test]
    fn test_non_finite_rotate_target_keeps_heading() {
        let start = StartPoint::new(0.0, 0.0, 30.0);
        for degrees in [f64::NAN, f64::INFINITY] {
            let sequence = [SequenceItem::rotate("spin", degrees)];
            let prediction = profiler(50.0, 100.0).profile_path(&start, &[], &sequence);
            let event = &prediction.timeline[0];
            assert_eq!(event.duration, 0.0);
            assert_eq!(event.start_heading, 30.0);
            assert_eq!(event.end_heading, 30.0);
            assert_eq!(prediction.total_time, 0.0);
        }
    }

    #[test]
    fn test_zero_length_keeps_heading() {
        let seg = PathSegment::line_to(5.0, 5.0);
        let end = seg.end_point.unwrap();
        let event = profiler(50.0, 100.0).profile_segment(Point::new(5.0, 5.0), 42.0, &seg, end);
        assert_eq!(event.duration, 0.0);
        assert_eq!(event.distance, 0.0);
        assert_eq!(event.end_heading, 42.0);
    }

    #[test]
    fn test_rotation_time() {
        let robot = RobotSettings::new(50.0, 100.0).with_angular_velocity(Some(90.0));
        let profiler = MotionProfiler::new(&robot, ProfilerSettings::default()).unwrap();
        assert!((profiler.rotation_time(170.0, -100.0) - 1.0).abs() < 1e-9);

        let robot = robot.with_angular_velocity(None);
        let profiler = MotionProfiler::new(&robot, ProfilerSettings::default()).unwrap();
        assert_eq!(profiler.rotation_time(0.0, 90.0), 0.0);
    }

    #[test]
    fn test_negative_wait_clamped() {
        let prediction = profiler(50.0, 100.0).profile_path(
            &StartPoint::default(),
            &[],
            &[SequenceItem::wait("", -300.0), SequenceItem::wait("", f64::NAN)],
        );
        assert_eq!(prediction.timeline.len(), 2);
        assert_eq!(prediction.total_time, 0.0);
    }
}
