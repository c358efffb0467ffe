//! Obstacle and keep-in zone checks against sampled paths.
//!
//! A sample violates an `obstacle` polygon when it lies inside it and a
//! `keep-in` polygon when it lies outside it. Every violating
//! (sample, shape) pair adds one unit of penalty, so the penalty is zero
//! exactly when no sample violates any shape. Polygons with fewer than
//! three vertices are ignored.

use pathkit_core::angle::normalize_degrees;
use pathkit_core::constants::EPSILON;
use pathkit_core::{
    EndPoint, KinematicLimits, PathSegment, Point, RobotSettings, SequenceItem, Shape, ShapeKind,
    StartPoint,
};
use pathkit_settings::CollisionSettings;

use crate::geometry::{sample_curve, sampled_length, Curve};
use crate::profiler::{heading_samples, progress_fractions, steps_for};
use crate::sequence::{resolve, Step};
use crate::trapezoid::TrapezoidProfile;

/// Ray-casting parity test. Fewer than three vertices is never "inside".
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether `point` breaks the rule of `shape`. Invalid shapes never do.
pub fn violates(point: Point, shape: &Shape) -> bool {
    if !shape.is_valid() {
        return false;
    }
    let inside = point_in_polygon(point, &shape.vertices);
    match shape.kind {
        ShapeKind::Obstacle => inside,
        ShapeKind::KeepIn => !inside,
    }
}

/// Count of violating (sample, shape) pairs.
pub fn segment_penalty(samples: &[Point], shapes: &[Shape]) -> f64 {
    let valid: Vec<&Shape> = shapes.iter().filter(|s| s.is_valid()).collect();
    samples
        .iter()
        .map(|p| valid.iter().filter(|shape| violates(*p, shape)).count())
        .sum::<usize>() as f64
}

/// Shapes the checker will actually test, warning about the rest.
pub fn valid_shapes(shapes: &[Shape]) -> Vec<Shape> {
    shapes
        .iter()
        .filter(|shape| {
            if !shape.is_valid() {
                tracing::warn!(
                    "Ignoring {} '{}' with {} vertices",
                    shape.kind,
                    shape.id,
                    shape.vertices.len()
                );
            }
            shape.is_valid()
        })
        .cloned()
        .collect()
}

/// Samples whole paths and scores them against a shape set.
#[derive(Debug, Clone)]
pub struct CollisionChecker {
    settings: CollisionSettings,
    composite_steps: usize,
    half_length: f64,
    half_width: f64,
    limits: Option<KinematicLimits>,
}

impl CollisionChecker {
    pub fn new(settings: CollisionSettings, robot: &RobotSettings, composite_steps: usize) -> Self {
        Self {
            settings,
            composite_steps: composite_steps.max(1),
            half_length: robot.robot_length.max(0.0) / 2.0,
            half_width: robot.robot_width.max(0.0) / 2.0,
            limits: robot.limits().ok(),
        }
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Points tested for one travel segment: the centerline samples, plus
    /// the robot's corners at each sample when footprint inflation is on.
    ///
    /// Corners use the same headings the profiler reports for the segment.
    /// `carried` is the heading the robot arrives with.
    pub fn segment_points(
        &self,
        start: Point,
        carried: f64,
        segment: &PathSegment,
        end: EndPoint,
    ) -> Vec<Point> {
        self.sample_segment(start, carried, segment, end).0
    }

    /// Tested points plus the heading the robot leaves the segment with.
    fn sample_segment(
        &self,
        start: Point,
        carried: f64,
        segment: &PathSegment,
        end: EndPoint,
    ) -> (Vec<Point>, f64) {
        let curve = Curve::new(start, &segment.control_points, end.point());
        let steps = steps_for(&curve, self.settings.sample_resolution, self.composite_steps);
        let samples = sample_curve(&curve, steps);

        if !self.settings.inflate_footprint {
            return (samples.iter().map(|s| s.point).collect(), carried);
        }

        let length = sampled_length(&samples);
        let fractions = match &self.limits {
            Some(limits) => progress_fractions(&samples, &TrapezoidProfile::new(length, limits)),
            None => {
                let last = samples.len().saturating_sub(1).max(1) as f64;
                (0..samples.len()).map(|i| i as f64 / last).collect()
            }
        };
        let headings = heading_samples(end.heading, &samples, &fractions, length, carried);
        let leaving = headings.last().copied().unwrap_or(carried);

        let mut points = Vec::with_capacity(samples.len() * 5);
        for (sample, heading) in samples.iter().zip(headings) {
            points.push(sample.point);
            points.extend(self.corners(sample.point, heading));
        }
        (points, leaving)
    }

    /// Corners of the robot rectangle centered on `center` facing `heading`.
    pub fn corners(&self, center: Point, heading: f64) -> [Point; 4] {
        let (sin, cos) = heading.to_radians().sin_cos();
        let offset = |along: f64, across: f64| {
            Point::new(
                center.x + along * cos - across * sin,
                center.y + along * sin + across * cos,
            )
        };
        let (l, w) = (self.half_length, self.half_width);
        [offset(l, w), offset(l, -w), offset(-l, -w), offset(-l, w)]
    }

    /// Total penalty of the travel items of a sequence.
    pub fn path_penalty(
        &self,
        start: &StartPoint,
        segments: &[PathSegment],
        sequence: &[SequenceItem],
        shapes: &[Shape],
    ) -> f64 {
        if !shapes.iter().any(Shape::is_valid) {
            return 0.0;
        }

        let resolved = resolve(segments, sequence);
        let mut position = start.point();
        let mut heading = normalize_degrees(start.heading);
        let mut penalty = 0.0;
        for step in &resolved.steps {
            match *step {
                Step::Travel { segment, end, .. } => {
                    let (points, leaving) = self.sample_segment(position, heading, segment, end);
                    penalty += segment_penalty(&points, shapes);
                    heading = leaving;
                    position = end.point();
                }
                Step::Rotate { degrees, .. } if degrees.is_finite() => {
                    heading = normalize_degrees(degrees);
                }
                _ => {}
            }
        }
        penalty
    }

    pub fn is_collision_free(
        &self,
        start: &StartPoint,
        segments: &[PathSegment],
        sequence: &[SequenceItem],
        shapes: &[Shape],
    ) -> bool {
        self.path_penalty(start, segments, sequence, shapes) <= EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::MotionProfiler;
    use pathkit_core::HeadingMode;
    use pathkit_settings::ProfilerSettings;

    fn square(min: f64, max: f64) -> Vec<Point> {
        vec![
            Point::new(min, min),
            Point::new(max, min),
            Point::new(max, max),
            Point::new(min, max),
        ]
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square(0.0, 10.0);
        assert!(point_in_polygon(Point::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Point::new(-1.0, 5.0), &sq));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape open at the top
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(30.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(20.0, 30.0),
            Point::new(20.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 30.0),
            Point::new(0.0, 30.0),
        ];
        assert!(point_in_polygon(Point::new(5.0, 20.0), &u));
        assert!(!point_in_polygon(Point::new(15.0, 20.0), &u));
    }

    #[test]
    fn test_degenerate_polygon_ignored() {
        let line = Shape::obstacle(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]);
        assert!(!violates(Point::new(5.0, 5.0), &line));
        assert_eq!(segment_penalty(&[Point::new(5.0, 5.0)], &[line.clone()]), 0.0);
        assert!(valid_shapes(&[line]).is_empty());
    }

    #[test]
    fn test_keep_in_penalizes_outside() {
        let zone = Shape::keep_in(square(0.0, 10.0));
        let samples = [Point::new(5.0, 5.0), Point::new(20.0, 5.0), Point::new(30.0, 5.0)];
        assert_eq!(segment_penalty(&samples, &[zone]), 2.0);
    }

    #[test]
    fn test_penalty_counts_each_shape() {
        let a = Shape::obstacle(square(0.0, 10.0));
        let b = Shape::obstacle(square(4.0, 6.0));
        assert_eq!(segment_penalty(&[Point::new(5.0, 5.0)], &[a, b]), 2.0);
    }

    #[test]
    fn test_corners_follow_heading() {
        let robot = RobotSettings {
            robot_length: 20.0,
            robot_width: 10.0,
            ..RobotSettings::default()
        };
        let checker = CollisionChecker::new(CollisionSettings::default(), &robot, 100);
        let corners = checker.corners(Point::new(50.0, 50.0), 90.0);
        // facing +y, the long side is vertical
        let ys: Vec<f64> = corners.iter().map(|c| c.y).collect();
        assert!(ys.iter().any(|y| (y - 60.0).abs() < 1e-9));
        assert!(ys.iter().any(|y| (y - 40.0).abs() < 1e-9));
        assert!(corners.iter().all(|c| (c.x - 45.0).abs() < 1e-9 || (c.x - 55.0).abs() < 1e-9));
    }

    #[test]
    fn test_footprint_catches_near_miss() {
        // Centerline passes 3in beside the obstacle; an 18in wide robot clips it.
        let obstacle = Shape::rectangle(
            Point::new(40.0, 53.0),
            Point::new(60.0, 70.0),
            ShapeKind::Obstacle,
        );
        let segments = vec![PathSegment::line_to(100.0, 50.0)];
        let start = StartPoint::new(0.0, 50.0, 0.0);

        let plain = CollisionChecker::new(CollisionSettings::default(), &RobotSettings::default(), 100);
        assert_eq!(plain.path_penalty(&start, &segments, &[], &[obstacle.clone()]), 0.0);

        let inflated = CollisionChecker::new(
            CollisionSettings {
                inflate_footprint: true,
                ..CollisionSettings::default()
            },
            &RobotSettings::default(),
            100,
        );
        assert!(inflated.path_penalty(&start, &segments, &[], &[obstacle]) > 0.0);
    }

    #[test]
    fn test_footprint_uses_profiled_headings() {
        // Long narrow robot so a wrong heading moves the corners a lot.
        let robot = RobotSettings {
            robot_length: 40.0,
            robot_width: 4.0,
            ..RobotSettings::new(50.0, 100.0)
        };
        let checker = CollisionChecker::new(
            CollisionSettings {
                inflate_footprint: true,
                sample_resolution: 20,
                ..CollisionSettings::default()
            },
            &robot,
            100,
        );
        let profiler = MotionProfiler::new(
            &robot,
            ProfilerSettings {
                resolution: 20,
                ..ProfilerSettings::default()
            },
        )
        .unwrap();

        // 270deg the long way round, not the 90deg shortcut
        let seg = PathSegment::line_to(120.0, 72.0).with_heading(HeadingMode::Linear {
            start_deg: 0.0,
            end_deg: 270.0,
        });
        let end = seg.end_point.unwrap();
        let start = Point::new(20.0, 72.0);
        let event = profiler.profile_segment(start, 0.0, &seg, end);
        let points = checker.segment_points(start, 0.0, &seg, end);

        assert_eq!(points.len(), event.samples.len() * 5);
        for (i, chunk) in points.chunks(5).enumerate() {
            let expected = checker.corners(event.samples[i], event.heading_profile[i]);
            for (got, want) in chunk[1..].iter().zip(expected) {
                assert!((got.x - want.x).abs() < 1e-6 && (got.y - want.y).abs() < 1e-6);
            }
        }

        // halfway through the travel time the robot faces 135deg
        assert!((event.heading_profile[10] - 135.0).abs() < 1e-6);
        let mid = checker.corners(Point::new(70.0, 72.0), 135.0);
        for (got, want) in points[51..55].iter().zip(mid) {
            assert!((got.x - want.x).abs() < 1e-6 && (got.y - want.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_footprint_carries_heading_through_rotate() {
        // A zero-length tangential hop keeps the heading from the rotate,
        // which swings the robot's nose into the box above it.
        let robot = RobotSettings {
            robot_length: 40.0,
            robot_width: 4.0,
            ..RobotSettings::new(50.0, 100.0)
        };
        let checker = CollisionChecker::new(
            CollisionSettings {
                inflate_footprint: true,
                ..CollisionSettings::default()
            },
            &robot,
            100,
        );
        let obstacle = Shape::rectangle(
            Point::new(65.0, 85.0),
            Point::new(75.0, 95.0),
            ShapeKind::Obstacle,
        );
        let start = StartPoint::new(70.0, 72.0, 0.0);
        let hop = vec![PathSegment::line_to(70.0, 72.0).with_id("hop")];

        assert_eq!(checker.path_penalty(&start, &hop, &[], &[obstacle.clone()]), 0.0);

        let turned = vec![
            SequenceItem::rotate("r", 90.0),
            SequenceItem::path("hop"),
        ];
        assert!(checker.path_penalty(&start, &hop, &turned, &[obstacle]) > 0.0);
    }
}
