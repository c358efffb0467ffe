//! Property tests for the motion profiler

use pathkit_core::{PathSegment, Point, RobotSettings, StartPoint};
use pathkit_planner::calculate_path_time;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    0.0..144.0f64
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn segment() -> impl Strategy<Value = PathSegment> {
    (point(), prop::collection::vec(point(), 0..5)).prop_map(|(end, controls)| {
        PathSegment::line_to(end.x, end.y).with_control_points(controls)
    })
}

proptest! {
    #[test]
    fn profiling_is_deterministic(
        start in point(),
        segments in prop::collection::vec(segment(), 1..5),
        v in 1.0..200.0f64,
        a in 1.0..400.0f64,
    ) {
        let start = StartPoint::new(start.x, start.y, 0.0);
        let settings = RobotSettings::new(v, a);
        let first = calculate_path_time(&start, &segments, &settings, &[]).unwrap();
        let second = calculate_path_time(&start, &segments, &settings, &[]).unwrap();
        prop_assert_eq!(first.total_time.to_bits(), second.total_time.to_bits());
        prop_assert_eq!(first.total_distance.to_bits(), second.total_distance.to_bits());
    }

    #[test]
    fn straight_segment_respects_velocity_bound(
        start in point(),
        end in point(),
        v in 1.0..200.0f64,
        a in 1.0..400.0f64,
    ) {
        let length = start.distance_to(&end);
        let segments = vec![PathSegment::line_to(end.x, end.y)];
        let prediction = calculate_path_time(
            &StartPoint::new(start.x, start.y, 0.0),
            &segments,
            &RobotSettings::new(v, a),
            &[],
        )
        .unwrap();
        prop_assert!(prediction.total_time + 1e-9 >= length / v);
        prop_assert!(prediction.total_time.is_finite());
    }

    #[test]
    fn faster_robot_is_never_slower(
        segments in prop::collection::vec(segment(), 1..4),
        v in 1.0..100.0f64,
        boost in 0.0..100.0f64,
        a in 1.0..400.0f64,
    ) {
        let start = StartPoint::default();
        let slow = calculate_path_time(&start, &segments, &RobotSettings::new(v, a), &[]).unwrap();
        let fast = calculate_path_time(&start, &segments, &RobotSettings::new(v + boost, a), &[]).unwrap();
        prop_assert!(fast.total_time <= slow.total_time + 1e-9);
    }

    #[test]
    fn motion_profiles_never_decrease(
        segments in prop::collection::vec(segment(), 1..4),
        v in 1.0..200.0f64,
        a in 1.0..400.0f64,
    ) {
        let prediction = calculate_path_time(
            &StartPoint::default(),
            &segments,
            &RobotSettings::new(v, a),
            &[],
        )
        .unwrap();
        for event in &prediction.timeline {
            prop_assert!(event.motion_profile.windows(2).all(|w| w[1] + 1e-12 >= w[0]));
            prop_assert!(event.velocity_profile.iter().all(|s| *s <= v + 1e-9));
        }
    }
}
