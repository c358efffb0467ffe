//! Path geometry: curve evaluation and arc-length sampling.
//!
//! A segment is described by its implicit start, its ordered control points,
//! and its end point:
//!
//! | control points | curve |
//! |---|---|
//! | 0 | straight line |
//! | 1 | quadratic Bézier, promoted to the equivalent cubic |
//! | 2 | cubic Bézier |
//! | 3+ | one Bézier of degree `n` over `[start, ..controls, end]` |
//!
//! Everything here is a pure function of its inputs.

use lyon::geom::{point as lpoint, CubicBezierSegment, LineSegment, QuadraticBezierSegment};
use serde::{Deserialize, Serialize};

use pathkit_core::angle::{angular_difference, heading_of};
use pathkit_core::constants::EPSILON;
use pathkit_core::Point;

/// A segment's curve, ready to evaluate.
#[derive(Debug, Clone)]
pub enum Curve {
    Line(LineSegment<f64>),
    Cubic(CubicBezierSegment<f64>),
    /// Control polygon of a degree `len - 1` Bézier.
    Composite(Vec<Point>),
}

fn to_lyon(p: Point) -> lyon::geom::Point<f64> {
    lpoint(p.x, p.y)
}

fn from_lyon(p: lyon::geom::Point<f64>) -> Point {
    Point::new(p.x, p.y)
}

impl Curve {
    pub fn new(start: Point, control_points: &[Point], end: Point) -> Self {
        match control_points {
            [] => Curve::Line(LineSegment {
                from: to_lyon(start),
                to: to_lyon(end),
            }),
            [ctrl] => Curve::Cubic(
                QuadraticBezierSegment {
                    from: to_lyon(start),
                    ctrl: to_lyon(*ctrl),
                    to: to_lyon(end),
                }
                .to_cubic(),
            ),
            [ctrl1, ctrl2] => Curve::Cubic(CubicBezierSegment {
                from: to_lyon(start),
                ctrl1: to_lyon(*ctrl1),
                ctrl2: to_lyon(*ctrl2),
                to: to_lyon(end),
            }),
            _ => {
                let mut polygon = Vec::with_capacity(control_points.len() + 2);
                polygon.push(start);
                polygon.extend_from_slice(control_points);
                polygon.push(end);
                Curve::Composite(polygon)
            }
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Curve::Composite(_))
    }

    /// Point at parameter `t`, clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Line(line) => from_lyon(line.sample(t)),
            Curve::Cubic(cubic) => from_lyon(cubic.sample(t)),
            Curve::Composite(polygon) => de_casteljau(polygon, t),
        }
    }

    /// First derivative `(dx/dt, dy/dt)` at parameter `t`.
    pub fn derivative(&self, t: f64) -> (f64, f64) {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Line(line) => {
                let v = line.to_vector();
                (v.x, v.y)
            }
            Curve::Cubic(cubic) => {
                let v = cubic.derivative(t);
                (v.x, v.y)
            }
            Curve::Composite(polygon) => {
                let degree = (polygon.len() - 1) as f64;
                let hodograph: Vec<Point> = polygon
                    .windows(2)
                    .map(|w| Point::new(degree * (w[1].x - w[0].x), degree * (w[1].y - w[0].y)))
                    .collect();
                let d = de_casteljau(&hodograph, t);
                (d.x, d.y)
            }
        }
    }
}

/// Evaluate the Bézier with the given control polygon at `t`.
fn de_casteljau(polygon: &[Point], t: f64) -> Point {
    let mut work = polygon.to_vec();
    let n = work.len();
    if n == 0 {
        return Point::default();
    }
    for level in 1..n {
        for i in 0..n - level {
            work[i] = work[i].lerp(&work[i + 1], t);
        }
    }
    work[0]
}

/// Point on the segment at normalized parameter `t`.
pub fn evaluate(t: f64, start: Point, control_points: &[Point], end: Point) -> Point {
    Curve::new(start, control_points, end).evaluate(t)
}

/// One arc-length sample of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcSample {
    pub point: Point,
    /// Polyline length from the segment start up to this sample.
    pub cumulative_length: f64,
    /// Direction of travel in degrees.
    pub tangent_heading: f64,
}

/// Sample a segment at `resolution` equal parameter steps (`resolution + 1`
/// samples, both ends included), accumulating chord length.
///
/// A resolution of zero is treated as one step.
pub fn sample_arc_length(
    start: Point,
    control_points: &[Point],
    end: Point,
    resolution: usize,
) -> Vec<ArcSample> {
    let curve = Curve::new(start, control_points, end);
    sample_curve(&curve, resolution)
}

pub fn sample_curve(curve: &Curve, resolution: usize) -> Vec<ArcSample> {
    let steps = resolution.max(1);
    let points: Vec<Point> = (0..=steps)
        .map(|i| curve.evaluate(i as f64 / steps as f64))
        .collect();

    let mut samples = Vec::with_capacity(points.len());
    let mut cumulative = 0.0;
    let mut last_heading: Option<f64> = None;

    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            cumulative += points[i - 1].distance_to(p);
        }

        let (dx, dy) = curve.derivative(i as f64 / steps as f64);
        let heading = if dx.hypot(dy) > EPSILON {
            Some(heading_of(dx, dy))
        } else {
            chord_heading(&points, i)
        };
        let heading = heading.or(last_heading).unwrap_or(0.0);
        last_heading = Some(heading);

        samples.push(ArcSample {
            point: *p,
            cumulative_length: cumulative,
            tangent_heading: heading,
        });
    }

    samples
}

/// Direction of the chord leaving sample `i` (or entering it, at the end).
fn chord_heading(points: &[Point], i: usize) -> Option<f64> {
    let forward = points.get(i + 1).map(|next| (points[i], *next));
    let backward = i.checked_sub(1).map(|prev| (points[prev], points[i]));
    [forward, backward]
        .into_iter()
        .flatten()
        .find(|(a, b)| a.distance_to(b) > EPSILON)
        .map(|(a, b)| heading_of(b.x - a.x, b.y - a.y))
}

/// Total polyline length of a sample list.
pub fn sampled_length(samples: &[ArcSample]) -> f64 {
    samples.last().map(|s| s.cumulative_length).unwrap_or(0.0)
}

/// Per-segment statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentAnalysis {
    pub steps: Vec<ArcSample>,
    pub length: f64,
    /// Shortest turn from `start_heading` to the final tangent, degrees.
    pub net_rotation: f64,
    /// Signed turning of the tangent accumulated along the curve, degrees.
    pub tangent_rotation: f64,
    pub start_heading: f64,
}

/// Sample a segment and summarize how far it runs and how much it turns.
pub fn analyze_segment(
    start: Point,
    control_points: &[Point],
    end: Point,
    resolution: usize,
    start_heading: f64,
) -> SegmentAnalysis {
    let steps = sample_arc_length(start, control_points, end, resolution);
    let length = sampled_length(&steps);

    let tangent_rotation = steps
        .windows(2)
        .map(|w| angular_difference(w[0].tangent_heading, w[1].tangent_heading))
        .sum();
    let net_rotation = steps
        .last()
        .map(|s| angular_difference(start_heading, s.tangent_heading))
        .unwrap_or(0.0);

    SegmentAnalysis {
        steps,
        length,
        net_rotation,
        tangent_rotation,
        start_heading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_line_evaluation() {
        let p = evaluate(0.25, Point::new(0.0, 0.0), &[], Point::new(100.0, 40.0));
        assert!(close(p.x, 25.0) && close(p.y, 10.0));
    }

    #[test]
    fn test_quadratic_promoted_to_cubic_matches_quadratic_formula() {
        let start = Point::new(0.0, 0.0);
        let ctrl = Point::new(50.0, 100.0);
        let end = Point::new(100.0, 0.0);
        let t: f64 = 0.3;
        let expected_x = (1.0 - t).powi(2) * start.x + 2.0 * (1.0 - t) * t * ctrl.x + t * t * end.x;
        let expected_y = (1.0 - t).powi(2) * start.y + 2.0 * (1.0 - t) * t * ctrl.y + t * t * end.y;
        let p = evaluate(t, start, &[ctrl], end);
        assert!(close(p.x, expected_x));
        assert!(close(p.y, expected_y));
    }

    #[test]
    fn test_composite_endpoints_and_symmetry() {
        let start = Point::new(0.0, 0.0);
        let controls = [
            Point::new(20.0, 40.0),
            Point::new(50.0, 60.0),
            Point::new(80.0, 40.0),
        ];
        let end = Point::new(100.0, 0.0);
        let curve = Curve::new(start, &controls, end);
        assert!(curve.is_composite());
        let first = curve.evaluate(0.0);
        let last = curve.evaluate(1.0);
        assert!(close(first.x, start.x) && close(first.y, start.y));
        assert!(close(last.x, end.x) && close(last.y, end.y));
        let mid = curve.evaluate(0.5);
        assert!(close(mid.x, 50.0));
        assert!(mid.y > 0.0);
    }

    #[test]
    fn test_sample_straight_line() {
        let samples = sample_arc_length(Point::new(0.0, 0.0), &[], Point::new(100.0, 0.0), 100);
        assert_eq!(samples.len(), 101);
        assert!(close(sampled_length(&samples), 100.0));
        assert!(samples.iter().all(|s| close(s.tangent_heading, 0.0)));
        assert!(samples
            .windows(2)
            .all(|w| w[1].cumulative_length >= w[0].cumulative_length));
    }

    #[test]
    fn test_zero_length_segment() {
        let p = Point::new(10.0, 10.0);
        let samples = sample_arc_length(p, &[], p, 20);
        assert_eq!(sampled_length(&samples), 0.0);
        assert!(samples.iter().all(|s| s.tangent_heading.is_finite()));
    }

    #[test]
    fn test_tangent_follows_curve() {
        // Quarter turn: leaves heading east, arrives heading north.
        let samples = sample_arc_length(
            Point::new(0.0, 0.0),
            &[Point::new(50.0, 0.0)],
            Point::new(50.0, 50.0),
            50,
        );
        assert!(close(samples[0].tangent_heading, 0.0));
        assert!(close(samples[50].tangent_heading, 90.0));
    }

    #[test]
    fn test_degenerate_start_tangent_uses_chord() {
        // Control point on the start point: derivative vanishes at t = 0.
        let samples = sample_arc_length(
            Point::new(0.0, 0.0),
            &[Point::new(0.0, 0.0)],
            Point::new(0.0, 30.0),
            10,
        );
        assert!(close(samples[0].tangent_heading, 90.0));
    }

    #[test]
    fn test_analyze_segment_quarter_turn() {
        let analysis = analyze_segment(
            Point::new(0.0, 0.0),
            &[Point::new(50.0, 0.0)],
            Point::new(50.0, 50.0),
            100,
            0.0,
        );
        assert_eq!(analysis.steps.len(), 101);
        assert!(analysis.length > 50.0 * std::f64::consts::SQRT_2);
        assert!(analysis.length < 100.0);
        assert!(close(analysis.tangent_rotation, 90.0));
        assert!(close(analysis.net_rotation, 90.0));
        assert_eq!(analysis.start_heading, 0.0);
    }
}
