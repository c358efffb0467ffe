use serde::{Deserialize, Serialize};

use super::{new_id, Point};

/// Rule governing robot orientation over a travel segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "heading", rename_all = "lowercase")]
pub enum HeadingMode {
    /// Follow the curve tangent, flipped 180° when `reverse` is set.
    Tangential {
        #[serde(default)]
        reverse: bool,
    },
    /// Interpolate between two headings over the segment's duration.
    Linear {
        #[serde(rename = "startDeg")]
        start_deg: f64,
        #[serde(rename = "endDeg")]
        end_deg: f64,
    },
    /// Hold one heading for the whole segment.
    Constant { degrees: f64 },
}

impl Default for HeadingMode {
    fn default() -> Self {
        Self::Tangential { reverse: false }
    }
}

/// The terminal point of a segment together with its heading rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndPoint {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub heading: HeadingMode,
}

impl EndPoint {
    pub fn new(x: f64, y: f64, heading: HeadingMode) -> Self {
        Self { x, y, heading }
    }

    pub fn tangential(x: f64, y: f64) -> Self {
        Self::new(x, y, HeadingMode::default())
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_point(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

/// A named instant anchored at a fractional position of its owning item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMarker {
    #[serde(default = "new_id")]
    pub id: String,
    pub name: String,
    /// Fraction of the owning item, in `[0, 1]`.
    pub position: f64,
}

impl EventMarker {
    pub fn new(name: impl Into<String>, position: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            position,
        }
    }

    /// Position clamped into `[0, 1]`; non-finite positions map to 0.
    pub fn clamped_position(&self) -> f64 {
        if self.position.is_finite() {
            self.position.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One travel unit of the path.
///
/// The start point is implicit: it is wherever the previous travel item ended.
/// Zero control points is a straight line, one or two a quadratic/cubic
/// Bézier, three or more a single higher-degree composite curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathSegment {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub end_point: Option<EndPoint>,
    #[serde(default)]
    pub control_points: Vec<Point>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub event_markers: Vec<EventMarker>,
}

impl PathSegment {
    pub fn new(end_point: EndPoint) -> Self {
        Self {
            id: new_id(),
            name: String::new(),
            end_point: Some(end_point),
            control_points: Vec::new(),
            locked: false,
            event_markers: Vec::new(),
        }
    }

    /// Straight tangential segment ending at `(x, y)`.
    pub fn line_to(x: f64, y: f64) -> Self {
        Self::new(EndPoint::tangential(x, y))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_control_points(mut self, control_points: Vec<Point>) -> Self {
        self.control_points = control_points;
        self
    }

    pub fn with_heading(mut self, heading: HeadingMode) -> Self {
        if let Some(end) = self.end_point.as_mut() {
            end.heading = heading;
        }
        self
    }

    pub fn with_marker(mut self, marker: EventMarker) -> Self {
        self.event_markers.push(marker);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn is_straight(&self) -> bool {
        self.control_points.is_empty()
    }
}
