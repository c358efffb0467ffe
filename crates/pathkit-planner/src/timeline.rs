//! Timeline output of the motion profiler and the queries collaborators run
//! against it.

use serde::{Deserialize, Serialize};

use pathkit_core::angle::{lerp_heading, normalize_degrees};
use pathkit_core::constants::EPSILON;
use pathkit_core::{EventMarker, Point};

/// What a timeline event does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Travel,
    Wait,
    Rotate,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Travel => write!(f, "travel"),
            Self::Wait => write!(f, "wait"),
            Self::Rotate => write!(f, "rotate"),
        }
    }
}

/// One non-macro sequence item placed on the time axis.
///
/// Travel events carry per-sample profiles, all of the same length:
/// `motion_profile` is elapsed seconds since `start_time`,
/// `velocity_profile` is inches per second and `heading_profile` degrees.
/// Waits and rotates leave the profiles empty and progress uniformly over
/// `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub start_time: f64,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub distance: f64,
    pub start_heading: f64,
    pub end_heading: f64,
    #[serde(default)]
    pub motion_profile: Vec<f64>,
    #[serde(default)]
    pub velocity_profile: Vec<f64>,
    #[serde(default)]
    pub heading_profile: Vec<f64>,
    /// Sample positions matching the profiles.
    #[serde(default)]
    pub samples: Vec<Point>,
    /// Where a wait or rotate happens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_point: Option<Point>,
    #[serde(default)]
    pub markers: Vec<EventMarker>,
}

impl TimelineEvent {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Seconds since `start_time` at which the robot reaches fraction
    /// `position` of this item.
    pub fn local_time_at(&self, position: f64) -> f64 {
        let position = if position.is_finite() {
            position.clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self.motion_profile.len() {
            0 | 1 => position * self.duration,
            n => {
                let scaled = position * (n - 1) as f64;
                let i = (scaled.floor() as usize).min(n - 2);
                let frac = scaled - i as f64;
                let a = self.motion_profile[i];
                let b = self.motion_profile[i + 1];
                a + (b - a) * frac
            }
        }
    }

    /// Absolute time of a marker at fraction `position` of this item.
    pub fn marker_time(&self, position: f64) -> f64 {
        self.start_time + self.local_time_at(position)
    }

    fn pose_at_local(&self, local: f64) -> (Point, f64) {
        let local = local.clamp(0.0, self.duration);

        // Deserialized events may carry profiles of different lengths; only
        // the indices present in both are used.
        let usable = self.samples.len().min(self.motion_profile.len());
        if usable == 0 {
            let point = self
                .samples
                .first()
                .copied()
                .or(self.at_point)
                .unwrap_or_default();
            let fraction = if self.duration > EPSILON {
                local / self.duration
            } else {
                1.0
            };
            return (point, lerp_heading(self.start_heading, self.end_heading, fraction));
        }

        let profile = &self.motion_profile[..usable];
        let last = usable - 1;
        // first sample whose time is past `local`
        let upper = profile.partition_point(|t| *t <= local).min(last);
        if upper == 0 {
            return (self.samples[0], self.heading_at(0));
        }
        let lower = upper - 1;
        let span = profile[upper] - profile[lower];
        let frac = if span > EPSILON {
            ((local - profile[lower]) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let point = self.samples[lower].lerp(&self.samples[upper], frac);
        let heading = lerp_heading(self.heading_at(lower), self.heading_at(upper), frac);
        (point, heading)
    }

    fn heading_at(&self, i: usize) -> f64 {
        self.heading_profile
            .get(i)
            .copied()
            .unwrap_or(self.end_heading)
    }
}

/// Robot pose at an instant of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub point: Point,
    pub heading: f64,
    /// Index of the timeline event active at that instant.
    pub event_index: usize,
}

/// A marker resolved to an absolute time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerTime {
    pub marker_id: String,
    pub name: String,
    pub event_index: usize,
    pub time: f64,
}

/// Profiler result for a whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePrediction {
    pub total_time: f64,
    pub total_distance: f64,
    pub timeline: Vec<TimelineEvent>,
    /// Segment ids that were referenced but skipped.
    #[serde(default)]
    pub skipped_segments: Vec<String>,
}

impl TimePrediction {
    /// Every marker on the timeline with its absolute time, in timeline order.
    pub fn marker_times(&self) -> Vec<MarkerTime> {
        self.timeline
            .iter()
            .enumerate()
            .flat_map(|(event_index, event)| {
                event.markers.iter().map(move |marker| MarkerTime {
                    marker_id: marker.id.clone(),
                    name: marker.name.clone(),
                    event_index,
                    time: event.marker_time(marker.clamped_position()),
                })
            })
            .collect()
    }

    /// Pose at `time` seconds, clamped to `[0, total_time]`.
    ///
    /// Returns `None` for an empty timeline.
    pub fn pose_at(&self, time: f64) -> Option<Pose> {
        let time = if time.is_finite() {
            time.clamp(0.0, self.total_time)
        } else {
            0.0
        };

        let event_index = self
            .timeline
            .iter()
            .position(|event| time < event.end_time())
            .or_else(|| self.timeline.len().checked_sub(1))?;

        let event = &self.timeline[event_index];
        let (point, heading) = event.pose_at_local(time - event.start_time);
        Some(Pose {
            point,
            heading: normalize_degrees(heading),
            event_index,
        })
    }

    pub fn event_count(&self, kind: EventKind) -> usize {
        self.timeline.iter().filter(|e| e.kind == kind).count()
    }
}
