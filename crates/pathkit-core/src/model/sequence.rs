use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{new_id, EventMarker};

/// One entry of the execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SequenceItem {
    /// Travel along the referenced path segment.
    #[serde(rename_all = "camelCase")]
    Path { segment_id: String },

    /// Hold position for a fixed time.
    ///
    /// Waits sharing a non-empty `name` share one duration: the first
    /// same-named wait in sequence order defines it.
    #[serde(rename_all = "camelCase")]
    Wait {
        #[serde(default = "new_id")]
        id: String,
        #[serde(default)]
        name: String,
        duration_ms: f64,
        #[serde(default)]
        event_markers: Vec<EventMarker>,
    },

    /// Turn in place to an absolute heading in degrees.
    #[serde(rename_all = "camelCase")]
    Rotate {
        #[serde(default = "new_id")]
        id: String,
        #[serde(default)]
        name: String,
        degrees: f64,
        #[serde(default)]
        event_markers: Vec<EventMarker>,
    },

    /// Opaque editor item; costs nothing and never reaches the timeline.
    #[serde(rename_all = "camelCase")]
    Macro {
        #[serde(default = "new_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
}

impl SequenceItem {
    pub fn path(segment_id: impl Into<String>) -> Self {
        Self::Path {
            segment_id: segment_id.into(),
        }
    }

    pub fn wait(name: impl Into<String>, duration_ms: f64) -> Self {
        Self::Wait {
            id: new_id(),
            name: name.into(),
            duration_ms,
            event_markers: Vec::new(),
        }
    }

    pub fn rotate(name: impl Into<String>, degrees: f64) -> Self {
        Self::Rotate {
            id: new_id(),
            name: name.into(),
            degrees,
            event_markers: Vec::new(),
        }
    }

    pub fn macro_item(name: impl Into<String>) -> Self {
        Self::Macro {
            id: new_id(),
            name: name.into(),
        }
    }

    /// Attach a marker to a wait or rotate. Other kinds are returned unchanged.
    pub fn with_marker(mut self, marker: EventMarker) -> Self {
        match &mut self {
            Self::Wait { event_markers, .. } | Self::Rotate { event_markers, .. } => {
                event_markers.push(marker)
            }
            Self::Path { .. } | Self::Macro { .. } => {}
        }
        self
    }
}

/// Collect the shared duration of every named wait group.
///
/// The first wait carrying a given name, in sequence order, defines the
/// group's duration. Unnamed waits never join a group.
pub fn wait_duration_groups(sequence: &[SequenceItem]) -> HashMap<String, f64> {
    let mut groups = HashMap::new();
    for item in sequence {
        if let SequenceItem::Wait {
            name, duration_ms, ..
        } = item
        {
            if !name.is_empty() {
                groups.entry(name.clone()).or_insert(*duration_ms);
            }
        }
    }
    groups
}

/// Return a copy of `sequence` where every wait named `name` lasts `duration_ms`.
pub fn synchronize_wait_durations(
    sequence: &[SequenceItem],
    name: &str,
    duration_ms: f64,
) -> Vec<SequenceItem> {
    sequence
        .iter()
        .cloned()
        .map(|mut item| {
            if let SequenceItem::Wait {
                name: item_name,
                duration_ms: item_duration,
                ..
            } = &mut item
            {
                if !name.is_empty() && item_name == name {
                    *item_duration = duration_ms;
                }
            }
            item
        })
        .collect()
}
