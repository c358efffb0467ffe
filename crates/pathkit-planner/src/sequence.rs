//! Resolve a sequence into the concrete steps the profiler and collision
//! checker walk.
//!
//! Macros drop out here, dangling segment references and segments without an
//! end point are reported and skipped, and an empty sequence expands to every
//! segment in list order.

use std::collections::HashMap;

use pathkit_core::{EndPoint, EventMarker, PathSegment, SequenceItem};

/// One executable step of a resolved sequence.
#[derive(Debug, Clone, Copy)]
pub enum Step<'a> {
    Travel {
        /// Index of the segment in the segment list.
        line_index: usize,
        segment: &'a PathSegment,
        end: EndPoint,
    },
    Wait {
        id: &'a str,
        name: &'a str,
        duration_ms: f64,
        markers: &'a [EventMarker],
    },
    Rotate {
        id: &'a str,
        name: &'a str,
        degrees: f64,
        markers: &'a [EventMarker],
    },
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedSequence<'a> {
    pub steps: Vec<Step<'a>>,
    /// Ids of segments that were referenced but could not be travelled.
    pub skipped: Vec<String>,
}

impl<'a> ResolvedSequence<'a> {
    pub fn travel_steps(&self) -> impl Iterator<Item = (usize, &'a PathSegment, EndPoint)> + '_ {
        self.steps.iter().filter_map(|step| match *step {
            Step::Travel {
                line_index,
                segment,
                end,
            } => Some((line_index, segment, end)),
            _ => None,
        })
    }
}

/// Walk `sequence` against `segments`.
///
/// When `sequence` is empty every segment is travelled once, in list order.
pub fn resolve<'a>(segments: &'a [PathSegment], sequence: &'a [SequenceItem]) -> ResolvedSequence<'a> {
    let mut resolved = ResolvedSequence::default();

    if sequence.is_empty() {
        for (line_index, segment) in segments.iter().enumerate() {
            push_travel(&mut resolved, line_index, segment);
        }
        return resolved;
    }

    let index: HashMap<&str, usize> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    for item in sequence {
        match item {
            SequenceItem::Path { segment_id } => match index.get(segment_id.as_str()) {
                Some(&line_index) => push_travel(&mut resolved, line_index, &segments[line_index]),
                None => {
                    tracing::warn!("Sequence references unknown segment '{}', skipping", segment_id);
                    resolved.skipped.push(segment_id.clone());
                }
            },
            SequenceItem::Wait {
                id,
                name,
                duration_ms,
                event_markers,
            } => resolved.steps.push(Step::Wait {
                id,
                name,
                duration_ms: *duration_ms,
                markers: event_markers,
            }),
            SequenceItem::Rotate {
                id,
                name,
                degrees,
                event_markers,
            } => resolved.steps.push(Step::Rotate {
                id,
                name,
                degrees: *degrees,
                markers: event_markers,
            }),
            SequenceItem::Macro { name, .. } => {
                tracing::trace!("Macro '{}' has no cost", name);
            }
        }
    }

    resolved
}

fn push_travel<'a>(resolved: &mut ResolvedSequence<'a>, line_index: usize, segment: &'a PathSegment) {
    match segment.end_point {
        Some(end) => resolved.steps.push(Step::Travel {
            line_index,
            segment,
            end,
        }),
        None => {
            tracing::warn!("Segment '{}' has no end point, skipping", segment.id);
            resolved.skipped.push(segment.id.clone());
        }
    }
}
