//! Event type definitions for the event bus.

use serde::{Deserialize, Serialize};

/// Events emitted by the planner and optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlannerEvent {
    /// A full timeline was rebuilt.
    #[serde(rename_all = "camelCase")]
    TimelineComputed {
        total_time: f64,
        total_distance: f64,
        events: usize,
    },
    /// A travel segment was skipped because it could not be profiled.
    #[serde(rename_all = "camelCase")]
    SegmentSkipped { segment_id: String, reason: String },
    /// The optimizer entered `Running`.
    #[serde(rename_all = "camelCase")]
    OptimizerStarted {
        population_size: usize,
        max_generations: usize,
    },
    /// One generation finished.
    #[serde(rename_all = "camelCase")]
    GenerationCompleted { generation: usize, best_fitness: f64 },
    /// The optimizer left `Running`.
    #[serde(rename_all = "camelCase")]
    OptimizerFinished {
        generations: usize,
        best_fitness: f64,
        stopped: bool,
    },
}

impl PlannerEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            Self::TimelineComputed { .. } | Self::SegmentSkipped { .. } => EventCategory::Timeline,
            Self::OptimizerStarted { .. }
            | Self::GenerationCompleted { .. }
            | Self::OptimizerFinished { .. } => EventCategory::Optimizer,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            Self::TimelineComputed {
                total_time,
                total_distance,
                events,
            } => format!(
                "Timeline: {} events, {:.3}s, {:.2}in",
                events, total_time, total_distance
            ),
            Self::SegmentSkipped { segment_id, reason } => {
                format!("Skipped segment {}: {}", segment_id, reason)
            }
            Self::OptimizerStarted {
                population_size,
                max_generations,
            } => format!(
                "Optimizer started: population {}, {} generations",
                population_size, max_generations
            ),
            Self::GenerationCompleted {
                generation,
                best_fitness,
            } => format!("Generation {}: best {:.3}", generation, best_fitness),
            Self::OptimizerFinished {
                generations,
                best_fitness,
                stopped,
            } => format!(
                "Optimizer {} after {} generations: best {:.3}",
                if *stopped { "stopped" } else { "completed" },
                generations,
                best_fitness
            ),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Timeline recomputation events.
    Timeline,
    /// Optimizer lifecycle and progress events.
    Optimizer,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeline => write!(f, "Timeline"),
            Self::Optimizer => write!(f, "Optimizer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let e = PlannerEvent::GenerationCompleted {
            generation: 3,
            best_fitness: 2.5,
        };
        assert_eq!(e.category(), EventCategory::Optimizer);
        assert_eq!(e.description(), "Generation 3: best 2.500");

        let e = PlannerEvent::SegmentSkipped {
            segment_id: "s1".into(),
            reason: "missing end point".into(),
        };
        assert_eq!(e.category(), EventCategory::Timeline);
    }

    #[test]
    fn test_serde_tag() {
        let e = PlannerEvent::OptimizerFinished {
            generations: 10,
            best_fitness: 1.0,
            stopped: true,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "optimizerFinished");
        assert_eq!(json["stopped"], true);
    }
}
