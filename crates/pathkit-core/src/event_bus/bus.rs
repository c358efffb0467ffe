//! In-process fan-out of planner and optimizer events.

use parking_lot::RwLock;
use std::sync::OnceLock;

use super::events::{EventCategory, PlannerEvent};

/// Which events a handler wants.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &PlannerEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type Handler = Box<dyn Fn(&PlannerEvent) + Send + Sync>;

/// Handlers run synchronously on the publishing thread, in subscription
/// order. The optimizer publishes between generations, so a slow handler
/// slows the search.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<(EventFilter, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, filter: EventFilter, handler: F)
    where
        F: Fn(&PlannerEvent) + Send + Sync + 'static,
    {
        self.handlers.write().push((filter, Box::new(handler)));
    }

    /// Deliver `event` to every matching handler. Returns how many saw it.
    pub fn publish(&self, event: PlannerEvent) -> usize {
        let handlers = self.handlers.read();
        let mut delivered = 0;
        for (_, handler) in handlers.iter().filter(|(filter, _)| filter.matches(&event)) {
            handler(&event);
            delivered += 1;
        }
        tracing::trace!("{} -> {} handlers", event.description(), delivered);
        delivered
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}

static EVENT_BUS: OnceLock<EventBus> = OnceLock::new();

/// Process-wide bus shared by the CLI and any optimizer attached to it.
pub fn event_bus() -> &'static EventBus {
    EVENT_BUS.get_or_init(EventBus::new)
}
