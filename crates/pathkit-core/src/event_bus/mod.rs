//! Publish/subscribe hook for timeline and optimizer progress.
//!
//! ```rust,ignore
//! use pathkit_core::event_bus::{event_bus, EventCategory, EventFilter, PlannerEvent};
//!
//! event_bus().subscribe(EventFilter::Categories(vec![EventCategory::Optimizer]), |event| {
//!     if let PlannerEvent::GenerationCompleted { generation, best_fitness } = event {
//!         println!("generation {generation}: {best_fitness:.3}s");
//!     }
//! });
//! ```

mod bus;
mod events;

pub use bus::{event_bus, EventBus, EventFilter};
pub use events::{EventCategory, PlannerEvent};
