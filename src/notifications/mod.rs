//! Real-time notifications: typed events, broadcast bus, scheduling hook

pub mod event_bus;
pub mod events;
pub mod scheduler;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{Event, EventMessage};
pub use scheduler::EventBusNotificationScheduler;
