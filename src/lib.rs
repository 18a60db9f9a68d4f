//! # Tablebook Reservation Service
//!
//! Table reservation and allocation engine for a single-site restaurant.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, status enums and repository traits
//! - **application**: The booking engine (conflict evaluation, allocation,
//!   booking limits, lazy expiration, the reservation lifecycle and
//!   availability queries)
//! - **infrastructure**: Storage backends (in-memory repositories)
//! - **interfaces**: REST API over the application services
//! - **notifications**: Typed events and the broadcast bus for observers
//! - **support**: Graceful shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export the storage backend for easy access
pub use infrastructure::InMemoryRepositoryProvider;

// Re-export API router
pub use interfaces::http::{create_api_router, AppContext};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
