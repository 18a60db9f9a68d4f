//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON extractor
//! - `modules`: one module per resource (reservations, tables, availability,
//!   health, metrics), each with its own DTOs and handlers
//! - `router`: wires the modules into one router with CORS and tracing

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, AppContext};
