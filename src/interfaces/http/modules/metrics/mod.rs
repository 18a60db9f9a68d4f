//! Prometheus metrics endpoint

pub mod handlers;

pub use handlers::*;
