//! Presentation-layer interfaces

pub mod http;
