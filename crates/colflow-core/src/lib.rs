//! Core types for the Colflow column layout engine.
//!
//! This crate provides the foundational types used across the other colflow
//! crates:
//! - The read-only block model supplied by the document layer
//! - Per-type height heuristic parameters (rules)
//! - The rendering context supplied by the UI layer
//! - Clock abstraction for TTL-gated caches
//! - Error and statistics types

pub mod block;
pub mod clock;
pub mod context;
pub mod errors;
pub mod rules;
pub mod stats;

pub use block::*;
pub use clock::*;
pub use context::*;
pub use errors::*;
pub use rules::*;
pub use stats::*;
