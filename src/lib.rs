//! chart-motion: alignment and animation engine for time-series chart data.
//!
//! This crate owns the numeric side of animated chart rendering: aligning two
//! differently-keyed series onto a shared key set, interpolating scalar and
//! bucketed series frame-by-frame under an external animation clock, and
//! mapping domain coordinates into pixel space. Pixel drawing, data fetching
//! and indicator math stay with the embedding application.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{MotionEngine, ProjectionOptions};
pub use error::{MotionError, MotionResult};
