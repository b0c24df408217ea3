//! Shared utilities.

pub mod clock;
pub mod rng;
pub mod telemetry;

pub use clock::*;
pub use rng::*;
pub use telemetry::*;
