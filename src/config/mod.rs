//! Configuration models for the simulation.

pub mod sim;

pub use sim::{DelayRange, SimConfig};
