//! # Coregrid
//!
//! A deterministic scheduling and lifecycle engine for simulated-concurrency
//! visualizations.
//!
//! This library implements the decision-making half of a "tasks over cores"
//! animation: tasks are produced at a fixed cadence, wait in a FIFO queue, get
//! greedily assigned to free cores, and run through a linear lifecycle of timed
//! phases before retiring and freeing their core. The engine also derives a
//! system-wide load phase, a binary lock status, a debounced narration of
//! both, and an append-only per-task event log.
//!
//! Rendering is deliberately absent. The engine emits serializable snapshots and
//! ordered log entries; a renderer consumes them without needing any scheduling
//! logic of its own.
//!
//! ## Core Problem Solved
//!
//! Animated concurrency demos are usually written as chains of nested timer
//! callbacks mutating shared counters, which makes them impossible to test and
//! easy to break. This crate replaces that structure with:
//!
//! - **Explicit state machines**: each task is a record in an arena, advanced by
//!   a single scheduling function
//! - **Discrete-event simulation**: one time-ordered event heap drives every
//!   transition on a virtual millisecond clock
//! - **Deterministic replay**: the only randomness (execution dwell) comes from
//!   an injectable, seedable source
//! - **Debounced reporting**: flapping status labels are rate-limited per
//!   channel with single-owner timer semantics
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coregrid::builders::SimulationBuilder;
//! use coregrid::config::SimConfig;
//!
//! let mut sim = SimulationBuilder::new()
//!     .with_config(SimConfig::default())
//!     .with_seed(42)
//!     .build()?;
//!
//! sim.run_to_completion()?;
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.phase.to_string(), "Idle");
//! ```
//!
//! For live rendering, the optional `tokio-runtime` feature (on by default)
//! provides a real-time driver that replays the event heap against the wall
//! clock and pushes snapshots to an async consumer.
//!
//! For complete examples, see:
//! - `tests/simulation_test.rs` - Full end-to-end scenario

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core engine: scheduler, task lifecycle, phase classification, reporting.
pub mod core;
/// Configuration models for the simulation.
pub mod config;
/// Builders to construct a simulation from configuration.
pub mod builders;
/// Infrastructure adapters for event-log sinks.
pub mod infra;
/// Runtime adapters (real-time driver) and renderer-facing API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
