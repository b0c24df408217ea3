//! Core engine: scheduling, lifecycle, classification, reporting, logging.

pub mod engine;
pub mod error;
pub mod generator;
pub mod log;
pub mod phase;
pub mod reporter;
pub mod scheduler;
pub mod task;

pub use engine::Simulation;
pub use error::{AppResult, SimError};
pub use generator::TaskGenerator;
pub use log::{EventSink, LogEntry, TaskEventKind};
pub use phase::{classify, Phase};
pub use reporter::{DebouncedChannel, StatusChannel, StatusReporter, Surface};
pub use scheduler::{Binding, CoreSlot, LockStatus, Scheduler};
pub use task::{Task, TaskId, TaskState};
