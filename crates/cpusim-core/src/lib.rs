//! Discrete-event simulation of single-CPU process scheduling.
//!
//! A [`Simulation`] holds an immutable process set and a [`SimConfig`]; each
//! call to [`Simulation::run`] drives a fresh [`Scheduler`] for one
//! [`Algorithm`] tick by tick and returns its [`Summary`] together with the
//! full event trace.

pub mod config;
pub mod driver;
pub mod error;
pub mod policy;
pub mod process;
pub mod queue;
pub mod scheduler;
pub mod stats;
pub mod trace;
pub mod types;

pub use config::{AddSide, SimConfig};
pub use driver::{Events, Outcome, Simulation};
pub use error::{ConfigError, RecordError, SimError};
pub use policy::{Algorithm, Policy};
pub use process::{Phase, ProcessRecord, ProcessState};
pub use scheduler::{CpuState, Scheduler};
pub use stats::{Statistics, Summary};
pub use trace::{EventKind, TraceEvent};
pub use types::{Pid, Tick};
