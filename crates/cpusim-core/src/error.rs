use crate::types::{Pid, Tick};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("invalid process record: {0}")]
    InvalidProcessRecord(#[from] RecordError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("invariant violated at tick {tick} (process {pid}): {reason}")]
    Invariant {
        tick: Tick,
        pid: Pid,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("process id must not be empty")]
    EmptyId,

    #[error("process {0}: burst length must be positive")]
    ZeroBurstLength(Pid),

    #[error("process {0}: burst count must be positive")]
    ZeroBurstCount(Pid),

    #[error("duplicate process id: {0}")]
    DuplicateId(Pid),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("context switch cost must be even, got {0}")]
    OddContextSwitch(Tick),

    #[error("round robin time slice must be positive")]
    ZeroTimeSlice,

    #[error("invalid rr-add side {0:?} (expected BEGINNING or END)")]
    InvalidAddSide(String),

    #[error("unknown algorithm {0:?} (expected FCFS, SRT or RR)")]
    UnknownAlgorithm(String),
}
