use crate::policy::Algorithm;
use crate::types::{Pid, Tick};

/// One scheduling event, stamped with the instant it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub tick: Tick,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    SimulatorStarted { algorithm: Algorithm },
    ProcessArrived { pid: Pid },
    IoCompleted { pid: Pid },
    /// The process finished switching in and starts using the CPU.
    Dispatched {
        pid: Pid,
        remaining: Tick,
        burst_length: Tick,
    },
    BurstCompleted { pid: Pid, bursts_left: u32 },
    /// The process is switching out and will complete I/O at `until`.
    IoBlocked { pid: Pid, until: Tick },
    ProcessTerminated { pid: Pid },
    TimeSliceExpired { pid: Pid, remaining: Tick },
    /// `by` names the shorter process under SRT; quantum expiry leaves it empty.
    Preempted {
        pid: Pid,
        remaining: Tick,
        by: Option<Pid>,
    },
    SimulatorEnded { algorithm: Algorithm },
}

impl EventKind {
    /// The process the event is about, if any.
    pub fn pid(&self) -> Option<&Pid> {
        match self {
            EventKind::SimulatorStarted { .. } | EventKind::SimulatorEnded { .. } => None,
            EventKind::ProcessArrived { pid }
            | EventKind::IoCompleted { pid }
            | EventKind::Dispatched { pid, .. }
            | EventKind::BurstCompleted { pid, .. }
            | EventKind::IoBlocked { pid, .. }
            | EventKind::ProcessTerminated { pid }
            | EventKind::TimeSliceExpired { pid, .. }
            | EventKind::Preempted { pid, .. } => Some(pid),
        }
    }
}
