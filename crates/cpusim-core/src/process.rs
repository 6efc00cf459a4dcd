use crate::error::RecordError;
use crate::types::{Pid, Tick};

/// Immutable description of one process, as read from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    id: Pid,
    arrival: Tick,
    burst_length: Tick,
    burst_count: u32,
    io_length: Tick,
}

impl ProcessRecord {
    pub fn new(
        id: impl Into<Pid>,
        arrival: Tick,
        burst_length: Tick,
        burst_count: u32,
        io_length: Tick,
    ) -> Result<Self, RecordError> {
        let id = id.into();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }
        if burst_length == 0 {
            return Err(RecordError::ZeroBurstLength(id));
        }
        if burst_count == 0 {
            return Err(RecordError::ZeroBurstCount(id));
        }

        Ok(Self {
            id,
            arrival,
            burst_length,
            burst_count,
            io_length,
        })
    }

    pub fn id(&self) -> &Pid {
        &self.id
    }

    pub fn arrival(&self) -> Tick {
        self.arrival
    }

    pub fn burst_length(&self) -> Tick {
        self.burst_length
    }

    pub fn burst_count(&self) -> u32 {
        self.burst_count
    }

    pub fn io_length(&self) -> Tick {
        self.io_length
    }

    /// CPU ticks this process needs over its whole life.
    pub fn total_work(&self) -> Tick {
        self.burst_length * self.burst_count as Tick
    }
}

/// Where a process currently lives. Exactly one container holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotArrived,
    Ready,
    OnCpu,
    Blocked,
    Terminated,
}

/// Mutable per-run state of a process.
#[derive(Debug, Clone)]
pub struct ProcessState {
    pub record: ProcessRecord,
    pub phase: Phase,
    /// Ticks left in the current burst.
    pub remaining: Tick,
    pub bursts_left: u32,
    /// Last instant the process entered the ready queue.
    pub last_ready_tick: Tick,
    /// Instant the current burst was admitted (arrival or I/O completion).
    pub start_tick: Tick,
}

impl ProcessState {
    pub fn new(record: &ProcessRecord) -> Self {
        Self {
            record: record.clone(),
            phase: Phase::NotArrived,
            remaining: record.burst_length(),
            bursts_left: record.burst_count(),
            last_ready_tick: record.arrival(),
            start_tick: record.arrival(),
        }
    }

    pub fn pid(&self) -> &Pid {
        self.record.id()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_bursts() {
        assert_eq!(
            ProcessRecord::new("A", 0, 0, 1, 0),
            Err(RecordError::ZeroBurstLength(Pid::from("A")))
        );
        assert_eq!(
            ProcessRecord::new("A", 0, 3, 0, 0),
            Err(RecordError::ZeroBurstCount(Pid::from("A")))
        );
        assert_eq!(ProcessRecord::new("", 0, 3, 1, 0), Err(RecordError::EmptyId));
    }

    #[test]
    fn fresh_state_starts_a_full_burst() {
        let record = ProcessRecord::new("B", 4, 7, 3, 10).unwrap();
        let state = ProcessState::new(&record);

        assert_eq!(state.phase, Phase::NotArrived);
        assert_eq!(state.remaining, 7);
        assert_eq!(state.bursts_left, 3);
        assert_eq!(state.last_ready_tick, 4);
        assert_eq!(record.total_work(), 21);
    }
}
