use crate::config::{AddSide, SimConfig};
use crate::error::ConfigError;
use crate::process::ProcessState;
use crate::queue::ReadyQueue;
use crate::types::{Slot, Tick};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Fcfs,
    Srt,
    RoundRobin,
}

impl Algorithm {
    /// Every algorithm, in reporting order.
    pub const ALL: [Algorithm; 3] = [Algorithm::Fcfs, Algorithm::Srt, Algorithm::RoundRobin];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Srt => "SRT",
            Algorithm::RoundRobin => "RR",
        }
    }

    pub fn policy(&self, config: &SimConfig) -> Box<dyn Policy> {
        match self {
            Algorithm::Fcfs => Box::new(FirstComeFirstServed),
            Algorithm::Srt => Box::new(ShortestRemainingTime),
            Algorithm::RoundRobin => Box::new(RoundRobin {
                time_slice: config.time_slice,
                side: config.rr_add,
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Algorithm::Fcfs),
            "SRT" => Ok(Algorithm::Srt),
            "RR" => Ok(Algorithm::RoundRobin),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Ready-queue discipline of one scheduling algorithm.
pub trait Policy: Send {
    fn algorithm(&self) -> Algorithm;

    /// Order in which processes that become ready at the same tick are admitted
    fn admit_order(&self, a: &ProcessState, b: &ProcessState) -> Ordering;

    /// Place a newly ready process in the ready queue
    fn enqueue(&self, queue: &mut ReadyQueue, slot: Slot, procs: &[ProcessState]);

    /// Put a preempted process back in the ready queue
    fn requeue(&self, queue: &mut ReadyQueue, slot: Slot, procs: &[ProcessState]) {
        self.enqueue(queue, slot, procs);
    }

    /// Whether `contender` must take the CPU away from `running`
    fn should_preempt(&self, _running: &ProcessState, _contender: &ProcessState) -> bool {
        false
    }

    /// Quantum, for time-sliced policies
    fn time_slice(&self) -> Option<Tick> {
        None
    }
}

pub struct FirstComeFirstServed;

impl Policy for FirstComeFirstServed {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Fcfs
    }

    fn admit_order(&self, a: &ProcessState, b: &ProcessState) -> Ordering {
        a.pid().cmp(b.pid())
    }

    fn enqueue(&self, queue: &mut ReadyQueue, slot: Slot, _procs: &[ProcessState]) {
        queue.push_back(slot);
    }
}

pub struct ShortestRemainingTime;

impl ShortestRemainingTime {
    fn key(state: &ProcessState) -> (Tick, &str) {
        (state.remaining, state.pid().as_str())
    }
}

impl Policy for ShortestRemainingTime {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Srt
    }

    fn admit_order(&self, a: &ProcessState, b: &ProcessState) -> Ordering {
        Self::key(a).cmp(&Self::key(b))
    }

    fn enqueue(&self, queue: &mut ReadyQueue, slot: Slot, procs: &[ProcessState]) {
        queue.insert_sorted(slot, |s| Self::key(&procs[s]));
    }

    fn should_preempt(&self, running: &ProcessState, contender: &ProcessState) -> bool {
        contender.remaining < running.remaining
    }
}

pub struct RoundRobin {
    pub time_slice: Tick,
    pub side: AddSide,
}

impl Policy for RoundRobin {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RoundRobin
    }

    fn admit_order(&self, a: &ProcessState, b: &ProcessState) -> Ordering {
        a.pid().cmp(b.pid())
    }

    fn enqueue(&self, queue: &mut ReadyQueue, slot: Slot, _procs: &[ProcessState]) {
        match self.side {
            AddSide::Beginning => queue.push_front(slot),
            AddSide::End => queue.push_back(slot),
        }
    }

    /// Quantum expiry always yields to the processes already waiting.
    fn requeue(&self, queue: &mut ReadyQueue, slot: Slot, _procs: &[ProcessState]) {
        queue.push_back(slot);
    }

    fn time_slice(&self) -> Option<Tick> {
        Some(self.time_slice)
    }
}
