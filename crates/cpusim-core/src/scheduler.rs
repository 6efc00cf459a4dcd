use crate::config::SimConfig;
use crate::driver::Outcome;
use crate::error::{RecordError, SimError};
use crate::policy::{Algorithm, Policy};
use crate::process::{Phase, ProcessRecord, ProcessState};
use crate::queue::ReadyQueue;
use crate::stats::{Statistics, Summary};
use crate::trace::{EventKind, TraceEvent};
use crate::types::{Pid, Slot, Tick};
use log::{debug, info, trace};
use std::collections::{BTreeMap, HashSet};

/// What happens to a process once it has finished switching out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Block { until: Tick },
    Terminate,
    Requeue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Idle,
    SwitchingIn { slot: Slot, until: Tick },
    Running { slot: Slot },
    SwitchingOut { slot: Slot, until: Tick, exit: Exit },
}

impl CpuState {
    pub fn slot(&self) -> Option<Slot> {
        match *self {
            CpuState::Idle => None,
            CpuState::SwitchingIn { slot, .. }
            | CpuState::Running { slot }
            | CpuState::SwitchingOut { slot, .. } => Some(slot),
        }
    }
}

/// One algorithm's run over its own copy of the process set.
pub struct Scheduler {
    policy: Box<dyn Policy>,
    records: Vec<ProcessRecord>,
    procs: Vec<ProcessState>,
    ready: ReadyQueue,
    /// Scratch space for the audit: how often each slot appears in `ready`.
    ready_counts: Vec<u32>,
    io_wait: BTreeMap<Slot, Tick>,
    not_arrived: BTreeMap<Slot, Tick>,
    cpu: CpuState,
    slice_left: Tick,
    half_switch: Tick,
    tick: Tick,
    finished: usize,
    stats: Statistics,
    started: bool,
    done: bool,
}

pub(crate) fn check_unique(records: &[ProcessRecord]) -> Result<(), RecordError> {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.id()) {
            return Err(RecordError::DuplicateId(record.id().clone()));
        }
    }
    Ok(())
}

impl Scheduler {
    pub fn new(
        records: &[ProcessRecord],
        algorithm: Algorithm,
        config: &SimConfig,
    ) -> Result<Self, SimError> {
        config.validate(algorithm)?;
        check_unique(records)?;

        let procs: Vec<ProcessState> = records.iter().map(ProcessState::new).collect();
        let not_arrived = procs
            .iter()
            .enumerate()
            .map(|(slot, p)| (slot, p.record.arrival()))
            .collect();

        Ok(Self {
            policy: algorithm.policy(config),
            records: records.to_vec(),
            procs,
            ready: ReadyQueue::new(),
            ready_counts: vec![0; records.len()],
            io_wait: BTreeMap::new(),
            not_arrived,
            cpu: CpuState::Idle,
            slice_left: 0,
            half_switch: config.half_switch(),
            tick: 0,
            finished: 0,
            stats: Statistics::default(),
            started: false,
            done: false,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.policy.algorithm()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn cpu(&self) -> CpuState {
        self.cpu
    }

    pub fn processes(&self) -> &[ProcessState] {
        &self.procs
    }

    /// The process currently executing, not counting switch-in/out.
    pub fn running(&self) -> Option<&ProcessState> {
        match self.cpu {
            CpuState::Running { slot } => Some(&self.procs[slot]),
            _ => None,
        }
    }

    pub fn ready(&self) -> impl Iterator<Item = &ProcessState> + '_ {
        self.ready.iter().map(move |slot| &self.procs[slot])
    }

    /// Ticks left in the running process's quantum (RR only).
    pub fn slice_left(&self) -> Option<Tick> {
        match self.cpu {
            CpuState::Running { .. } => self.policy.time_slice().map(|_| self.slice_left),
            _ => None,
        }
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    pub fn summary(&self) -> Summary {
        self.stats.finish(self.algorithm(), &self.records, self.tick)
    }

    /// Runs to completion, collecting the full trace.
    pub fn run(mut self) -> Result<Outcome, SimError> {
        let mut trace = Vec::new();
        while !self.done {
            trace.extend(self.step()?);
        }
        Ok(Outcome {
            summary: self.summary(),
            trace,
        })
    }

    /// Processes the current instant and, unless the run is over, executes
    /// one tick of CPU work.
    pub fn step(&mut self) -> Result<Vec<TraceEvent>, SimError> {
        let mut events = Vec::new();
        if self.done {
            return Ok(events);
        }

        if !self.started {
            self.started = true;
            info!(
                "{} simulation started with {} processes",
                self.algorithm(),
                self.procs.len()
            );
            let algorithm = self.algorithm();
            self.emit(&mut events, EventKind::SimulatorStarted { algorithm });
        }

        self.admit_io_completions(&mut events);
        self.admit_arrivals(&mut events);
        self.settle(&mut events)?;
        self.audit()?;

        if self.finished == self.procs.len() {
            self.done = true;
            info!(
                "{} simulation ended at {}: {:?}",
                self.algorithm(),
                self.tick,
                self.stats
            );
            let algorithm = self.algorithm();
            self.emit(&mut events, EventKind::SimulatorEnded { algorithm });
            return Ok(events);
        }

        self.execute();
        Ok(events)
    }

    fn emit(&self, events: &mut Vec<TraceEvent>, kind: EventKind) {
        let event = TraceEvent {
            tick: self.tick,
            kind,
        };
        trace!("{:?}", event);
        events.push(event);
    }

    fn admit_io_completions(&mut self, events: &mut Vec<TraceEvent>) {
        let mut due: Vec<Slot> = self
            .io_wait
            .iter()
            .filter(|&(_, &until)| until == self.tick)
            .map(|(&slot, _)| slot)
            .collect();
        self.sort_admissions(&mut due);

        for slot in due {
            self.io_wait.remove(&slot);
            self.admit(slot, events, |pid| EventKind::IoCompleted { pid });
        }
    }

    fn admit_arrivals(&mut self, events: &mut Vec<TraceEvent>) {
        let mut due: Vec<Slot> = self
            .not_arrived
            .iter()
            .filter(|&(_, &arrival)| arrival == self.tick)
            .map(|(&slot, _)| slot)
            .collect();
        self.sort_admissions(&mut due);

        for slot in due {
            self.not_arrived.remove(&slot);
            self.admit(slot, events, |pid| EventKind::ProcessArrived { pid });
        }
    }

    fn sort_admissions(&self, due: &mut [Slot]) {
        due.sort_by(|&a, &b| self.policy.admit_order(&self.procs[a], &self.procs[b]));
    }

    /// Starts a new burst: the process joins the ready queue as of now.
    fn admit<F>(&mut self, slot: Slot, events: &mut Vec<TraceEvent>, kind: F)
    where
        F: FnOnce(Pid) -> EventKind,
    {
        let p = &mut self.procs[slot];
        p.phase = Phase::Ready;
        p.last_ready_tick = self.tick;
        p.start_tick = self.tick;
        let pid = p.pid().clone();

        self.policy.enqueue(&mut self.ready, slot, &self.procs);
        self.emit(events, kind(pid));
    }

    /// Applies every CPU transition due at the current instant.
    fn settle(&mut self, events: &mut Vec<TraceEvent>) -> Result<(), SimError> {
        loop {
            let progressed = match self.cpu {
                CpuState::Idle => self.dispatch_next(),
                CpuState::SwitchingIn { slot, until } if until == self.tick => {
                    self.start_running(slot, events);
                    true
                }
                CpuState::Running { slot } => self.check_running(slot, events)?,
                CpuState::SwitchingOut { slot, until, exit } if until == self.tick => {
                    self.finish_switch_out(slot, exit, events);
                    true
                }
                _ => false,
            };

            if !progressed {
                return Ok(());
            }
        }
    }

    fn dispatch_next(&mut self) -> bool {
        let Some(slot) = self.ready.pop_front() else {
            return false;
        };

        let p = &mut self.procs[slot];
        let wait = self.tick - p.last_ready_tick;
        p.phase = Phase::OnCpu;

        self.stats.total_wait += wait;
        self.stats.context_switches += 1;
        debug!(
            "t={}: switching in {} after waiting {}",
            self.tick,
            p.pid(),
            wait
        );

        self.cpu = CpuState::SwitchingIn {
            slot,
            until: self.tick + self.half_switch,
        };
        true
    }

    fn start_running(&mut self, slot: Slot, events: &mut Vec<TraceEvent>) {
        self.cpu = CpuState::Running { slot };
        if let Some(quantum) = self.policy.time_slice() {
            self.slice_left = quantum;
        }

        let p = &self.procs[slot];
        let kind = EventKind::Dispatched {
            pid: p.pid().clone(),
            remaining: p.remaining,
            burst_length: p.record.burst_length(),
        };
        self.emit(events, kind);
    }

    fn check_running(&mut self, slot: Slot, events: &mut Vec<TraceEvent>) -> Result<bool, SimError> {
        if self.procs[slot].remaining == 0 {
            self.complete_burst(slot, events)?;
            return Ok(true);
        }

        if let Some(quantum) = self.policy.time_slice() {
            if self.slice_left == 0 {
                let p = &self.procs[slot];
                let kind = EventKind::TimeSliceExpired {
                    pid: p.pid().clone(),
                    remaining: p.remaining,
                };
                self.emit(events, kind);

                if self.ready.is_empty() {
                    // Nobody to hand the CPU to; start a fresh quantum.
                    self.slice_left = quantum;
                } else {
                    self.preempt(slot, None, events);
                    return Ok(true);
                }
            }
        }

        if let Some(head) = self.ready.front() {
            if self
                .policy
                .should_preempt(&self.procs[slot], &self.procs[head])
            {
                let by = self.procs[head].pid().clone();
                self.preempt(slot, Some(by), events);
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn complete_burst(&mut self, slot: Slot, events: &mut Vec<TraceEvent>) -> Result<(), SimError> {
        let tick = self.tick;
        let half = self.half_switch;
        let p = &mut self.procs[slot];

        // Switch-in and preemption overhead count towards turnaround.
        let Some(turnaround) = tick.checked_sub(p.start_tick) else {
            return Err(self.violation(slot, "burst completed before it was admitted"));
        };

        p.bursts_left -= 1;
        let pid = p.pid().clone();
        let bursts_left = p.bursts_left;
        let exit = if bursts_left == 0 {
            Exit::Terminate
        } else {
            p.remaining = p.record.burst_length();
            Exit::Block {
                until: tick + half + p.record.io_length(),
            }
        };

        self.stats.total_turnaround += turnaround;
        self.stats.bursts_completed += 1;
        debug!("t={}: {} completed a burst ({} left)", tick, pid, bursts_left);

        match exit {
            Exit::Block { until } => {
                self.emit(
                    events,
                    EventKind::BurstCompleted {
                        pid: pid.clone(),
                        bursts_left,
                    },
                );
                self.emit(events, EventKind::IoBlocked { pid, until });
            }
            _ => self.emit(events, EventKind::ProcessTerminated { pid }),
        }

        self.cpu = CpuState::SwitchingOut {
            slot,
            until: tick + half,
            exit,
        };
        Ok(())
    }

    fn preempt(&mut self, slot: Slot, by: Option<Pid>, events: &mut Vec<TraceEvent>) {
        let p = &self.procs[slot];
        let kind = EventKind::Preempted {
            pid: p.pid().clone(),
            remaining: p.remaining,
            by,
        };

        self.stats.preemptions += 1;
        debug!("t={}: preempting {}", self.tick, self.procs[slot].pid());
        self.emit(events, kind);

        self.cpu = CpuState::SwitchingOut {
            slot,
            until: self.tick + self.half_switch,
            exit: Exit::Requeue,
        };
    }

    fn finish_switch_out(&mut self, slot: Slot, exit: Exit, events: &mut Vec<TraceEvent>) {
        self.cpu = CpuState::Idle;

        match exit {
            Exit::Terminate => {
                self.procs[slot].phase = Phase::Terminated;
                self.finished += 1;
            }
            Exit::Block { until } if until <= self.tick => {
                self.admit(slot, events, |pid| EventKind::IoCompleted { pid });
            }
            Exit::Block { until } => {
                self.procs[slot].phase = Phase::Blocked;
                self.io_wait.insert(slot, until);
            }
            Exit::Requeue => {
                let p = &mut self.procs[slot];
                p.phase = Phase::Ready;
                p.last_ready_tick = self.tick;
                self.policy.requeue(&mut self.ready, slot, &self.procs);
            }
        }
    }

    fn execute(&mut self) {
        if let CpuState::Running { slot } = self.cpu {
            self.procs[slot].remaining -= 1;
            if self.policy.time_slice().is_some() {
                self.slice_left -= 1;
            }
        }
        self.tick += 1;
    }

    fn violation(&self, slot: Slot, reason: impl Into<String>) -> SimError {
        SimError::Invariant {
            tick: self.tick,
            pid: self.procs[slot].pid().clone(),
            reason: reason.into(),
        }
    }

    /// Every live process must sit in exactly the container its phase names.
    fn audit(&mut self) -> Result<(), SimError> {
        self.ready_counts.fill(0);
        for slot in self.ready.iter() {
            self.ready_counts[slot] += 1;
        }

        for (slot, p) in self.procs.iter().enumerate() {
            let holders = [
                (Phase::NotArrived, self.not_arrived.contains_key(&slot) as u32),
                (Phase::Ready, self.ready_counts[slot]),
                (Phase::OnCpu, (self.cpu.slot() == Some(slot)) as u32),
                (Phase::Blocked, self.io_wait.contains_key(&slot) as u32),
            ];
            let total: u32 = holders.iter().map(|&(_, count)| count).sum();

            let consistent = match p.phase {
                Phase::Terminated => total == 0,
                phase => total == 1 && holders.contains(&(phase, 1)),
            };
            if !consistent {
                return Err(self.violation(
                    slot,
                    format!("phase {:?} but held by {:?}", p.phase, holders),
                ));
            }
            if p.remaining > p.record.burst_length() {
                return Err(self.violation(slot, "remaining exceeds burst length"));
            }
        }

        if let Some((&slot, _)) = self.io_wait.iter().find(|&(_, &until)| until < self.tick) {
            return Err(self.violation(slot, "missed I/O completion"));
        }
        if let Some((&slot, _)) = self
            .not_arrived
            .iter()
            .find(|&(_, &arrival)| arrival < self.tick)
        {
            return Err(self.violation(slot, "missed arrival"));
        }

        let stalled = self.cpu == CpuState::Idle
            && self.ready.is_empty()
            && self.io_wait.is_empty()
            && self.not_arrived.is_empty();
        if stalled && self.finished < self.procs.len() {
            if let Some(slot) = self.procs.iter().position(|p| !p.is_terminated()) {
                return Err(self.violation(slot, "no pending work but process not terminated"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, arrival: Tick, burst: Tick, count: u32, io: Tick) -> ProcessRecord {
        ProcessRecord::new(id, arrival, burst, count, io).unwrap()
    }

    fn config(context_switch: Tick) -> SimConfig {
        SimConfig {
            context_switch,
            ..SimConfig::default()
        }
    }

    #[test]
    fn switch_in_takes_half_the_cost() {
        let records = [record("A", 0, 3, 1, 0)];
        let mut sched = Scheduler::new(&records, Algorithm::Fcfs, &config(4)).unwrap();

        sched.step().unwrap();
        assert_eq!(sched.cpu(), CpuState::SwitchingIn { slot: 0, until: 2 });
        assert!(sched.running().is_none());

        sched.step().unwrap();
        let events = sched.step().unwrap();
        assert_eq!(sched.running().map(|p| p.remaining), Some(2));
        assert!(matches!(
            events[0].kind,
            EventKind::Dispatched { remaining: 3, .. }
        ));
    }

    #[test]
    fn zero_cost_switches_complete_immediately() {
        let records = [record("A", 0, 2, 2, 0), record("B", 0, 1, 1, 0)];
        let outcome = Scheduler::new(&records, Algorithm::Fcfs, &config(0))
            .unwrap()
            .run()
            .unwrap();

        // A: 0-2, B: 2-3, A again: 3-5. I/O of length 0 re-admits at once.
        assert_eq!(outcome.summary.end_tick, 5);
        assert_eq!(outcome.summary.context_switches, 3);
        assert_eq!(outcome.summary.totals.total_wait, 2 + 1);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = [record("A", 0, 2, 1, 0), record("A", 3, 1, 1, 0)];
        let err = Scheduler::new(&records, Algorithm::Srt, &config(2)).err();
        assert_eq!(
            err,
            Some(SimError::InvalidProcessRecord(RecordError::DuplicateId(
                "A".into()
            )))
        );
    }

    #[test]
    fn audit_catches_a_process_in_two_places() {
        let records = [record("A", 0, 5, 1, 0), record("B", 9, 5, 1, 0)];
        let mut sched = Scheduler::new(&records, Algorithm::Fcfs, &config(2)).unwrap();
        sched.step().unwrap();

        sched.ready.push_back(0);
        match sched.step() {
            Err(SimError::Invariant { tick, pid, .. }) => {
                assert_eq!(tick, 1);
                assert_eq!(pid.as_str(), "A");
            }
            other => panic!("expected invariant violation, got {:?}", other),
        }
    }

    #[test]
    fn audit_catches_a_duplicate_ready_entry() {
        let records = [record("A", 0, 5, 1, 0), record("B", 0, 5, 1, 0)];
        let mut sched = Scheduler::new(&records, Algorithm::Fcfs, &config(2)).unwrap();
        sched.step().unwrap();

        sched.ready.push_back(1);
        match sched.step() {
            Err(SimError::Invariant { pid, .. }) => assert_eq!(pid.as_str(), "B"),
            other => panic!("expected invariant violation, got {:?}", other),
        }
    }

    #[test]
    fn audit_catches_a_stall() {
        let records = [record("A", 0, 5, 1, 0)];
        let mut sched = Scheduler::new(&records, Algorithm::Fcfs, &config(2)).unwrap();
        sched.not_arrived.clear();
        sched.procs[0].phase = Phase::Blocked;
        sched.io_wait.clear();

        assert!(matches!(sched.step(), Err(SimError::Invariant { .. })));
    }

    #[test]
    fn finished_run_emits_nothing_more() {
        let records = [record("A", 0, 1, 1, 0)];
        let mut sched = Scheduler::new(&records, Algorithm::RoundRobin, &config(2)).unwrap();
        while !sched.is_finished() {
            assert!(sched.tick() < 100);
            sched.step().unwrap();
        }

        assert!(sched.step().unwrap().is_empty());
        assert_eq!(sched.stats().bursts_completed, 1);
    }
}
