use crate::config::SimConfig;
use crate::error::SimError;
use crate::policy::Algorithm;
use crate::process::ProcessRecord;
use crate::scheduler::{check_unique, Scheduler};
use crate::stats::{self, Summary};
use crate::trace::TraceEvent;
use std::collections::VecDeque;

/// Result of running one algorithm to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub summary: Summary,
    pub trace: Vec<TraceEvent>,
}

/// A validated process set plus configuration.
///
/// Every run instantiates a fresh arena of process state from the immutable
/// records, so runs never observe each other.
#[derive(Debug, Clone)]
pub struct Simulation {
    records: Vec<ProcessRecord>,
    config: SimConfig,
}

impl Simulation {
    pub fn new(records: Vec<ProcessRecord>, config: SimConfig) -> Result<Self, SimError> {
        check_unique(&records)?;
        // Time slice is only checked once RR actually runs.
        config.validate(Algorithm::Fcfs)?;
        Ok(Self { records, config })
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn avg_burst(&self) -> f64 {
        stats::average_burst(&self.records)
    }

    pub fn scheduler(&self, algorithm: Algorithm) -> Result<Scheduler, SimError> {
        Scheduler::new(&self.records, algorithm, &self.config)
    }

    pub fn run(&self, algorithm: Algorithm) -> Result<Outcome, SimError> {
        self.scheduler(algorithm)?.run()
    }

    /// FCFS, SRT and RR in that order.
    pub fn run_all(&self) -> Result<Vec<Outcome>, SimError> {
        Algorithm::ALL.iter().map(|&algorithm| self.run(algorithm)).collect()
    }

    /// Lazily steps a fresh run; calling it again restarts from tick 0.
    pub fn events(&self, algorithm: Algorithm) -> Result<Events, SimError> {
        Ok(Events {
            scheduler: self.scheduler(algorithm)?,
            pending: VecDeque::new(),
            failed: false,
        })
    }
}

pub struct Events {
    scheduler: Scheduler,
    pending: VecDeque<TraceEvent>,
    failed: bool,
}

impl Events {
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Available once the run has finished.
    pub fn summary(&self) -> Option<Summary> {
        self.scheduler
            .is_finished()
            .then(|| self.scheduler.summary())
    }
}

impl Iterator for Events {
    type Item = Result<TraceEvent, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.failed || self.scheduler.is_finished() {
                return None;
            }

            match self.scheduler.step() {
                Ok(events) => self.pending.extend(events),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
