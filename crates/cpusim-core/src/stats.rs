use crate::policy::Algorithm;
use crate::process::ProcessRecord;
use crate::types::Tick;

/// Running totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total_wait: Tick,
    pub total_turnaround: Tick,
    pub bursts_completed: u64,
    pub context_switches: u64,
    pub preemptions: u64,
}

/// Final per-algorithm report.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub algorithm: Algorithm,
    pub avg_burst: f64,
    pub avg_wait: f64,
    pub avg_turnaround: f64,
    pub context_switches: u64,
    pub preemptions: u64,
    pub totals: Statistics,
    /// Instant the last process finished switching out.
    pub end_tick: Tick,
}

/// Every burst is one unit of work for wait and turnaround averages.
pub fn total_bursts(records: &[ProcessRecord]) -> u64 {
    records.iter().map(|r| r.burst_count() as u64).sum()
}

/// Weighted mean burst length; depends only on the input, never on a run.
pub fn average_burst(records: &[ProcessRecord]) -> f64 {
    let work: Tick = records.iter().map(ProcessRecord::total_work).sum();
    ratio(work, total_bursts(records))
}

fn ratio(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

impl Statistics {
    pub fn finish(&self, algorithm: Algorithm, records: &[ProcessRecord], end_tick: Tick) -> Summary {
        let bursts = total_bursts(records);
        Summary {
            algorithm,
            avg_burst: average_burst(records),
            avg_wait: ratio(self.total_wait, bursts),
            avg_turnaround: ratio(self.total_turnaround, bursts),
            context_switches: self.context_switches,
            preemptions: self.preemptions,
            totals: *self,
            end_tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_are_per_burst() {
        let records = vec![
            ProcessRecord::new("A", 0, 3, 2, 5).unwrap(),
            ProcessRecord::new("B", 1, 4, 1, 0).unwrap(),
        ];
        let stats = Statistics {
            total_wait: 5,
            total_turnaround: 18,
            bursts_completed: 3,
            context_switches: 3,
            preemptions: 0,
        };

        let summary = stats.finish(Algorithm::Fcfs, &records, 16);
        assert!((summary.avg_burst - 10.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_wait - 5.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_turnaround - 6.0).abs() < 1e-9);
        assert_eq!(summary.totals, stats);
    }

    #[test]
    fn empty_input_reports_zeroes() {
        let summary = Statistics::default().finish(Algorithm::Srt, &[], 0);
        assert_eq!(summary.avg_burst, 0.0);
        assert_eq!(summary.avg_wait, 0.0);
        assert_eq!(summary.context_switches, 0);
    }
}
