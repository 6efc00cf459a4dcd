pub mod error;
pub mod loader;
pub mod narrate;
pub mod report;

pub use error::RuntimeError;
pub use loader::ProcessLoader;

use cpusim_core::{Algorithm, Outcome, ProcessRecord, SimConfig, Simulation};
use log::info;
use std::io::Write;
use std::path::Path;

/// Wires a loaded process set to the engine and its presentation.
pub struct Runtime {
    simulation: Simulation,
}

impl Runtime {
    pub fn new(records: Vec<ProcessRecord>, config: SimConfig) -> Result<Self, RuntimeError> {
        let simulation = Simulation::new(records, config)?;
        Ok(Self { simulation })
    }

    pub fn from_file(path: &Path, config: SimConfig) -> Result<Self, RuntimeError> {
        let records = ProcessLoader::load(path)?;
        Self::new(records, config)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Runs each algorithm on a fresh copy of the process set, narrating
    /// every trace into `narration` as it completes.
    pub fn run(
        &self,
        algorithms: &[Algorithm],
        narration: &mut dyn Write,
    ) -> Result<Vec<Outcome>, RuntimeError> {
        let mut outcomes = Vec::with_capacity(algorithms.len());

        for &algorithm in algorithms {
            let outcome = self.simulation.run(algorithm)?;
            info!(
                "{}: {} context switches, {} preemptions, ended at {}ms",
                algorithm,
                outcome.summary.context_switches,
                outcome.summary.preemptions,
                outcome.summary.end_tick
            );

            narrate::write_narration(narration, &outcome.trace)?;
            writeln!(narration)?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;

    const PROCESSES: &str = "\
# two short jobs
P1|0|5|1|0
P2|1|3|1|0
";

    fn config() -> SimConfig {
        SimConfig {
            context_switch: 4,
            ..SimConfig::default()
        }
    }

    #[test]
    fn runs_from_a_file_and_narrates() {
        let _ = env_logger::builder().is_test(true).try_init();
        let path = std::env::temp_dir().join(format!("cpusim-runtime-{}.txt", std::process::id()));
        fs::write(&path, PROCESSES).unwrap();

        let runtime = Runtime::from_file(&path, config()).unwrap();
        fs::remove_file(&path).unwrap();

        let mut narration = Vec::new();
        let outcomes = runtime.run(&Algorithm::ALL, &mut narration).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].summary.context_switches, 2);

        let text = String::from_utf8(narration).unwrap();
        assert!(text.starts_with("time 0ms: Simulator started for FCFS\n"));
        assert!(text.contains("time 16ms: Simulator ended for FCFS\n"));
        assert!(text.contains("Simulator ended for RR"));
    }

    #[test]
    fn runs_only_the_requested_algorithms() {
        let records = ProcessLoader::parse(PROCESSES).unwrap();
        let runtime = Runtime::new(records, config()).unwrap();

        let outcomes = runtime.run(&[Algorithm::Srt], &mut io::sink()).unwrap();
        let algorithms: Vec<Algorithm> = outcomes.iter().map(|o| o.summary.algorithm).collect();
        assert_eq!(algorithms, [Algorithm::Srt]);
    }

    #[test]
    fn surfaces_configuration_errors() {
        let records = ProcessLoader::parse(PROCESSES).unwrap();
        let config = SimConfig {
            time_slice: 0,
            ..config()
        };
        let runtime = Runtime::new(records, config).unwrap();

        let err = runtime
            .run(&[Algorithm::RoundRobin], &mut io::sink())
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Sim(_)));
    }
}
