use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cpusim_core::config::{DEFAULT_CONTEXT_SWITCH, DEFAULT_TIME_SLICE};
use cpusim_core::{AddSide, Algorithm, SimConfig, Summary, Tick};
use cpusim_runtime::{report, Runtime};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a process file under each scheduling algorithm
    Run {
        /// Process file (`id|arrival|burst_length|burst_count|io_length` per line)
        input: PathBuf,

        /// File to write the per-algorithm statistics to
        output: PathBuf,

        /// Where RR puts newly ready processes: BEGINNING or END
        #[arg(default_value = "END")]
        rr_add: AddSide,

        /// Full context switch cost in ms (must be even)
        #[arg(long, default_value_t = DEFAULT_CONTEXT_SWITCH)]
        context_switch: Tick,

        /// Round robin time slice in ms
        #[arg(long, default_value_t = DEFAULT_TIME_SLICE)]
        time_slice: Tick,

        /// Algorithm to run (repeatable); defaults to FCFS, SRT and RR
        #[arg(long = "algorithm", short = 'a')]
        algorithms: Vec<Algorithm>,

        /// Suppress the per-event narration on stdout
        #[arg(long, short)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            rr_add,
            context_switch,
            time_slice,
            algorithms,
            quiet,
        } => {
            let config = SimConfig {
                context_switch,
                time_slice,
                rr_add,
            };
            let algorithms = if algorithms.is_empty() {
                Algorithm::ALL.to_vec()
            } else {
                algorithms
            };

            let runtime = Runtime::from_file(&input, config)
                .with_context(|| format!("failed to load {}", input.display()))?;
            info!(
                "simulating {} processes with {:?}",
                runtime.simulation().records().len(),
                config
            );

            let outcomes = if quiet {
                runtime.run(&algorithms, &mut io::sink())?
            } else {
                let stdout = io::stdout();
                let mut narration = stdout.lock();
                runtime.run(&algorithms, &mut narration)?
            };

            let summaries: Vec<Summary> = outcomes.into_iter().map(|o| o.summary).collect();
            let file = File::create(&output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            report::write_summaries(&mut writer, &summaries)
                .with_context(|| format!("failed to write {}", output.display()))?;

            info!("statistics written to {}", output.display());
        }
    }

    Ok(())
}
