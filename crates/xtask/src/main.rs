use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use xshell::{cmd, Shell};

const DEMO_INPUT: &str = "demos/processes.txt";
const DEMO_OUTPUT: &str = "demos/simout.txt";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "cpusim developer tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the whole test suite
    Test,
    /// Simulate the sample process file and print the statistics
    Demo {
        /// RR insertion side passed through to the simulator
        #[arg(default_value = "END")]
        rr_add: String,
    },
    /// Clean build artifacts and demo output
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    let project_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .context("xtask is not inside the workspace")?;
    sh.change_dir(project_root);

    match cli.command {
        Commands::Test => {
            cmd!(sh, "cargo test --workspace").run()?;
        }
        Commands::Demo { rr_add } => {
            cmd!(
                sh,
                "cargo run -p cpusim-cli -- run {DEMO_INPUT} {DEMO_OUTPUT} {rr_add}"
            )
            .run()?;

            println!();
            print!("{}", sh.read_file(DEMO_OUTPUT)?);
        }
        Commands::Clean => {
            cmd!(sh, "cargo clean").run()?;
            if sh.path_exists(DEMO_OUTPUT) {
                sh.remove_path(DEMO_OUTPUT)?;
            }
        }
    }

    Ok(())
}
