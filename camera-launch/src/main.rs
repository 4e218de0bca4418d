//! camera-launch CLI

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, Result};
use camera_launch::{generate_launch_description_with, host, LaunchConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "camera-launch")]
#[command(about = "Launch the generic camera node", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    /// Extra install prefix searched after $AMENT_PREFIX_PATH
    #[arg(long = "ament-prefix-path", global = true)]
    ament_prefix_paths: Vec<PathBuf>,

    /// Do not read $AMENT_PREFIX_PATH
    #[arg(long, global = true)]
    no_env: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the launch record as JSON
    Describe {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the command line of the camera node
    Cmd,

    /// Check that the parameter file exists
    Check,

    /// Spawn the camera node and exit with its status
    Run,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let index = LaunchConfig::new()
        .search_env(!cli.no_env)
        .ament_prefix_paths(&cli.ament_prefix_paths)
        .build_index()?;
    let ld = generate_launch_description_with(&index)?;

    match cli.command {
        Commands::Describe { output } => {
            let json = host::describe(&index, &ld)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("unable to write '{}'", path.display()))?;
                    log::info!("launch record written to {}", path.display());
                }
                None => println!("{}", json),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Cmd => {
            for cmd in host::node_commands(&index, &ld)? {
                println!("{}", cmd.join(" "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            if host::check(&ld) {
                log::info!("all parameter files are present");
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Run => {
            let code = host::run(&index, &ld, ctrl_c(), host::DEFAULT_SHUTDOWN_GRACE).await?;
            Ok(ExitCode::from(code))
        }
    }
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("unable to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
