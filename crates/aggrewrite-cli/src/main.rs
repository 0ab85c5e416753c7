mod cli;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub(crate) const COLOR_RESET: &str = "\x1b[0m";
pub(crate) const COLOR_RED: &str = "\x1b[31m";
pub(crate) const COLOR_YELLOW: &str = "\x1b[33m";

#[derive(Parser)]
#[command(
    name = "aggrewrite",
    version,
    about = "Rewrite ASP aggregates into plain rules",
    long_about = None,
    subcommand_required = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Log encoder decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every aggregate of a program and print the result
    Rewrite {
        /// Program file to rewrite
        #[arg(value_name = "FILE", required = true)]
        file: PathBuf,
        /// Write the rewritten program here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Emit the rewritten program as JSON instead of ASP text
        #[arg(long)]
        json: bool,
    },
    /// List the aggregate occurrences of a program
    Aggregates {
        /// Program file to inspect
        #[arg(value_name = "FILE", required = true)]
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Rewrite { file, output, json } => {
            cli::rewrite::run(&file, output.as_deref(), json)
        }
        Commands::Aggregates { file } => cli::aggregates::run(&file),
    };

    if let Err(message) = result {
        eprintln!("{}error:{} {}", COLOR_RED, COLOR_RESET, message);
        std::process::exit(1);
    }
}
