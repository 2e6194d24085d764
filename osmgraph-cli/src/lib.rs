//! Command-line interface for inspecting OSM XML imports.
//!
//! The `inspect` command stands in for a bulk loader: it drives the node
//! and relationship passes to completion through the chunk handoff and
//! prints a JSON summary of what a loader would have received.
#![forbid(unsafe_code)]

use std::io;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use structured_logger::Builder;
use structured_logger::json::new_writer;

mod error;
mod inspect;
mod tally;

pub use error::CliError;
use inspect::{InspectArgs, resolve_inspect_config, run_inspect_with};

const ARG_FILES: &str = "files";
const ARG_RANGE: &str = "range";
const ARG_CHUNK_SIZE: &str = "chunk-size";
const ARG_STRICT: &str = "strict";
const ARG_WORKERS: &str = "workers";
const ARG_CHANNEL_CAPACITY: &str = "channel-capacity";
const ARG_LOG_LEVEL: &str = "log-level";
const ENV_FILES: &str = "OSMGRAPH_CMDS_INSPECT_FILES";

/// Run the osmgraph CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or input are invalid,
/// or when the summary cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Inspect(args) => {
            let config = resolve_inspect_config(args)?;
            init_logging(config.log_level);
            let mut stdout = io::stdout().lock();
            run_inspect_with(&config, &mut stdout)
        }
    }
}

fn init_logging(level: LevelFilter) {
    Builder::with_level(level.as_str())
        .with_target_writer("*", new_writer(io::stderr()))
        .init();
}

#[derive(Debug, Parser)]
#[command(
    name = "osmgraph",
    about = "Turn OSM XML into chunked graph-construction events",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay both passes over OSM XML files and summarise the events.
    Inspect(InspectArgs),
}

#[cfg(test)]
mod tests;
