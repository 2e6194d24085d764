//! Entry point for the `osmgraph` command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use osmgraph_cli::CliError;

fn main() -> ExitCode {
    match osmgraph_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("osmgraph: {}", err.report());
            ExitCode::FAILURE
        }
    }
}
