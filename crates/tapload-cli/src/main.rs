use tapload_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        eprintln!("tapload warning: logging disabled: {:#}", err);
    }

    // Parse CLI and dispatch.
    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("tapload error: {:#}", err);
        std::process::exit(1);
    }
}
