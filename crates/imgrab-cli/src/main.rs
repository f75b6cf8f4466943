use imgrab_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, logging to stderr: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("imgrab error: {:#}", err);
        std::process::exit(1);
    }
}
