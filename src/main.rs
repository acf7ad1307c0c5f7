use std::process::ExitCode;

use colored::Colorize;
use tracing_subscriber::EnvFilter;

use func_synth::cli;

fn main() -> ExitCode {
    // FUNC_SYNTH_LOG=debug shows every production choice
    if let Ok(filter) = EnvFilter::try_from_env("FUNC_SYNTH_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let command_line_interface = cli::CommandLineInterface::load();
    match command_line_interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
