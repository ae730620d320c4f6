use clap::Parser;
use smart_organizer::cli::{Cli, run_cli};
use smart_organizer::logging::init_logging;
use smart_organizer::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_cli(&cli) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            OutputFormatter::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
