//! Entry point for the pixdupe CLI.

use clap::Parser;
use pixdupe::{cli::Cli, error::ExitCode, logging};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    match pixdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", code.code_prefix(), err);
            std::process::exit(code.as_i32());
        }
    }
}
