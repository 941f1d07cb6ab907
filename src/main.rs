//! dupescan - concurrent duplicate file scanner
//!
//! Entry point for the dupescan CLI.

use clap::Parser;
use dupescan::{cli::Cli, duplicates::FinderError, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match dupescan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = if err
                .downcast_ref::<FinderError>()
                .is_some_and(|e| matches!(e, FinderError::Interrupted))
            {
                ExitCode::Interrupted
            } else {
                ExitCode::GeneralError
            };

            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
