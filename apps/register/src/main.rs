//! # Tally Register Entry Point
//!
//! Runs the seeded demo session. The setup lives in lib.rs so the
//! commands stay testable without a binary.

use std::process::ExitCode;

fn main() -> ExitCode {
    match tally_register::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
