//! Manual smoke-test harness for local development.
//!
//! Not a deliverable of the formatter itself: no flag parsing, no config discovery, no exit-code
//! mapping. Reads a single path, formats it with default settings, and prints the result.

use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: pyproject-fmt <path/to/pyproject.toml>");
        return ExitCode::FAILURE;
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    match pyproject_fmt::format(&text, &pyproject_fmt::Settings::default()) {
        Ok(formatted) => {
            print!("{formatted}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{path}: {err}");
            ExitCode::FAILURE
        }
    }
}
