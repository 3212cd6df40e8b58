//! Evaluate arithmetic expressions, either one given on the command line or
//! interactively, one per line.
//!
//! Example usage:
//!
//!     cargo run -- --expression "2 ^ 3 ^ 2 - sqrt(16)"
//!     cargo run -- --verbose

use clap::Parser;
use mini_math_interp::end_to_end::{run_interpreter, InterpreterConfig};

fn main() {
    let interpreter_config = InterpreterConfig::parse();

    let interpreter_result = run_interpreter(&interpreter_config);

    if let Err(run_error) = interpreter_result {
        eprintln!("Error: {}", run_error);
        std::process::exit(1);
    }
}
