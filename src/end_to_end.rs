//! Code to configure and run the interpreter, either on a single expression or
//! as an interactive read-eval-print loop.

use std::io::{self, BufRead, Write};

use clap::Parser;

use crate::expr_tree::expr_tree_ast::count_nodes;
use crate::expr_tree::expr_tree_evaluation::{evaluate, EvalError};
use crate::expr_tree::expr_tree_parsing::{parse, ParseError};
use crate::expr_tree::function_registry::{FunctionRegistry, STANDARD_REGISTRY};

/// Printed once when the interactive loop starts.
pub const BANNER: &str = "Mini Math Interpreter. Enter an expression or 'exit' to quit.";

/// Typing this on its own line ends the interactive loop.
pub const EXIT_COMMAND: &str = "exit";

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// Evaluate this expression and exit instead of starting the interactive
    /// loop.
    #[arg(short, long)]
    pub expression: Option<String>,

    /// Print the parsed expression tree before each result.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Print the functions expressions may call, then exit.
    #[arg(short, long, default_value_t = false)]
    pub list_functions: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Debug)]
pub enum RunError {
    ParseError(ParseError),
    EvalError(EvalError),
    IoError(io::Error),
}

/// Display trait implementation for RunError.
impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseError(parse_error) => {
                return write!(f, "Parse error: {}", parse_error);
            }

            Self::EvalError(eval_error) => {
                return write!(f, "Evaluation error: {}", eval_error);
            }

            Self::IoError(io_err) => {
                return write!(f, "I/O error: {}", io_err);
            }
        }
    }
}

/// Type conversions for errors.
impl From<io::Error> for RunError {
    fn from(value: io::Error) -> Self {
        return Self::IoError(value);
    }
}

impl From<ParseError> for RunError {
    fn from(value: ParseError) -> Self {
        return Self::ParseError(value);
    }
}

impl From<EvalError> for RunError {
    fn from(value: EvalError) -> Self {
        return Self::EvalError(value);
    }
}

/// Lists the functions in `registry` along with the constants every
/// expression can use.
pub fn describe_functions(registry: &FunctionRegistry) -> String {
    return format!(
        "Functions: {}\nConstants: pi, e",
        registry.function_names().join(", ")
    );
}

/// Parses and evaluates one line, returning the text to show the user. With
/// `verbose` set the parsed tree is included above the result.
pub fn evaluate_line(line: &str, verbose: bool) -> Result<String, RunError> {
    let expr = parse(line)?;
    let value = evaluate(&expr)?;

    if verbose {
        return Ok(format!(
            "Tree: {} [{} nodes]\nResult: {}",
            expr,
            count_nodes(&expr),
            value
        ));
    }

    return Ok(format!("Result: {}", value));
}

/// Runs the read-eval-print loop until `exit` or end of input. Results go to
/// `output`, failures to `error_output`; a failing line does not stop the
/// loop. Only I/O errors are returned.
pub fn run_repl<R, W, E>(
    input: &mut R,
    output: &mut W,
    error_output: &mut E,
    verbose: bool,
) -> Result<(), RunError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    writeln!(output, "{}", BANNER)?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line == EXIT_COMMAND {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match evaluate_line(line, verbose) {
            Ok(result_text) => writeln!(output, "{}", result_text)?,
            Err(run_error) => writeln!(error_output, "Error: {}", run_error)?,
        }
    }

    return Ok(());
}

/// Run the interpreter given an interpreter config: the function listing when
/// asked for, a single expression when one was supplied, the interactive loop
/// on standard input otherwise.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<(), RunError> {
    if config.list_functions {
        println!("{}", describe_functions(&STANDARD_REGISTRY));
        return Ok(());
    }

    if let Some(expression) = &config.expression {
        let result_text = evaluate_line(expression.as_str(), config.verbose)?;
        println!("{}", result_text);
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();

    return run_repl(
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut stderr.lock(),
        config.verbose,
    );
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    // Runs the loop on `session` and returns what it wrote to each stream.
    fn run_session(session: &str, verbose: bool) -> (String, String) {
        let mut input = Cursor::new(session.as_bytes());
        let mut output = Vec::new();
        let mut error_output = Vec::new();

        run_repl(&mut input, &mut output, &mut error_output, verbose)
            .expect("run_repl returned an unexpected error");

        return (
            String::from_utf8(output).expect("output is not UTF-8"),
            String::from_utf8(error_output).expect("error output is not UTF-8"),
        );
    }

    #[test]
    fn test_evaluate_line() {
        assert_eq!(
            evaluate_line("2 + 3 * 4", false).expect("evaluation failed"),
            "Result: 14"
        );
        assert_eq!(
            evaluate_line("2^3^2", true).expect("evaluation failed"),
            "Tree: (2 ^ (3 ^ 2)) [5 nodes]\nResult: 512"
        );
    }

    #[test]
    fn test_evaluate_line_errors() {
        assert!(matches!(
            evaluate_line("(2+3", false),
            Err(RunError::ParseError(_))
        ));
        assert!(matches!(
            evaluate_line("1/0", false),
            Err(RunError::EvalError(EvalError::DivisionByZero))
        ));
        assert_eq!(
            evaluate_line("foo(1)", false)
                .map_err(|err| err.to_string())
                .expect_err("foo is not a function"),
            "Evaluation error: Unknown function: foo."
        );
    }

    // Test a whole session: errors are reported and the loop keeps going
    // until `exit`.
    #[test]
    fn test_repl_session() {
        let (output, error_output) =
            run_session("1 + 1\n\n   \nsqrt(-4)\n(2 + 3) * 4\nexit\n7\n", false);

        assert_eq!(
            output,
            format!("{}\n> Result: 2\n> > > > Result: 20\n> ", BANNER)
        );
        assert_eq!(
            error_output,
            "Error: Evaluation error: Domain error in sqrt(-4): square root of a negative number.\n"
        );
    }

    // The loop also ends at end of input without an `exit` line.
    #[test]
    fn test_repl_end_of_input() {
        let (output, error_output) = run_session("pi * 0\n2 &", false);

        assert_eq!(output, format!("{}\n> Result: 0\n> > ", BANNER));
        assert_eq!(
            error_output,
            "Error: Parse error: Unexpected \"&\" at position 2 after a complete expression.\n"
        );
    }

    #[test]
    fn test_repl_verbose() {
        let (output, _) = run_session("-3 + 5\n", true);

        assert_eq!(
            output,
            format!("{}\n> Tree: ((-1 * 3) + 5) [5 nodes]\nResult: 2\n> ", BANNER)
        );
    }

    #[test]
    fn test_describe_functions() {
        assert_eq!(
            describe_functions(&STANDARD_REGISTRY),
            "Functions: cos, exp, log, sin, sqrt, tan\nConstants: pi, e"
        );
    }

    // Input nested too deeply is reported like any other bad line.
    #[test]
    fn test_repl_deep_nesting() {
        let session = format!("{}1\n2 * 3\n", "-".repeat(100_000));
        let (output, error_output) = run_session(session.as_str(), false);

        assert_eq!(output, format!("{}\n> > Result: 6\n> ", BANNER));
        assert!(error_output.starts_with("Error: Parse error: Expression nested more than"));
    }

    #[test]
    fn test_config_parsing() {
        let config = InterpreterConfig::try_parse_from(["mini-math-interp", "-e", "1+1", "-v"])
            .expect("arguments should parse");
        assert_eq!(config.expression.as_deref(), Some("1+1"));
        assert!(config.verbose);

        let config = InterpreterConfig::try_parse_from(["mini-math-interp"])
            .expect("arguments should parse");
        assert_eq!(config.expression, None);
        assert!(!config.verbose);
        assert!(!config.list_functions);

        let config = InterpreterConfig::try_parse_from(["mini-math-interp", "--list-functions"])
            .expect("arguments should parse");
        assert!(config.list_functions);
    }
}
