//! The table of single-argument functions that expressions may call.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::expr_tree::expr_tree_evaluation::EvalError;

/// A unary numeric transform. Transforms check their own domain.
pub type UnaryFunction = fn(f64) -> Result<f64, EvalError>;

/// Read-only mapping from function name to its transform. Built once and then
/// only ever borrowed by the evaluator.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, UnaryFunction>,
}

lazy_static! {
    /// The standard registry shared by every evaluation that does not bring its
    /// own.
    pub static ref STANDARD_REGISTRY: FunctionRegistry = FunctionRegistry::standard();
}

fn checked_sqrt(value: f64) -> Result<f64, EvalError> {
    if value < 0.0 {
        return Err(EvalError::DomainError {
            function_name: String::from("sqrt"),
            argument: value,
            reason: String::from("square root of a negative number"),
        });
    }

    return Ok(value.sqrt());
}

fn checked_log(value: f64) -> Result<f64, EvalError> {
    if value <= 0.0 {
        return Err(EvalError::DomainError {
            function_name: String::from("log"),
            argument: value,
            reason: String::from("logarithm of a non-positive number"),
        });
    }

    return Ok(value.ln());
}

impl FunctionRegistry {
    /// Builds the registry holding `sin`, `cos`, `tan`, `exp`, `sqrt` and `log`
    /// (natural logarithm).
    pub fn standard() -> Self {
        let mut functions: HashMap<&'static str, UnaryFunction> = HashMap::new();

        functions.insert("sin", |value| Ok(value.sin()));
        functions.insert("cos", |value| Ok(value.cos()));
        functions.insert("tan", |value| Ok(value.tan()));
        functions.insert("exp", |value| Ok(value.exp()));
        functions.insert("sqrt", checked_sqrt);
        functions.insert("log", checked_log);

        return Self { functions };
    }

    /// Looks up the transform registered under `function_name`.
    pub fn get(&self, function_name: &str) -> Option<UnaryFunction> {
        return self.functions.get(function_name).copied();
    }

    /// Names of all registered functions, sorted.
    pub fn function_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.functions.keys().copied().collect();
        names.sort_unstable();
        return names;
    }
}
