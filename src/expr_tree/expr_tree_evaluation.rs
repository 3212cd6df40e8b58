//! Evaluates expressions given in the box-tree representation.

use std::fmt::Display;

use crate::expr_tree::expr_tree_ast::{BinaryOperator, ExprNode};
use crate::expr_tree::function_registry::{FunctionRegistry, STANDARD_REGISTRY};

/// Represents an evaluation error.
#[derive(Debug, PartialEq, Clone)]
pub enum EvalError {
    DivisionByZero,
    UnknownFunction {
        function_name: String,
    },
    DomainError {
        function_name: String,
        argument: f64,
        reason: String,
    },
}

/// Display trait implementation for EvalError.
impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DivisionByZero => {
                return write!(f, "Division by zero.");
            }

            Self::UnknownFunction { function_name } => {
                return write!(f, "Unknown function: {}.", function_name);
            }

            Self::DomainError {
                function_name,
                argument,
                reason,
            } => {
                return write!(
                    f,
                    "Domain error in {}({}): {}.",
                    function_name, argument, reason
                );
            }
        }
    }
}

// Applies a binary operator to two already evaluated operands.
fn apply_binary_operator(
    operator: BinaryOperator,
    left_value: f64,
    right_value: f64,
) -> Result<f64, EvalError> {
    match operator {
        BinaryOperator::Add => return Ok(left_value + right_value),
        BinaryOperator::Subtract => return Ok(left_value - right_value),
        BinaryOperator::Multiply => return Ok(left_value * right_value),
        BinaryOperator::Divide => {
            // Exact comparison, so -0.0 is rejected too.
            if right_value == 0.0 {
                return Err(EvalError::DivisionByZero);
            }

            return Ok(left_value / right_value);
        }
        BinaryOperator::Power => return Ok(left_value.powf(right_value)),
    }
}

/// Evaluates `expr_body` using the functions in `registry`. Children are
/// evaluated left to right, and function arguments are evaluated before the
/// function name is looked up.
pub fn evaluate_with_registry(
    expr_body: &ExprNode,
    registry: &FunctionRegistry,
) -> Result<f64, EvalError> {
    match expr_body {
        ExprNode::Number { value } => {
            return Ok(*value);
        }

        ExprNode::BinaryOp {
            operator,
            left,
            right,
        } => {
            let left_value = evaluate_with_registry(left, registry)?;
            let right_value = evaluate_with_registry(right, registry)?;

            return apply_binary_operator(*operator, left_value, right_value);
        }

        ExprNode::FunctionCall {
            function_name,
            argument,
        } => {
            let argument_value = evaluate_with_registry(argument, registry)?;

            match registry.get(function_name.as_str()) {
                Some(function) => return function(argument_value),
                None => {
                    return Err(EvalError::UnknownFunction {
                        function_name: function_name.clone(),
                    })
                }
            }
        }
    }
}

/// Evaluates `expr_body` using the standard function registry.
pub fn evaluate(expr_body: &ExprNode) -> Result<f64, EvalError> {
    return evaluate_with_registry(expr_body, &STANDARD_REGISTRY);
}
