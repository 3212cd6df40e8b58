//! This crate contains code for a small arithmetic expression interpreter.

pub mod end_to_end;
pub mod expr_tree;
pub mod lexical_analysis;

pub use expr_tree::expr_tree_ast::{BinaryOperator, ExprNode};
pub use expr_tree::expr_tree_evaluation::{evaluate, evaluate_with_registry, EvalError};
pub use expr_tree::expr_tree_parsing::{parse, ParseError};
pub use expr_tree::function_registry::FunctionRegistry;
