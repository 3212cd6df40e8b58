//! Parser and evaluator that represent expressions as a tree where each node
//! references its children via `Box` smart pointers.

pub mod expr_tree_ast;
pub mod expr_tree_evaluation;
pub mod expr_tree_parsing;
pub mod function_registry;
