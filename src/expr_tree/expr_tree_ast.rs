/// Data structures to represent arithmetic expressions as a tree of boxed
/// nodes, and a fully parenthesized string rendering of them.

/// The binary operators understood by the parser.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOperator {
    /// The character this operator is written with.
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => return '+',
            Self::Subtract => return '-',
            Self::Multiply => return '*',
            Self::Divide => return '/',
            Self::Power => return '^',
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", self.symbol());
    }
}

/// Represents an arithmetic expression. Nodes own their children, so a parsed
/// expression is always a strict tree.
#[derive(Debug, PartialEq, Clone)]
pub enum ExprNode {
    Number {
        value: f64,
    },
    BinaryOp {
        operator: BinaryOperator,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    FunctionCall {
        function_name: String,
        argument: Box<ExprNode>,
    },
}

// Helper function to produce a string representation of an ExprNode. Every
// binary operation is wrapped in parentheses so the grouping chosen by the
// parser is visible.
fn expr_node_to_string_helper(expr_node: &ExprNode, string_so_far: &mut String) {
    match expr_node {
        ExprNode::Number { value } => {
            string_so_far.push_str(value.to_string().as_str());
        }
        ExprNode::BinaryOp {
            operator,
            left,
            right,
        } => {
            string_so_far.push('(');
            expr_node_to_string_helper(left, string_so_far);
            string_so_far.push(' ');
            string_so_far.push(operator.symbol());
            string_so_far.push(' ');
            expr_node_to_string_helper(right, string_so_far);
            string_so_far.push(')');
        }
        ExprNode::FunctionCall {
            function_name,
            argument,
        } => {
            string_so_far.push_str(function_name.as_str());
            string_so_far.push('(');
            expr_node_to_string_helper(argument, string_so_far);
            string_so_far.push(')');
        }
    };
}

/// Converts an expr node to a string.
pub fn expr_node_to_string(expr_node: &ExprNode) -> String {
    let mut out_string = String::new();
    expr_node_to_string_helper(expr_node, &mut out_string);
    return out_string;
}

impl std::fmt::Display for ExprNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", expr_node_to_string(self).as_str());
    }
}

/// Counts the nodes in the tree rooted at `expr_node`.
pub fn count_nodes(expr_node: &ExprNode) -> usize {
    match expr_node {
        ExprNode::Number { .. } => return 1,
        ExprNode::BinaryOp { left, right, .. } => {
            return 1 + count_nodes(left) + count_nodes(right);
        }
        ExprNode::FunctionCall { argument, .. } => return 1 + count_nodes(argument),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: f64) -> Box<ExprNode> {
        return Box::new(ExprNode::Number { value });
    }

    #[test]
    fn test_expr_node_to_string_nested() {
        // sqrt(2 * (1 + 0.5)) ^ -1
        let test_input = ExprNode::BinaryOp {
            operator: BinaryOperator::Power,
            left: Box::new(ExprNode::FunctionCall {
                function_name: String::from("sqrt"),
                argument: Box::new(ExprNode::BinaryOp {
                    operator: BinaryOperator::Multiply,
                    left: number(2.0),
                    right: Box::new(ExprNode::BinaryOp {
                        operator: BinaryOperator::Add,
                        left: number(1.0),
                        right: number(0.5),
                    }),
                }),
            }),
            right: number(-1.0),
        };

        assert_eq!(
            "(sqrt((2 * (1 + 0.5))) ^ -1)",
            format!("{}", test_input).as_str()
        );
        assert_eq!(count_nodes(&test_input), 8);
    }

    #[test]
    fn test_operator_symbols() {
        let operators = [
            (BinaryOperator::Add, "+"),
            (BinaryOperator::Subtract, "-"),
            (BinaryOperator::Multiply, "*"),
            (BinaryOperator::Divide, "/"),
            (BinaryOperator::Power, "^"),
        ];

        for (operator, expected) in operators {
            assert_eq!(operator.to_string(), expected);
        }
    }

    // Trees are plain owned data, so they can be shared across threads.
    #[test]
    fn test_expr_node_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExprNode>();
    }
}
