//! Recursive descent parser that constructs arithmetic expressions in the
//! box-tree representation.
//!
//! Grammar, from loosest to tightest binding:
//!
//! ```text
//! expression -> term (('+' | '-') term)*
//! term       -> power (('*' | '/') power)*
//! power      -> unary ('^' power)?
//! unary      -> ('+' | '-') unary | primary
//! primary    -> NUMBER | CONSTANT | IDENTIFIER '(' expression ')' | '(' expression ')'
//! ```
//!
//! Every rule takes the index of the next unread token and returns the node it
//! built together with the index just past it. Rules look at one token to pick
//! a branch and never backtrack.

use std::fmt::Display;

use crate::expr_tree::expr_tree_ast::{BinaryOperator, ExprNode};
use crate::lexical_analysis::{run_lexical_analysis, Token, TokenClass};

/// Value of the `pi` constant, 3.141592653589793.
pub const PI_VALUE: f64 = std::f64::consts::PI;

/// Value of the `e` constant, 2.718281828459045.
pub const E_VALUE: f64 = std::f64::consts::E;

/// How deeply parentheses, signs, exponents and operator chains may nest.
/// Parsing, evaluating and dropping a tree all recurse once per level.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Represents a parsing error. Positions are byte offsets into the source.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    UnexpectedToken {
        found_token_text: String,
        position: usize,
    },
    UnexpectedEndOfInput {
        expected: String,
    },
    ExpectedToken {
        expected_token_text: String,
        found_token_text: Option<String>,
        position: usize,
    },
    MissingFunctionArgument {
        function_name: String,
        position: usize,
    },
    MalformedNumber {
        number_text: String,
        position: usize,
    },
    UnexpectedTrailingInput {
        found_token_text: String,
        position: usize,
    },
    NestingTooDeep {
        position: usize,
    },
}

/// Display trait implementation for ParseError.
impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedToken {
                found_token_text,
                position,
            } => {
                return write!(
                    f,
                    "Unexpected character {:?} at position {}.",
                    found_token_text, position
                );
            }

            Self::UnexpectedEndOfInput { expected } => {
                return write!(f, "Unexpected end of input, expected {}.", expected);
            }

            Self::ExpectedToken {
                expected_token_text,
                found_token_text,
                position,
            } => match found_token_text {
                Some(found_token_text) => {
                    return write!(
                        f,
                        "Expected {:?} at position {}, found {:?}.",
                        expected_token_text, position, found_token_text
                    );
                }
                None => {
                    return write!(
                        f,
                        "Expected {:?} at position {}, found end of input.",
                        expected_token_text, position
                    );
                }
            },

            Self::MissingFunctionArgument {
                function_name,
                position,
            } => {
                return write!(
                    f,
                    "Expected '(' after function name {} at position {}.",
                    function_name, position
                );
            }

            Self::MalformedNumber {
                number_text,
                position,
            } => {
                return write!(
                    f,
                    "Malformed number {:?} at position {}.",
                    number_text, position
                );
            }

            Self::UnexpectedTrailingInput {
                found_token_text,
                position,
            } => {
                return write!(
                    f,
                    "Unexpected {:?} at position {} after a complete expression.",
                    found_token_text, position
                );
            }

            Self::NestingTooDeep { position } => {
                return write!(
                    f,
                    "Expression nested more than {} levels deep at position {}.",
                    MAX_NESTING_DEPTH, position
                );
            }
        }
    }
}

// Byte offset just past the last token, used to report errors at the end of
// the input.
fn end_position(tokens: &Vec<Token>) -> usize {
    match tokens.last() {
        Some(token) => return token.position + token.token_text.len(),
        None => return 0,
    }
}

// Byte offset of tokens[start_idx], or of the end of the input past the last
// token.
fn position_at(tokens: &Vec<Token>, start_idx: usize) -> usize {
    match tokens.get(start_idx) {
        Some(token) => return token.position,
        None => return end_position(tokens),
    }
}

// Checks whether tokens[start_idx] exists and is of the requested class.
fn peek_token_class(tokens: &Vec<Token>, start_idx: usize, token_class: TokenClass) -> bool {
    match tokens.get(start_idx) {
        Some(token) => return token.token_class == token_class,
        None => return false,
    }
}

/// Tries to consume a token of the requested class at tokens[start_idx],
/// reporting `expected_token_text` if something else is there.
fn try_token_class<'a>(
    tokens: &'a Vec<Token>,
    start_idx: usize,
    token_class: TokenClass,
    expected_token_text: &str,
) -> Result<(&'a Token, usize), ParseError> {
    match tokens.get(start_idx) {
        Some(token) if token.token_class == token_class => return Ok((token, start_idx + 1)),
        Some(token) => {
            return Err(ParseError::ExpectedToken {
                expected_token_text: String::from(expected_token_text),
                found_token_text: Some(token.token_text.clone()),
                position: token.position,
            });
        }
        None => {
            return Err(ParseError::ExpectedToken {
                expected_token_text: String::from(expected_token_text),
                found_token_text: None,
                position: end_position(tokens),
            });
        }
    }
}

/// Converts the numeric literal `number_token`, found at tokens[start_idx].
fn try_number_rule(
    number_token: &Token,
    start_idx: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    // The lexer accepts any run of digits and dots, so "1.2.3" and "." get
    // here and are rejected.
    match number_token.token_text.parse::<f64>() {
        Ok(value) => return Ok((Box::new(ExprNode::Number { value }), start_idx + 1)),
        Err(_) => {
            return Err(ParseError::MalformedNumber {
                number_text: number_token.token_text.clone(),
                position: number_token.position,
            });
        }
    }
}

/// Tries to parse an expression that looks like `([EXPR])`. The inner
/// expression is one nesting level deeper.
fn try_parenthesis_expr_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    let (_, start_idx) = try_token_class(tokens, start_idx, TokenClass::LeftParen, "(")?;
    let (expr_node, start_idx) = try_expression_rule(tokens, start_idx, depth + 1)?;
    let (_, start_idx) = try_token_class(tokens, start_idx, TokenClass::RightParen, ")")?;

    return Ok((expr_node, start_idx));
}

/// Tries to parse a constant or a function call starting with the identifier
/// at tokens[start_idx]. Function names are not checked here, so `foo(1)`
/// parses and fails at evaluation instead.
fn try_identifier_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    let (identifier_token, start_idx) =
        try_token_class(tokens, start_idx, TokenClass::Identifier, "identifier")?;
    let function_name = identifier_token.token_text.as_str();

    if function_name == "pi" {
        return Ok((Box::new(ExprNode::Number { value: PI_VALUE }), start_idx));
    }
    if function_name == "e" {
        return Ok((Box::new(ExprNode::Number { value: E_VALUE }), start_idx));
    }

    if !peek_token_class(tokens, start_idx, TokenClass::LeftParen) {
        return Err(ParseError::MissingFunctionArgument {
            function_name: String::from(function_name),
            position: position_at(tokens, start_idx),
        });
    }

    let (argument, start_idx) = try_parenthesis_expr_rule(tokens, start_idx, depth)?;

    return Ok((
        Box::new(ExprNode::FunctionCall {
            function_name: String::from(function_name),
            argument,
        }),
        start_idx,
    ));
}

/// Tries to parse according to the production
/// `primary -> NUMBER | CONSTANT | IDENTIFIER (e) | (e)`.
fn try_primary_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    let token = match tokens.get(start_idx) {
        Some(token) => token,
        None => {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: String::from("a number, constant, function call or '('"),
            });
        }
    };

    match token.token_class {
        TokenClass::Number => return try_number_rule(token, start_idx),
        TokenClass::Identifier => return try_identifier_rule(tokens, start_idx, depth),
        TokenClass::LeftParen => return try_parenthesis_expr_rule(tokens, start_idx, depth),
        _ => {
            return Err(ParseError::UnexpectedToken {
                found_token_text: token.token_text.clone(),
                position: token.position,
            });
        }
    }
}

/// Tries to parse according to the production `unary -> ('+' | '-') unary | primary`.
/// Negation is represented as multiplication by -1.
///
/// Every operand passes through here, so this is where the nesting limit is
/// enforced.
fn try_unary_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep {
            position: position_at(tokens, start_idx),
        });
    }

    if peek_token_class(tokens, start_idx, TokenClass::Plus) {
        return try_unary_rule(tokens, start_idx + 1, depth + 1);
    }

    if peek_token_class(tokens, start_idx, TokenClass::Minus) {
        let (operand, start_idx) = try_unary_rule(tokens, start_idx + 1, depth + 1)?;

        return Ok((
            Box::new(ExprNode::BinaryOp {
                operator: BinaryOperator::Multiply,
                left: Box::new(ExprNode::Number { value: -1.0 }),
                right: operand,
            }),
            start_idx,
        ));
    }

    return try_primary_rule(tokens, start_idx, depth);
}

/// Tries to parse according to the production `power -> unary ('^' power)?`.
/// Recursing on the right operand makes `^` right-associative, so `2^3^2` is
/// `2^(3^2)`.
fn try_power_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    let (base, start_idx) = try_unary_rule(tokens, start_idx, depth)?;

    if !peek_token_class(tokens, start_idx, TokenClass::Caret) {
        return Ok((base, start_idx));
    }

    let (exponent, start_idx) = try_power_rule(tokens, start_idx + 1, depth + 1)?;

    return Ok((
        Box::new(ExprNode::BinaryOp {
            operator: BinaryOperator::Power,
            left: base,
            right: exponent,
        }),
        start_idx,
    ));
}

// Maps an operator token onto the binary operator it denotes, if it is one of
// `allowed`.
fn binary_operator_at(
    tokens: &Vec<Token>,
    start_idx: usize,
    allowed: &[(TokenClass, BinaryOperator)],
) -> Option<BinaryOperator> {
    let token = tokens.get(start_idx)?;

    return allowed
        .iter()
        .find(|(token_class, _)| *token_class == token.token_class)
        .map(|(_, operator)| *operator);
}

// Signature shared by the rule functions.
type RuleFn = fn(&Vec<Token>, usize, usize) -> Result<(Box<ExprNode>, usize), ParseError>;

/// Parses a left-associative chain `operand (op operand)*`, where each operand
/// is parsed by `operand_rule`. Uses a loop so that `a - b - c` groups as
/// `(a - b) - c`. Each link nests the tree built so far one level deeper, so
/// it counts against the nesting limit like a parenthesis does.
fn try_left_assoc_chain_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
    allowed: &[(TokenClass, BinaryOperator)],
    operand_rule: RuleFn,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    let (mut out_expr, mut start_idx) = operand_rule(tokens, start_idx, depth)?;
    let mut chain_depth = depth;

    while let Some(operator) = binary_operator_at(tokens, start_idx, allowed) {
        chain_depth += 1;
        let (right, new_start_idx) = operand_rule(tokens, start_idx + 1, chain_depth)?;

        out_expr = Box::new(ExprNode::BinaryOp {
            operator,
            left: out_expr,
            right,
        });
        start_idx = new_start_idx;
    }

    return Ok((out_expr, start_idx));
}

/// Tries to parse according to the production `term -> power (('*' | '/') power)*`.
fn try_term_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    return try_left_assoc_chain_rule(
        tokens,
        start_idx,
        depth,
        &[
            (TokenClass::Star, BinaryOperator::Multiply),
            (TokenClass::Slash, BinaryOperator::Divide),
        ],
        try_power_rule,
    );
}

/// Tries to parse according to the production `e -> term (('+' | '-') term)*`.
fn try_expression_rule(
    tokens: &Vec<Token>,
    start_idx: usize,
    depth: usize,
) -> Result<(Box<ExprNode>, usize), ParseError> {
    return try_left_assoc_chain_rule(
        tokens,
        start_idx,
        depth,
        &[
            (TokenClass::Plus, BinaryOperator::Add),
            (TokenClass::Minus, BinaryOperator::Subtract),
        ],
        try_term_rule,
    );
}

/// Uses recursive descent to parse the given vector of tokens into a single
/// expression tree. Every token must be consumed.
///
/// Assumes that the input token vector has discarded whitespace (i.e. it was
/// produced via run_lexical_analysis with `discard_uninteresting = true`).
pub fn parse_tokens(tokens: &Vec<Token>) -> Result<Box<ExprNode>, ParseError> {
    let (expr_node, start_idx) = try_expression_rule(tokens, 0, 0)?;

    if let Some(token) = tokens.get(start_idx) {
        return Err(ParseError::UnexpectedTrailingInput {
            found_token_text: token.token_text.clone(),
            position: token.position,
        });
    }

    return Ok(expr_node);
}

/// Runs the lexer and the parser on `input_str`.
pub fn parse(input_str: &str) -> Result<Box<ExprNode>, ParseError> {
    let tokens = run_lexical_analysis(input_str, true);
    return parse_tokens(&tokens);
}
