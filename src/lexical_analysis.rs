//! Splits an arithmetic expression into tokens using a table of regex rules.

use lazy_static::lazy_static;
use regex::Regex;

/// The different classes of tokens that compose an expression.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenClass {
    Number,
    Identifier,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftParen,
    RightParen,
    Whitespace,
    Error,
}

/// Represents a single token of an expression.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    /// Byte offset of the first character of the token in the source text.
    pub position: usize,
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Vector of regex patterns that correspond to each token class. Every pattern
// is anchored so that it only matches at the start of the remaining input.
lazy_static! {
    static ref TOKEN_RULES: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Number,
            regex: Regex::new(r"^[0-9.]+").expect("Unable to compile Number rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Identifier,
            regex: Regex::new(r"^[a-zA-Z]+").expect("Unable to compile Identifier rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Plus,
            regex: Regex::new(r"^\+").expect("Unable to compile Plus rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Minus,
            regex: Regex::new(r"^-").expect("Unable to compile Minus rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Star,
            regex: Regex::new(r"^\*").expect("Unable to compile Star rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Slash,
            regex: Regex::new(r"^/").expect("Unable to compile Slash rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Caret,
            regex: Regex::new(r"^\^").expect("Unable to compile Caret rule regex."),
        },
        TokenRule {
            token_class: TokenClass::LeftParen,
            regex: Regex::new(r"^\(").expect("Unable to compile LeftParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::RightParen,
            regex: Regex::new(r"^\)").expect("Unable to compile RightParen rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^\s+").expect("Unable to compile Whitespace rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Error,
            regex: Regex::new(r"(?s)^.").expect("Unable to compile Error rule regex."),
        },
    ];
}

// Finds the rule that matches the most characters from the start of the input
// string. Ties go to the rule listed first. The Error rule matches any single
// character, so some rule always matches a non-empty input.
fn get_longest_matching_rule(input_str: &str) -> (&'static TokenRule, usize) {
    let mut longest_match_len: usize = 0;
    let mut longest_token_rule = &TOKEN_RULES[TOKEN_RULES.len() - 1];

    for token_rule in TOKEN_RULES.iter() {
        if let Some(match_obj) = token_rule.regex.find(input_str) {
            if match_obj.len() > longest_match_len {
                longest_match_len = match_obj.len();
                longest_token_rule = token_rule;
            }
        }
    }

    return (longest_token_rule, longest_match_len);
}

// Given a string, returns a vector of tokens that comprise that string.
fn make_token_stream(input_str: &str) -> Vec<Token> {
    let mut curr_idx: usize = 0;
    let mut out = Vec::new();

    while curr_idx < input_str.len() {
        let (token_rule, match_len) = get_longest_matching_rule(&input_str[curr_idx..]);

        out.push(Token {
            token_class: token_rule.token_class,
            token_text: String::from(&input_str[curr_idx..curr_idx + match_len]),
            position: curr_idx,
        });
        curr_idx += match_len;
    }

    return out;
}

/// Runs lexical analysis on the given expression string. Never fails:
/// characters that belong to no token class come out as `Error` tokens and are
/// reported by the parser. If `discard_uninteresting` is set, whitespace tokens
/// are dropped from the output.
pub fn run_lexical_analysis(input_str: &str, discard_uninteresting: bool) -> Vec<Token> {
    let tokens = make_token_stream(input_str);

    if !discard_uninteresting {
        return tokens;
    }

    return tokens
        .into_iter()
        .filter(|token| token.token_class != TokenClass::Whitespace)
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    // Gets the rule for a specific token class.
    fn get_rule_for_token_class(token_class: TokenClass) -> Option<&'static TokenRule> {
        return TOKEN_RULES
            .iter()
            .find(|token_rule| token_rule.token_class == token_class);
    }

    // Helper to build an expected token.
    fn token(token_class: TokenClass, token_text: &str, position: usize) -> Token {
        return Token {
            token_class,
            token_text: String::from(token_text),
            position,
        };
    }

    // Test if get_rule_for_token_class returns the right rule.
    #[test]
    fn test_get_rule_for_token_class() {
        TOKEN_RULES.iter().for_each(|token_rule| {
            let retrieved_rule = get_rule_for_token_class(token_rule.token_class)
                .expect("Unable to get rule for token class");

            assert!(std::ptr::eq(retrieved_rule, token_rule));
        });
    }

    // Test if get_longest_matching_rule picks the right rules and lengths.
    #[test]
    fn test_longest_matching_rule() {
        // Test cases formatted as (input_str, expected_token_class, expected_match_len).
        let cases = vec![
            ("3.25 + 1", TokenClass::Number, 4),
            ("1.2.3", TokenClass::Number, 5),
            ("sqrt(2)", TokenClass::Identifier, 4),
            ("   7", TokenClass::Whitespace, 3),
            ("^2", TokenClass::Caret, 1),
            ("& 3", TokenClass::Error, 1),
            ("é", TokenClass::Error, "é".len()),
        ];

        for (input_str, expected_class, expected_len) in cases {
            let expected_rule = get_rule_for_token_class(expected_class)
                .expect("Unable to get rule for token class");
            let (retrieved_rule, match_len) = get_longest_matching_rule(input_str);

            assert!(
                std::ptr::eq(retrieved_rule, expected_rule),
                "wrong rule for {:?}",
                input_str
            );
            assert_eq!(match_len, expected_len);
        }
    }

    // Test if run_lexical_analysis keeps byte offsets and drops whitespace.
    #[test]
    fn test_run_lexical_analysis_simple() {
        let tokens = run_lexical_analysis("  sin(pi) * 2", true);

        let expected_tokens = vec![
            token(TokenClass::Identifier, "sin", 2),
            token(TokenClass::LeftParen, "(", 5),
            token(TokenClass::Identifier, "pi", 6),
            token(TokenClass::RightParen, ")", 8),
            token(TokenClass::Star, "*", 10),
            token(TokenClass::Number, "2", 12),
        ];

        assert_eq!(tokens, expected_tokens);
    }

    // Test that whitespace is kept when asked to.
    #[test]
    fn test_run_lexical_analysis_keeps_whitespace() {
        let tokens = run_lexical_analysis("1 -\t2", false);

        let classes: Vec<TokenClass> = tokens.iter().map(|token| token.token_class).collect();
        assert_eq!(
            classes,
            vec![
                TokenClass::Number,
                TokenClass::Whitespace,
                TokenClass::Minus,
                TokenClass::Whitespace,
                TokenClass::Number,
            ]
        );
    }

    // Identifiers stop at the first non-alphabetic character.
    #[test]
    fn test_identifier_followed_by_digits() {
        let tokens = run_lexical_analysis("sin2", true);

        assert_eq!(
            tokens,
            vec![
                token(TokenClass::Identifier, "sin", 0),
                token(TokenClass::Number, "2", 3),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(run_lexical_analysis("", true).is_empty());
        assert!(run_lexical_analysis("   \n", true).is_empty());
    }
}
