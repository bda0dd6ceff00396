//! Local syntax validator: structural and heuristic checks over
//! generated (or user-supplied) source text.
//!
//! The checks run in order and short-circuit at the first violation:
//! emptiness, global parenthesis balance, then per-line shape and arity.
//! Arity and shape policy is a rule table keyed by catalog entry id, so
//! per-operator behavior is data rather than an accumulation of special
//! cases.
//!
//! The validator never claims semantic correctness. Unbound identifiers,
//! type errors, and the like are surfaced only by the external evaluator
//! consulted after this stage passes.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TokenSpec};
use crate::error::SyntaxError;
use crate::lexer::{is_identifier, is_number_literal, is_string_literal, tokenize};

/// Message reported for an all-blank source.
pub const EMPTY_MESSAGE: &str = "Expression is empty.";
/// Echo value reported for an all-blank source.
pub const EMPTY_EVALUATION: &str = "// Expression is empty";
/// Message reported when every local check passes.
pub const PLAUSIBLE_MESSAGE: &str = "Syntax appears plausible.";

/// Outcome of a syntax check, produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
    /// 0-based index of the offending line, when one can be named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_line_index: Option<usize>,
    /// Evaluation text supplied by the external evaluator (or the empty
    /// echo); absent for purely local checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulated_evaluation: Option<String>,
}

impl ValidationResult {
    pub fn valid(message: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: true,
            message: message.into(),
            error_line_index: None,
            simulated_evaluation: None,
        }
    }

    pub fn valid_with_evaluation(message: impl Into<String>, evaluation: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: true,
            message: message.into(),
            error_line_index: None,
            simulated_evaluation: Some(evaluation.into()),
        }
    }

    /// A failing result carrying the offending line.
    pub fn invalid(error: SyntaxError) -> Self {
        ValidationResult {
            is_valid: false,
            message: error.message,
            error_line_index: Some(error.line),
            simulated_evaluation: None,
        }
    }

    /// A failing result with no line attribution (evaluator-reported and
    /// transport errors).
    pub fn failure(message: impl Into<String>) -> Self {
        ValidationResult {
            is_valid: false,
            message: message.into(),
            error_line_index: None,
            simulated_evaluation: None,
        }
    }
}

/// Check source text against the local heuristics.
pub fn check_syntax(source: &str, catalog: &Catalog) -> ValidationResult {
    let lines: Vec<&str> = source.split('\n').collect();

    if lines.iter().all(|line| line.trim().is_empty()) {
        return ValidationResult::valid_with_evaluation(EMPTY_MESSAGE, EMPTY_EVALUATION);
    }

    if let Err(e) = check_balance(&lines) {
        return ValidationResult::invalid(e);
    }

    for (index, raw) in lines.iter().enumerate() {
        if let Err(e) = check_line(index, raw, catalog) {
            return ValidationResult::invalid(e);
        }
    }

    ValidationResult::valid(PLAUSIBLE_MESSAGE)
}

// ── Global balance ───────────────────────────────────────────────────

fn check_balance(lines: &[&str]) -> Result<(), SyntaxError> {
    let mut balance: i64 = 0;
    for (index, line) in lines.iter().enumerate() {
        for c in line.chars() {
            match c {
                '(' => balance += 1,
                ')' => {
                    balance -= 1;
                    if balance < 0 {
                        return Err(SyntaxError::new(
                            index,
                            format!(
                                "Syntax Error: Unmatched closing parenthesis on or before line {}. Check: {}",
                                index + 1,
                                line
                            ),
                        ));
                    }
                }
                _ => {}
            }
        }
    }
    if balance > 0 {
        let index = lines
            .iter()
            .rposition(|line| line.contains('('))
            .unwrap_or(lines.len() - 1);
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error: Unmatched opening parenthesis. Possible issue around line {}.",
                index + 1
            ),
        ));
    }
    Ok(())
}

// ── Per-line shape ───────────────────────────────────────────────────

fn check_line(index: usize, raw: &str, catalog: &Catalog) -> Result<(), SyntaxError> {
    let line = raw.trim();
    if line.is_empty() || line == "()" {
        return Ok(());
    }

    let tokens = tokenize(line);
    if tokens.is_empty() {
        return Ok(());
    }

    // A single bare token is a standalone atom: numbers, strings,
    // identifiers, and booleans all pass, and anything else is accepted
    // leniently as possible user-defined text.
    if tokens.len() == 1 && tokens[0] != "(" && tokens[0] != ")" {
        return Ok(());
    }

    if tokens[0] != "(" {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: Expected expression to start with '('. Found: '{}...'",
                index + 1,
                tokens[0]
            ),
        ));
    }
    if tokens[tokens.len() - 1] != ")" {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: Expected expression to end with ')'. Line: {}",
                index + 1,
                line
            ),
        ));
    }

    let body = &tokens[1..tokens.len() - 1];
    if body.is_empty() {
        // Empty list.
        return Ok(());
    }

    let head = body[0].as_str();
    let args = &body[1..];

    // A literal cannot be called with arguments.
    if (is_number_literal(head) || (is_string_literal(head) && head != "\"\"")) && body.len() > 1 {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: Operator/function expected. Found value '{}' at the start of an expression.",
                index + 1,
                head
            ),
        ));
    }

    match catalog.by_label(head) {
        Some(spec) => apply_rule(rule_for(spec), spec, args, index),
        // Unrecognized heads are accepted leniently as possible
        // user-defined identifiers.
        None => Ok(()),
    }
}

// ── Arity rule table ─────────────────────────────────────────────────

/// Per-catalog-entry arity and shape policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArityRule {
    /// `define` forms: simple-variable and function-definition shapes.
    DefineShape,
    /// Accepted with any argument count, zero included, even though the
    /// catalog declares expected categories. Documented leniency.
    Variadic,
    /// At least this many arguments.
    AtLeast(usize),
    /// No declared expectations; nothing to enforce.
    Unconstrained,
}

fn rule_for(spec: &TokenSpec) -> ArityRule {
    match spec.id.as_str() {
        "define" => ArityRule::DefineShape,
        "list" | "+" | "-" | "=" => ArityRule::Variadic,
        _ if !spec.expects.is_empty() => ArityRule::AtLeast(spec.expects.len()),
        _ => ArityRule::Unconstrained,
    }
}

fn apply_rule(
    rule: ArityRule,
    spec: &TokenSpec,
    args: &[String],
    index: usize,
) -> Result<(), SyntaxError> {
    match rule {
        ArityRule::DefineShape => check_define(args, index),
        ArityRule::Variadic | ArityRule::Unconstrained => Ok(()),
        ArityRule::AtLeast(expected) => {
            if args.len() < expected {
                return Err(SyntaxError::new(
                    index,
                    format!(
                        "Syntax Error on line {}: Not enough arguments for '{}'. Expected {}, got {}.",
                        index + 1,
                        spec.label,
                        expected,
                        args.len()
                    ),
                ));
            }
            Ok(())
        }
    }
}

// ── define shapes ────────────────────────────────────────────────────

fn check_define(args: &[String], index: usize) -> Result<(), SyntaxError> {
    if args.is_empty() {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: 'define' needs at least a name and a value/body. Example: (define x 10).",
                index + 1
            ),
        ));
    }

    if args[0] == "(" {
        // Function-definition head: the parenthesized sub-form must be
        // balanced, non-trivial, and followed by a body.
        let header_end = matching_paren(args);
        let header_end = match header_end {
            Some(end) => end,
            None => {
                return Err(SyntaxError::new(
                    index,
                    format!(
                        "Syntax Error on line {}: Malformed function definition in 'define'. Expected (define (func-name args...) body).",
                        index + 1
                    ),
                ))
            }
        };
        if header_end < 2 {
            // `()` header names nothing.
            return Err(SyntaxError::new(
                index,
                format!(
                    "Syntax Error on line {}: Malformed function definition in 'define'. Expected (define (func-name args...) body).",
                    index + 1
                ),
            ));
        }
        if header_end + 1 >= args.len() {
            return Err(SyntaxError::new(
                index,
                format!(
                    "Syntax Error on line {}: Function definition in 'define' is missing a body.",
                    index + 1
                ),
            ));
        }
        return Ok(());
    }

    // Simple variable form.
    if args.len() < 2 {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: 'define' expects a variable and a value. Example: (define x 10).",
                index + 1
            ),
        ));
    }
    if !is_identifier(&args[0]) {
        return Err(SyntaxError::new(
            index,
            format!(
                "Syntax Error on line {}: Invalid variable name '{}' in define.",
                index + 1,
                args[0]
            ),
        ));
    }
    Ok(())
}

/// Index of the `)` matching the `(` at position 0, if present.
fn matching_paren(tokens: &[String]) -> Option<usize> {
    let mut depth: i64 = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "(" => depth += 1,
            ")" => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::standard()
    }

    fn check(source: &str) -> ValidationResult {
        check_syntax(source, &catalog())
    }

    // -- emptiness --

    #[test]
    fn empty_source_is_valid() {
        let result = check("");
        assert!(result.is_valid);
        assert_eq!(result.message, EMPTY_MESSAGE);
        assert_eq!(result.simulated_evaluation.as_deref(), Some(EMPTY_EVALUATION));
    }

    #[test]
    fn blank_lines_are_valid() {
        let result = check("   \n  ");
        assert!(result.is_valid);
        assert_eq!(result.message, EMPTY_MESSAGE);
    }

    // -- balance --

    #[test]
    fn net_positive_balance_fails_on_last_open_line() {
        let result = check("(+ 1 2");
        assert!(!result.is_valid);
        assert_eq!(result.error_line_index, Some(0));
        assert!(result.message.contains("Unmatched opening parenthesis"));
    }

    #[test]
    fn negative_balance_fails_at_first_offense() {
        let result = check("(+ 1 2)\n(first x))");
        assert!(!result.is_valid);
        assert_eq!(result.error_line_index, Some(1));
        assert!(result.message.contains("Unmatched closing parenthesis"));
        assert!(result.message.contains("line 2"));
    }

    #[test]
    fn multiline_positive_balance_points_at_last_open_line() {
        let result = check("(define x 10)\n(+ x 1");
        assert!(!result.is_valid);
        assert_eq!(result.error_line_index, Some(1));
    }

    // -- atoms and shapes --

    #[test]
    fn atoms_pass() {
        assert!(check("x").is_valid);
        assert!(check("42").is_valid);
        assert!(check("\"hello\"").is_valid);
        assert!(check("#t").is_valid);
    }

    #[test]
    fn empty_list_passes() {
        assert!(check("()").is_valid);
    }

    #[test]
    fn line_must_start_with_open_paren() {
        let result = check("define x 10)");
        assert!(!result.is_valid);
        assert!(result.message.contains("start with '('"));
        assert_eq!(result.error_line_index, Some(0));
    }

    #[test]
    fn literal_head_cannot_take_arguments() {
        let result = check("(3 4)");
        assert!(!result.is_valid);
        assert!(result.message.contains("Found value '3'"));
    }

    #[test]
    fn lone_literal_call_is_tolerated() {
        // `(3)` has a literal head but no arguments; left to the
        // external evaluator.
        assert!(check("(3)").is_valid);
    }

    // -- define --

    #[test]
    fn define_simple_form_passes() {
        assert!(check("(define x 10)").is_valid);
    }

    #[test]
    fn define_missing_value_fails() {
        let result = check("(define x)");
        assert!(!result.is_valid);
        assert_eq!(result.error_line_index, Some(0));
        assert!(result.message.contains("'define' expects a variable and a value"));
    }

    #[test]
    fn define_bare_keyword_fails() {
        let result = check("(define)");
        assert!(!result.is_valid);
        assert!(result.message.contains("needs at least a name"));
    }

    #[test]
    fn define_invalid_variable_name_fails() {
        let result = check("(define 5 10)");
        assert!(!result.is_valid);
        assert!(result.message.contains("Invalid variable name '5'"));
    }

    #[test]
    fn define_function_form_passes() {
        assert!(check("(define (double x) (+ x x))").is_valid);
    }

    #[test]
    fn define_function_form_empty_header_fails() {
        let result = check("(define () 10)");
        assert!(!result.is_valid);
        assert!(result.message.contains("Malformed function definition"));
    }

    #[test]
    fn define_function_form_missing_body_fails() {
        let result = check("(define (double x))");
        assert!(!result.is_valid);
        assert!(result.message.contains("missing a body"));
    }

    // -- arity --

    #[test]
    fn declared_arity_enforced() {
        let result = check("(filter even?)");
        assert!(!result.is_valid);
        assert_eq!(result.error_line_index, Some(0));
        assert!(result.message.contains("Not enough arguments for 'filter'"));
        assert!(result.message.contains("Expected 2, got 1"));
    }

    #[test]
    fn satisfied_arity_passes() {
        assert!(check("(filter even? x)").is_valid);
        assert!(check("(foldr + 0 x)").is_valid);
    }

    #[test]
    fn variadic_heads_accept_zero_arguments() {
        assert!(check("(list)").is_valid);
        assert!(check("(+)").is_valid);
        assert!(check("(-)").is_valid);
        assert!(check("(=)").is_valid);
    }

    #[test]
    fn unknown_heads_accepted() {
        assert!(check("(my-function 1 2 3)").is_valid);
    }

    // -- results --

    #[test]
    fn plausible_message_on_success() {
        let result = check("(define x 10)\n(+ x 1)");
        assert!(result.is_valid);
        assert_eq!(result.message, PLAUSIBLE_MESSAGE);
        assert_eq!(result.error_line_index, None);
        assert_eq!(result.simulated_evaluation, None);
    }

    #[test]
    fn result_serialization_skips_absent_fields() {
        let result = check("(define x 10)");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["is_valid"], serde_json::json!(true));
        assert!(json.get("error_line_index").is_none());
        assert!(json.get("simulated_evaluation").is_none());
    }

    #[test]
    fn parens_inside_strings_count_toward_balance() {
        // The balance scan is raw characters; a quoted `(` leaves the
        // total positive.
        let result = check("(display \"(\")");
        assert!(!result.is_valid);
        assert!(result.message.contains("Unmatched opening parenthesis"));
    }
}
