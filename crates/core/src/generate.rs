//! Code generator: serialize an expression's lines into Racket source.
//!
//! Output is deterministic for a given expression value. Empty lines
//! are dropped; the remaining per-line renderings are joined with `\n`.

use crate::catalog::Category;
use crate::expression::{Expression, PlacedToken};

/// Render an expression as Racket source text.
pub fn generate(expression: &Expression) -> String {
    expression
        .lines()
        .iter()
        .filter_map(|line| render_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn labels_joined(tokens: &[PlacedToken]) -> String {
    tokens
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_line(line: &[PlacedToken]) -> Option<String> {
    if line.is_empty() {
        return None;
    }

    // Single token: atoms stand alone, anything else becomes a call.
    if line.len() == 1 {
        let token = &line[0];
        let is_atom = matches!(token.category(), Category::Variable | Category::ListValue)
            || (token.category() == Category::Keyword && matches!(token.label(), "#t" | "#f"));
        return Some(if is_atom {
            token.label().to_string()
        } else {
            format!("({})", token.label())
        });
    }

    // define forms: (define name), (define name value), or
    // (define name (nested call ...)) when more than one token follows
    // the name.
    if line[0].spec.id == "define" {
        let name = line[1].label();
        let rest = &line[2..];
        return Some(match rest.len() {
            0 => format!("(define {})", name),
            1 => format!("(define {} {})", name, rest[0].label()),
            _ => format!("(define {} ({}))", name, labels_joined(rest)),
        });
    }

    // Any other multi-token line: one S-expression.
    Some(format!("({})", labels_joined(line)))
}
