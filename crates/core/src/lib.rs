//! racket-road-core: the pill-to-code compiler and heuristic validator.
//!
//! Converts ordered sequences of typed tokens ("pills") into Racket-like
//! S-expression source text and performs a bounded, non-authoritative
//! local syntax check before the text is handed to an external
//! evaluator.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Catalog`] -- immutable token registry, built once at startup
//! - [`Expression`] -- lines of placed tokens under construction
//! - [`generate()`] -- serialize an expression to source text
//! - [`check_syntax()`] -- run the local heuristic validator
//! - [`next_expected()`] -- advisory next-category resolution
//! - [`ValidationResult`] / [`SyntaxError`] -- check outcomes
//!
//! The validator is heuristic by design: it detects a bounded set of
//! structural error classes (parenthesis balance, call shape, arity
//! floors, `define` shapes) and defers everything semantic to the
//! external evaluator behind the `racket-road-eval` crate.

pub mod catalog;
pub mod error;
pub mod expect;
pub mod expression;
pub mod generate;
pub mod lexer;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use catalog::{Catalog, CatalogError, Category, TokenSpec};
pub use error::SyntaxError;
pub use expression::{Expression, ExpressionError, Line, PlacedToken};
pub use validate::ValidationResult;

// ── Convenience re-exports: entry points ─────────────────────────────

pub use expect::next_expected;
pub use generate::generate;
pub use lexer::tokenize;
pub use validate::check_syntax;
