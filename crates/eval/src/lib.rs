//! racket-road-eval: the external evaluator boundary.
//!
//! The core validator is heuristic and local; real evaluation is
//! delegated to an external system behind the [`Evaluator`] trait. This
//! crate provides the trait, an LLM-backed implementation, a fallback
//! remote-compiler implementation, an ordered chain over strategies,
//! and the check-then-evaluate pipeline that ties local validation to
//! the external call.
//!
//! Feature flags follow the transports: `remote` enables the
//! compiler-API evaluator, `anthropic` the reference LLM client. The
//! trait, the chain, and the pipeline carry no transport dependencies.

pub mod chain;
pub mod check;
#[cfg(feature = "remote")]
pub mod compiler;
pub mod evaluator;
pub mod llm;

// ── Convenience re-exports ───────────────────────────────────────────

pub use chain::EvaluatorChain;
pub use check::check_and_evaluate;
pub use evaluator::{is_non_answer, EvalError, Evaluator, ERROR_PREFIX};
pub use llm::{LlmClient, LlmEvaluator, Message};

#[cfg(feature = "anthropic")]
pub use llm::AnthropicClient;

#[cfg(feature = "remote")]
pub use compiler::RemoteCompilerEvaluator;
