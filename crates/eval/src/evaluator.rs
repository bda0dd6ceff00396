//! The evaluator boundary: one operation, `evaluate(code) -> String`.
//!
//! The result string is either the textual value produced by evaluating
//! the code, a short confirmation for definitions (e.g. `"x defined"`),
//! or a string beginning with the literal prefix `"Error:"` describing a
//! syntax or runtime failure. The core treats every implementation as an
//! opaque, potentially slow, potentially failing remote call.

use async_trait::async_trait;

/// Prefix marking an evaluator-reported failure in an otherwise
/// successful response.
pub const ERROR_PREFIX: &str = "Error:";

/// Responses recognized as "the evaluator had no real answer". A chain
/// treats these as a miss and consults the next evaluator.
const NON_ANSWERS: &[&str] = &[
    "// AI evaluation did not produce a structured output.",
    "// Could not evaluate.",
];

/// All errors a transport to an external evaluator can produce.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Network or HTTP failure reaching the service.
    #[error("evaluator network error: {0}")]
    Network(String),

    /// The service answered with an error status.
    #[error("evaluator API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service's response could not be understood.
    #[error("evaluator parse error: {0}")]
    Parse(String),

    /// Required configuration (endpoint, credentials) is missing.
    #[error("evaluator not configured: {0}")]
    NotConfigured(String),

    /// Every evaluator in a chain was consulted without producing an
    /// answer.
    #[error("no evaluator produced an answer")]
    NoAnswer,
}

/// An external evaluator for generated source text.
///
/// Implementations must uphold the `"Error:"` prefix convention: an
/// `Ok` result starting with [`ERROR_PREFIX`] is an evaluator-reported
/// failure (runtime error, evaluator-perceived syntax error); an `Err`
/// is a transport fault and carries no judgement about the code.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluate source text, returning the result string.
    async fn evaluate(&self, code: &str) -> Result<String, EvalError>;

    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;
}

/// True when a result string is a recognized non-answer sentinel:
/// empty/whitespace output or one of the known "could not evaluate"
/// placeholders.
pub fn is_non_answer(result: &str) -> bool {
    let trimmed = result.trim();
    trimmed.is_empty() || NON_ANSWERS.contains(&trimmed)
}

/// Strip markdown code fences from a response string.
pub(crate) fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();

    if let Some(stripped) = trimmed.strip_prefix("```json") {
        if let Some(inner) = stripped.strip_suffix("```") {
            return inner.trim();
        }
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        if let Some(inner) = stripped.strip_suffix("```") {
            return inner.trim();
        }
    }

    trimmed
}

/// Minimal logging that doesn't require a full tracing setup.
pub(crate) fn diag_log(msg: &str) {
    eprintln!("[racket-road-eval] {}", msg);
}
