//! The check-then-evaluate pipeline.
//!
//! Local structural errors short-circuit before any external call is
//! made; transport faults degrade to an explicit failure result rather
//! than propagating. Each invocation runs to completion independently —
//! if a caller fires overlapping checks, it must order results by
//! completion, not initiation (nothing here cancels an in-flight call).

use racket_road_core::{check_syntax, Catalog, ValidationResult};

use crate::evaluator::{EvalError, Evaluator, ERROR_PREFIX};

/// Run the local validator and, when it passes, a single external
/// evaluation.
///
/// # Arguments
/// * `source` - generated (or user-supplied) Racket source text
/// * `catalog` - the token catalog backing the arity heuristics
/// * `evaluator` - the external evaluator (or chain) to consult
///
/// # Returns
/// A fresh `ValidationResult`: structural errors carry a line index and
/// never reach the evaluator; evaluator-reported errors carry the
/// `"Error:"` message with no line index; transport faults surface as a
/// generic evaluation-service failure.
pub async fn check_and_evaluate(
    source: &str,
    catalog: &Catalog,
    evaluator: &dyn Evaluator,
) -> ValidationResult {
    let local = check_syntax(source, catalog);
    if !local.is_valid {
        return local;
    }
    // The only locally-produced evaluation is the empty-expression
    // echo; nothing to evaluate externally in that case.
    if local.simulated_evaluation.is_some() {
        return local;
    }

    match evaluator.evaluate(source).await {
        Ok(result) if result.trim_start().starts_with(ERROR_PREFIX) => {
            ValidationResult::failure(result)
        }
        Ok(result) => ValidationResult::valid_with_evaluation(local.message, result),
        Err(e) => ValidationResult::failure(format!("Evaluation service failed: {}", e)),
    }
}
