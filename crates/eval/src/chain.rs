//! Ordered chain of evaluators, tried until one produces an answer.
//!
//! Each strategy implements the same `evaluate(code) -> String`
//! contract. The chain consults them in order: a transport error or a
//! recognized non-answer sentinel (empty output, an explicit "could not
//! evaluate" placeholder) falls through to the next strategy. The chain
//! is transparent to its caller, which only ever sees one final result.

use async_trait::async_trait;

use crate::evaluator::{diag_log, is_non_answer, EvalError, Evaluator};

/// Chain-of-responsibility over boxed evaluator strategies.
pub struct EvaluatorChain {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl EvaluatorChain {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        EvaluatorChain { evaluators }
    }

    /// Append a strategy to the end of the chain.
    pub fn push(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

#[async_trait]
impl Evaluator for EvaluatorChain {
    async fn evaluate(&self, code: &str) -> Result<String, EvalError> {
        let mut last_error: Option<EvalError> = None;

        for evaluator in &self.evaluators {
            match evaluator.evaluate(code).await {
                Ok(result) if !is_non_answer(&result) => return Ok(result),
                Ok(_) => {
                    diag_log(&format!(
                        "evaluator '{}' returned a non-answer, trying next",
                        evaluator.name()
                    ));
                }
                Err(e) => {
                    diag_log(&format!("evaluator '{}' failed: {}", evaluator.name(), e));
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(EvalError::NoAnswer))
    }

    fn name(&self) -> &str {
        "chain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Evaluator with a fixed response, counting invocations.
    struct StaticEvaluator {
        response: Result<String, &'static str>,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl StaticEvaluator {
        fn answering(s: &str) -> Self {
            StaticEvaluator {
                response: Ok(s.to_string()),
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn failing(msg: &'static str) -> Self {
            StaticEvaluator {
                response: Err(msg),
                calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Evaluator for StaticEvaluator {
        async fn evaluate(&self, _code: &str) -> Result<String, EvalError> {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(msg) => Err(EvalError::Network(msg.to_string())),
            }
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn first_answer_wins() {
        let chain = EvaluatorChain::new(vec![
            Box::new(StaticEvaluator::answering("3")),
            Box::new(StaticEvaluator::answering("unreached")),
        ]);
        assert_eq!(chain.evaluate("(+ 1 2)").await.unwrap(), "3");
    }

    #[tokio::test]
    async fn sentinel_falls_through() {
        let chain = EvaluatorChain::new(vec![
            Box::new(StaticEvaluator::answering("")),
            Box::new(StaticEvaluator::answering(
                "// AI evaluation did not produce a structured output.",
            )),
            Box::new(StaticEvaluator::answering("'(2)")),
        ]);
        assert_eq!(chain.evaluate("(filter even? x)").await.unwrap(), "'(2)");
    }

    #[tokio::test]
    async fn transport_error_falls_through() {
        let chain = EvaluatorChain::new(vec![
            Box::new(StaticEvaluator::failing("connection refused")),
            Box::new(StaticEvaluator::answering("x defined")),
        ]);
        assert_eq!(chain.evaluate("(define x 10)").await.unwrap(), "x defined");
    }

    #[tokio::test]
    async fn error_prefixed_answer_is_an_answer() {
        // An evaluator-reported error is a real result, not a miss.
        let chain = EvaluatorChain::new(vec![
            Box::new(StaticEvaluator::answering("Error: division by zero")),
            Box::new(StaticEvaluator::answering("unreached")),
        ]);
        assert_eq!(
            chain.evaluate("(/ 1 0)").await.unwrap(),
            "Error: division by zero"
        );
    }

    #[tokio::test]
    async fn exhausted_chain_reports_last_error() {
        let chain = EvaluatorChain::new(vec![
            Box::new(StaticEvaluator::failing("first down")),
            Box::new(StaticEvaluator::failing("second down")),
        ]);
        let err = chain.evaluate("(+ 1 2)").await.unwrap_err();
        match err {
            EvalError::Network(msg) => assert_eq!(msg, "second down"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn exhausted_chain_of_sentinels_reports_no_answer() {
        let chain = EvaluatorChain::new(vec![Box::new(StaticEvaluator::answering(""))]);
        let err = chain.evaluate("(+ 1 2)").await.unwrap_err();
        assert!(matches!(err, EvalError::NoAnswer));
    }

    #[tokio::test]
    async fn empty_chain_reports_no_answer() {
        let chain = EvaluatorChain::new(vec![]);
        let err = chain.evaluate("(+ 1 2)").await.unwrap_err();
        assert!(matches!(err, EvalError::NoAnswer));
    }
}
