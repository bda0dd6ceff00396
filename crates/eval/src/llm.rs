//! LLM-backed evaluator: LlmEvaluator, LlmClient trait, AnthropicClient.
//!
//! The evaluator prompts a model to act as a Racket interpreter and
//! answer with strict JSON. Transport is abstracted behind [`LlmClient`]
//! so the evaluator is testable with a mock; the reference
//! [`AnthropicClient`] lives behind the `anthropic` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::evaluator::{diag_log, strip_code_fences, EvalError, Evaluator, ERROR_PREFIX};

/// A message in an LLM conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// Trait for calling an LLM to get a text completion.
///
/// Implementations handle the specifics of the LLM API. The evaluator
/// handles prompt construction and response parsing.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send messages to the LLM and get a text response.
    async fn complete(&self, messages: Vec<Message>, model: &str) -> Result<String, EvalError>;
}

/// The strict-JSON shape the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct LlmVerdict {
    evaluation_result: String,
    evaluation_success: bool,
}

/// An evaluator that asks an LLM to interpret Racket code.
pub struct LlmEvaluator {
    /// The LLM client to use for completions.
    pub client: Box<dyn LlmClient>,
    /// System prompt override. If empty, the default system prompt is used.
    pub system_prompt: String,
    /// Model identifier.
    pub model: String,
    /// Maximum number of retries on invalid responses.
    pub max_retries: usize,
}

impl LlmEvaluator {
    /// Create a new LlmEvaluator with default settings.
    pub fn new(client: Box<dyn LlmClient>, model: String) -> Self {
        Self {
            client,
            system_prompt: String::new(),
            model,
            max_retries: 2,
        }
    }

    fn default_system_prompt() -> String {
        r#"You are a Racket programming language interpreter.
Your task is to evaluate the provided Racket code.

Follow these rules for the output:
1. If the code evaluates successfully to a value, provide that value as 'evaluation_result'. Set 'evaluation_success' to true.
2. If the code is a definition (e.g., (define x 10)), 'evaluation_result' should be a short confirmation like "x defined" or "my-func defined". Set 'evaluation_success' to true.
3. If the code results in an error during evaluation (e.g., division by zero, unbound variable), 'evaluation_result' should be a concise error message starting with "Error:" (e.g., "Error: division by zero"). Set 'evaluation_success' to false.
4. If the code is syntactically incorrect in a way that prevents evaluation, 'evaluation_result' should describe the syntax error, starting with "Error:". Set 'evaluation_success' to false.

Respond ONLY with a JSON object in exactly this format:
{"evaluation_result": "<result string>", "evaluation_success": <true|false>}

Example scenarios:
- Input: (+ 1 2) -> {"evaluation_result": "3", "evaluation_success": true}
- Input: (define my-var 42) -> {"evaluation_result": "my-var defined", "evaluation_success": true}
- Input: (first '(a b c)) -> {"evaluation_result": "'a", "evaluation_success": true}
- Input: (+ 1 #t) -> {"evaluation_result": "Error: expected number, got boolean", "evaluation_success": false}
- Input: (define x (list 1 2 3))
         (filter even? x) -> {"evaluation_result": "'(2)", "evaluation_success": true}
- Input: (this-is-not-defined) -> {"evaluation_result": "Error: this-is-not-defined: unbound identifier", "evaluation_success": false}

Do not include markdown, backticks, or any other formatting around the JSON."#
            .to_string()
    }

    fn build_user_message(code: &str) -> String {
        format!("Racket code to evaluate:\n\n{}", code)
    }

    /// Parse the LLM response. `Err` carries the problem description and
    /// triggers a retry with a correction prompt.
    fn parse_response(response: &str) -> Result<LlmVerdict, String> {
        let json_str = strip_code_fences(response);
        serde_json::from_str::<LlmVerdict>(json_str)
            .map_err(|e| format!("response is not the expected JSON object: {}", e))
    }
}

#[async_trait]
impl Evaluator for LlmEvaluator {
    async fn evaluate(&self, code: &str) -> Result<String, EvalError> {
        if code.trim().is_empty() {
            return Ok(racket_road_core::validate::EMPTY_EVALUATION.to_string());
        }

        let system_prompt = if self.system_prompt.is_empty() {
            Self::default_system_prompt()
        } else {
            self.system_prompt.clone()
        };

        let mut messages: Vec<Message> = vec![
            Message {
                role: "system".to_string(),
                content: system_prompt,
            },
            Message {
                role: "user".to_string(),
                content: Self::build_user_message(code),
            },
        ];

        let mut attempt = 0;
        loop {
            let response = self.client.complete(messages.clone(), &self.model).await?;

            match Self::parse_response(&response) {
                Ok(verdict) => {
                    if verdict.evaluation_success
                        || verdict.evaluation_result.starts_with(ERROR_PREFIX)
                    {
                        return Ok(verdict.evaluation_result);
                    }
                    // Unsuccessful evaluations surface through the
                    // error-prefix convention even when the model forgot
                    // the prefix.
                    return Ok(format!("{} {}", ERROR_PREFIX, verdict.evaluation_result));
                }
                Err(parse_error) => {
                    if attempt >= self.max_retries {
                        diag_log(&format!(
                            "LlmEvaluator: max_retries ({}) exhausted, last error: {}",
                            self.max_retries, parse_error
                        ));
                        return Err(EvalError::Parse(parse_error));
                    }
                    attempt += 1;

                    messages.push(Message {
                        role: "assistant".to_string(),
                        content: response,
                    });
                    messages.push(Message {
                        role: "user".to_string(),
                        content: format!(
                            "Your response was invalid: {}. Please try again, responding with valid JSON only.",
                            parse_error
                        ),
                    });
                }
            }
        }
    }

    fn name(&self) -> &str {
        "llm"
    }
}

// -- AnthropicClient (feature-gated) --

#[cfg(feature = "anthropic")]
/// Reference LLM client implementation using the Anthropic Messages API.
///
/// Uses `ureq` for HTTP. Reads the API key from the `ANTHROPIC_API_KEY`
/// environment variable.
pub struct AnthropicClient {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL (default: https://api.anthropic.com).
    pub base_url: String,
}

#[cfg(feature = "anthropic")]
impl AnthropicClient {
    /// Create a new AnthropicClient from the ANTHROPIC_API_KEY environment variable.
    pub fn from_env() -> Result<Self, EvalError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            EvalError::NotConfigured("ANTHROPIC_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Create a new AnthropicClient with an explicit API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

#[cfg(feature = "anthropic")]
#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, messages: Vec<Message>, model: &str) -> Result<String, EvalError> {
        let api_key = self.api_key.clone();
        let base_url = self.base_url.clone();
        let model = model.to_string();

        // The Anthropic API takes the system prompt as a separate field.
        let system: Option<String> = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.clone());

        let non_system: Vec<serde_json::Value> = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| {
                serde_json::json!({
                    "role": m.role,
                    "content": m.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "max_tokens": 1024,
            "messages": non_system,
        });
        if let Some(sys) = system {
            body["system"] = serde_json::Value::String(sys);
        }

        // ureq is synchronous, so wrap in spawn_blocking.
        let result: Result<String, EvalError> = tokio::task::spawn_blocking(move || {
            let url = format!("{}/v1/messages", base_url);
            let agent = ureq::Agent::new_with_defaults();
            let response = agent
                .post(&url)
                .header("x-api-key", &api_key)
                .header("anthropic-version", "2023-06-01")
                .header("content-type", "application/json")
                .send_json(body);

            match response {
                Ok(resp) => {
                    let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
                        EvalError::Parse(format!("failed to parse Anthropic response: {}", e))
                    })?;
                    let text = json["content"]
                        .as_array()
                        .and_then(|arr| arr.first())
                        .and_then(|c| c["text"].as_str())
                        .map(|s| s.to_string());
                    text.ok_or_else(|| {
                        EvalError::Parse("no text content in Anthropic response".to_string())
                    })
                }
                Err(e) => Err(EvalError::Network(e.to_string())),
            }
        })
        .await
        .map_err(|e| EvalError::Network(format!("task join error: {}", e)))?;

        result
    }
}
