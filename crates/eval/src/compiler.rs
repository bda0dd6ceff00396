//! Fallback evaluator backed by a third-party code-execution API.
//!
//! POSTs the source to an execute endpoint as JSON
//! (`{"script": ..., "language": "racket", "clientId": ...,
//! "clientSecret": ...}`) and reads the response object's `output`
//! field. A non-null `error` field in the response is an
//! evaluator-reported failure and surfaces through the `"Error:"`
//! prefix convention; HTTP and parse failures are transport errors.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime.

use async_trait::async_trait;

use crate::evaluator::{EvalError, Evaluator, ERROR_PREFIX};

/// Environment variable naming the execute endpoint.
pub const ENDPOINT_ENV: &str = "RACKET_ROAD_COMPILER_URL";
/// Environment variables carrying the API credentials.
pub const CLIENT_ID_ENV: &str = "RACKET_ROAD_COMPILER_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "RACKET_ROAD_COMPILER_CLIENT_SECRET";

/// Evaluator that delegates to a remote compiler-execution service.
pub struct RemoteCompilerEvaluator {
    /// Full URL of the execute endpoint.
    pub endpoint: String,
    /// Optional API credentials, sent when present.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl RemoteCompilerEvaluator {
    /// Create an evaluator for an explicit endpoint.
    pub fn new(endpoint: String) -> Self {
        RemoteCompilerEvaluator {
            endpoint,
            client_id: None,
            client_secret: None,
        }
    }

    /// Create an evaluator from the environment. The endpoint variable
    /// is required; credentials are optional.
    pub fn from_env() -> Result<Self, EvalError> {
        let endpoint = std::env::var(ENDPOINT_ENV).map_err(|_| {
            EvalError::NotConfigured(format!("{} environment variable not set", ENDPOINT_ENV))
        })?;
        Ok(RemoteCompilerEvaluator {
            endpoint,
            client_id: std::env::var(CLIENT_ID_ENV).ok(),
            client_secret: std::env::var(CLIENT_SECRET_ENV).ok(),
        })
    }

    fn build_body(&self, code: &str) -> serde_json::Value {
        let mut body = serde_json::json!({
            "script": code,
            "language": "racket",
            "versionIndex": "0",
        });
        if let Some(ref id) = self.client_id {
            body["clientId"] = serde_json::Value::String(id.clone());
        }
        if let Some(ref secret) = self.client_secret {
            body["clientSecret"] = serde_json::Value::String(secret.clone());
        }
        body
    }

    /// Map a response object to a result string per the evaluator
    /// contract.
    fn interpret_response(json: &serde_json::Value) -> Result<String, EvalError> {
        if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
            if !error.trim().is_empty() {
                return Ok(format!("{} {}", ERROR_PREFIX, error.trim()));
            }
        }
        match json.get("output").and_then(|o| o.as_str()) {
            Some(output) => Ok(output.trim_end().to_string()),
            None => Err(EvalError::Parse(
                "compiler response has no 'output' field".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Evaluator for RemoteCompilerEvaluator {
    async fn evaluate(&self, code: &str) -> Result<String, EvalError> {
        let endpoint = self.endpoint.clone();
        let body = self.build_body(code);

        let result: Result<String, EvalError> = tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            let response = agent
                .post(&endpoint)
                .header("content-type", "application/json")
                .send_json(body)
                .map_err(|e| EvalError::Network(e.to_string()))?;

            let json: serde_json::Value = response.into_body().read_json().map_err(|e| {
                EvalError::Parse(format!("failed to parse compiler response: {}", e))
            })?;
            Self::interpret_response(&json)
        })
        .await
        .map_err(|e| EvalError::Network(format!("task join error: {}", e)))?;

        result
    }

    fn name(&self) -> &str {
        "remote-compiler"
    }
}
