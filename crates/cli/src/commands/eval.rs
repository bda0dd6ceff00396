use std::path::Path;
use std::process;

use racket_road_core::Catalog;
use racket_road_eval::{
    check_and_evaluate, AnthropicClient, EvaluatorChain, LlmEvaluator, RemoteCompilerEvaluator,
};

use crate::{report_error, OutputFormat};

/// Default model for the LLM evaluator.
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

pub(crate) fn cmd_eval(file: &Path, model: Option<&str>, output: OutputFormat, quiet: bool) {
    // Step 1: Read the source file
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("cannot read {}: {}", file.display(), e), output, quiet);
            process::exit(1);
        }
    };

    // Step 2: Assemble the evaluator chain from the environment
    let mut chain = EvaluatorChain::new(vec![]);
    if let Ok(client) = AnthropicClient::from_env() {
        let model = model.unwrap_or(DEFAULT_MODEL).to_string();
        chain.push(Box::new(LlmEvaluator::new(Box::new(client), model)));
    }
    if let Ok(compiler) = RemoteCompilerEvaluator::from_env() {
        chain.push(Box::new(compiler));
    }
    if chain.is_empty() {
        report_error(
            "no evaluator configured: set ANTHROPIC_API_KEY or RACKET_ROAD_COMPILER_URL",
            output,
            quiet,
        );
        process::exit(1);
    }

    // Step 3: Validate, then evaluate
    let catalog = Catalog::standard();
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let result = rt.block_on(check_and_evaluate(&source, &catalog, &chain));

    // Step 4: Format output
    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", result.message);
                if let Some(ref evaluation) = result.simulated_evaluation {
                    println!("=> {}", evaluation);
                }
            }
        }
    }

    if !result.is_valid {
        process::exit(1);
    }
}
