use std::path::Path;
use std::process;

use serde::Deserialize;

use racket_road_core::{generate, Catalog, Expression};

use crate::{report_error, OutputFormat};

/// Pill layout file: ordered lines of catalog ids.
#[derive(Debug, Deserialize)]
struct PillLayout {
    lines: Vec<Vec<String>>,
}

pub(crate) fn cmd_generate(file: &Path, output: OutputFormat, quiet: bool) {
    // Step 1: Read and parse the layout file
    let text = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("cannot read {}: {}", file.display(), e), output, quiet);
            process::exit(1);
        }
    };
    let layout: PillLayout = match serde_json::from_str(&text) {
        Ok(l) => l,
        Err(e) => {
            report_error(&format!("invalid layout file: {}", e), output, quiet);
            process::exit(1);
        }
    };

    // Step 2: Build the expression from catalog ids
    let catalog = Catalog::standard();
    let mut expr = Expression::new();
    for (i, ids) in layout.lines.iter().enumerate() {
        let line = if i == 0 { 0 } else { expr.push_line() };
        for id in ids {
            let spec = match catalog.get(id) {
                Some(s) => s,
                None => {
                    report_error(&format!("unknown pill id '{}'", id), output, quiet);
                    process::exit(1);
                }
            };
            if let Err(e) = expr.place(spec, line) {
                report_error(&format!("cannot place '{}': {}", id, e), output, quiet);
                process::exit(1);
            }
        }
    }

    // Step 3: Generate and print
    let code = generate(&expr);
    if !quiet {
        match output {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "code": code }));
            }
            OutputFormat::Text => {
                println!("{}", code);
            }
        }
    }
}
