use std::path::Path;
use std::process;

use racket_road_core::{check_syntax, Catalog};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_check(file: &Path, output: OutputFormat, quiet: bool) {
    // Step 1: Read the source file
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            report_error(&format!("cannot read {}: {}", file.display(), e), output, quiet);
            process::exit(1);
        }
    };

    // Step 2: Run the local validator
    let catalog = Catalog::standard();
    let result = check_syntax(&source, &catalog);

    // Step 3: Format output
    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("{}", result.message);
            }
        }
    }

    if !result.is_valid {
        process::exit(1);
    }
}
