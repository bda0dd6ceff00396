use racket_road_core::Catalog;

use crate::OutputFormat;

pub(crate) fn cmd_catalog(output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }

    let catalog = Catalog::standard();
    match output {
        OutputFormat::Json => {
            let specs: Vec<_> = catalog.iter().collect();
            let json = serde_json::to_string_pretty(&specs)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{} pills", catalog.len());
            println!();
            for spec in catalog.iter() {
                let expects = if spec.expects.is_empty() {
                    String::new()
                } else {
                    let cats: Vec<String> =
                        spec.expects.iter().map(|c| c.to_string()).collect();
                    format!("  expects: {}", cats.join(", "))
                };
                println!(
                    "  {:<20} {:<20} {:<10}{}",
                    spec.id, spec.label, spec.category, expects
                );
            }
        }
    }
}
