use std::path::{Path, PathBuf};

use idlc_core::Document;
use serde_json::json;

use super::load_or_exit;
use crate::OutputFormat;

/// Definition counts for one document.
fn summarize(document: &Document) -> serde_json::Value {
    let methods: usize = document.services.values().map(|s| s.methods.len()).sum();
    json!({
        "namespaces": document.namespaces.len(),
        "includes": document.includes.len(),
        "typedefs": document.typedefs.len(),
        "constants": document.constants.len(),
        "enums": document.enums.len(),
        "structs": document.structs.len(),
        "unions": document.unions.len(),
        "exceptions": document.exceptions.len(),
        "services": document.services.len(),
        "methods": methods,
    })
}

fn summary_line(document: &Document) -> String {
    let methods: usize = document.services.values().map(|s| s.methods.len()).sum();
    format!(
        "{} typedefs, {} constants, {} enums, {} structs, {} unions, {} exceptions, {} services ({} methods)",
        document.typedefs.len(),
        document.constants.len(),
        document.enums.len(),
        document.structs.len(),
        document.unions.len(),
        document.exceptions.len(),
        document.services.len(),
        methods
    )
}

pub(crate) fn cmd_check(file: &Path, include_dirs: Vec<PathBuf>, output: OutputFormat, quiet: bool) {
    let parsed = load_or_exit(file, include_dirs, output, quiet);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let files: serde_json::Map<String, serde_json::Value> = parsed
                .iter()
                .map(|(path, document)| (path.display().to_string(), summarize(document)))
                .collect();
            let report = json!({
                "root": parsed.path.display().to_string(),
                "files": files,
            });
            let pretty = serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            println!(
                "ok: {} ({} included file(s))",
                parsed.path.display(),
                parsed.documents.len()
            );
            for (path, document) in parsed.iter() {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                println!("  {}: {}", name, summary_line(document));
            }
        }
    }
}
