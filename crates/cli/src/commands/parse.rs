use std::path::{Path, PathBuf};
use std::process;

use serde_json::json;

use super::load_or_exit;
use crate::{report_parse_error, OutputFormat};

pub(crate) fn cmd_parse(file: &Path, include_dirs: Vec<PathBuf>, output: OutputFormat, quiet: bool) {
    let value = if file == Path::new("-") {
        match idlc_core::parse_reader(std::io::stdin().lock()) {
            Ok(document) => json!({
                "path": idlc_core::load::STDIN_NAME,
                "document": document,
                "includes": {},
            }),
            Err(e) => {
                report_parse_error(&e, output, quiet);
                process::exit(1);
            }
        }
    } else {
        let parsed = load_or_exit(file, include_dirs, output, quiet);
        let includes: serde_json::Map<String, serde_json::Value> = parsed
            .documents
            .iter()
            .map(|(path, document)| (path.display().to_string(), json!(document)))
            .collect();
        json!({
            "path": parsed.path.display().to_string(),
            "document": parsed.document,
            "includes": includes,
        })
    };

    let pretty = serde_json::to_string_pretty(&value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}
