use std::process;

use idlc_codegen::{GenerateConfig, RustGenerator};

use super::load_or_exit;
use crate::{report_error, GenerateCommands, OutputFormat};

pub(crate) fn cmd_generate(command: GenerateCommands, output: OutputFormat, quiet: bool) {
    match command {
        GenerateCommands::Rust {
            file,
            out,
            config,
            nullable_optional,
            signed_bytes,
            include_dirs,
        } => {
            let mut settings = match config {
                Some(path) => match GenerateConfig::load(&path) {
                    Ok(c) => c,
                    Err(e) => {
                        report_error(&e.to_string(), output, quiet);
                        process::exit(1);
                    }
                },
                None => GenerateConfig::default(),
            };
            // flags only switch toggles on
            settings.use_nullable_wrapper_for_optional |= nullable_optional;
            settings.treat_byte_type_as_signed |= signed_bytes;

            let parsed = load_or_exit(&file, include_dirs, output, quiet);

            match idlc_codegen::generate(&RustGenerator, &parsed, &settings, &out) {
                Ok(files) => {
                    if !quiet {
                        match output {
                            OutputFormat::Json => {
                                let written: Vec<serde_json::Value> = files
                                    .iter()
                                    .map(|f| {
                                        serde_json::json!({
                                            "path": f.path.display().to_string(),
                                            "changed": f.changed,
                                        })
                                    })
                                    .collect();
                                let result = serde_json::json!({
                                    "out": out.display().to_string(),
                                    "files": written,
                                });
                                println!(
                                    "{}",
                                    serde_json::to_string_pretty(&result).unwrap_or_default()
                                );
                            }
                            OutputFormat::Text => {
                                for f in &files {
                                    let status = if f.changed { "wrote" } else { "unchanged" };
                                    println!("{} {}", status, f.path.display());
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    let msg = format!("code generation error: {}", e);
                    report_error(&msg, output, quiet);
                    process::exit(1);
                }
            }
        }
    }
}
