//! Drive a back end over a parsed file and its includes.

use crate::{CodegenError, GenerateConfig, Generator, SourceUnit};
use idlc_core::ParsedFile;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One output file of a [`generate`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    /// False when the file already held exactly the rendered bytes and was
    /// left untouched.
    pub changed: bool,
}

/// Render every document in `parsed` (root first) into `out_dir`, one file
/// per source file, named after the source stem.
pub fn generate(
    generator: &dyn Generator,
    parsed: &ParsedFile,
    config: &GenerateConfig,
    out_dir: &Path,
) -> Result<Vec<GeneratedFile>, CodegenError> {
    std::fs::create_dir_all(out_dir).map_err(|source| CodegenError::Io {
        path: out_dir.to_owned(),
        source,
    })?;

    let mut claimed: BTreeMap<PathBuf, &Path> = BTreeMap::new();
    let mut files = Vec::new();
    for (path, document) in parsed.iter() {
        let unit = SourceUnit {
            path,
            document,
            parsed,
        };
        let module = unit.module_name();
        let file_name = format!(
            "{}.{}",
            module.trim_start_matches("r#"),
            generator.file_extension()
        );
        let target = out_dir.join(file_name);
        if let Some(first) = claimed.insert(target.clone(), path) {
            return Err(CodegenError::Emit(format!(
                "{} and {} would both be written to {}",
                first.display(),
                path.display(),
                target.display()
            )));
        }

        let rendered = generator.render(&unit, config)?;
        let changed = write_if_changed(&target, &rendered)?;
        debug!(
            generator = generator.name(),
            source = %path.display(),
            target = %target.display(),
            changed,
            "rendered"
        );
        files.push(GeneratedFile {
            path: target,
            changed,
        });
    }

    info!(
        generator = generator.name(),
        files = files.len(),
        changed = files.iter().filter(|f| f.changed).count(),
        "generation finished"
    );
    Ok(files)
}

/// Write `contents` unless the file already holds exactly those bytes.
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, contents: &str) -> Result<bool, CodegenError> {
    if let Ok(existing) = std::fs::read(path) {
        if existing == contents.as_bytes() {
            return Ok(false);
        }
    }
    std::fs::write(path, contents).map_err(|source| CodegenError::Io {
        path: path.to_owned(),
        source,
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_if_changed_skips_identical_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rs");
        assert!(write_if_changed(&path, "one").unwrap());
        assert!(!write_if_changed(&path, "one").unwrap());
        assert!(write_if_changed(&path, "two").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }
}
