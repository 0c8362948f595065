//! idlc-codegen: render parsed IDL documents into target-language source.
//!
//! A back end implements [`Generator`] and renders one [`SourceUnit`] (one
//! parsed file) to text. [`generate()`] drives a back end over a
//! [`ParsedFile`] and everything it includes, writing one output file per
//! source file.

pub mod config;
pub mod error;
pub mod naming;
pub mod rust;
pub mod writer;

use idlc_core::{Document, ParsedFile};
use std::path::Path;

pub use config::GenerateConfig;
pub use error::CodegenError;
pub use rust::RustGenerator;
pub use writer::{generate, GeneratedFile};

/// A target-language back end.
pub trait Generator {
    /// Short name used on the command line and in logs.
    fn name(&self) -> &'static str;

    /// Extension of the files this back end writes, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Render one source file. Must be deterministic for a given unit and
    /// config.
    fn render(&self, unit: &SourceUnit<'_>, config: &GenerateConfig)
        -> Result<String, CodegenError>;
}

/// One parsed file handed to a back end.
#[derive(Debug, Clone, Copy)]
pub struct SourceUnit<'a> {
    /// Canonical path of the source file.
    pub path: &'a Path,
    pub document: &'a Document,
    /// The whole parse, for resolving include aliases.
    pub parsed: &'a ParsedFile,
}

impl<'a> SourceUnit<'a> {
    /// File stem of the source, e.g. `shared` for `idl/shared.thrift`.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Output module name: the stem as a Rust identifier.
    pub fn module_name(&self) -> String {
        naming::to_snake_case(&self.stem())
    }

    /// The document this unit refers to as `alias`.
    pub fn include(&self, alias: &str) -> Option<&'a Document> {
        self.parsed.resolve(self.path, alias)
    }
}
