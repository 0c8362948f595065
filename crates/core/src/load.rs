//! Entry points: parse text, a reader, or a file together with everything it
//! includes.

use crate::ast::Document;
use crate::error::ParseError;
use crate::lexer;
use crate::parser;
use crate::source::{FileSystemProvider, SourceProvider};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name reported in errors for input that has no file.
pub const STDIN_NAME: &str = "<input>";

/// Parse in-memory source text. `include` directives are recorded but not
/// followed.
pub fn parse_str(src: &str) -> Result<Document, ParseError> {
    parse_named(src, STDIN_NAME)
}

/// Like [`parse_str`], reporting errors against `filename`.
pub fn parse_named(src: &str, filename: &str) -> Result<Document, ParseError> {
    let tokens = lexer::lex(src, filename)?;
    parser::parse(&tokens, filename)
}

/// Read a whole stream and parse it.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document, ParseError> {
    let mut src = String::new();
    reader
        .read_to_string(&mut src)
        .map_err(|e| ParseError::Io {
            file: STDIN_NAME.to_owned(),
            message: format!("cannot read input: {}", e),
        })?;
    parse_str(&src)
}

// ──────────────────────────────────────────────
// File loading
// ──────────────────────────────────────────────

/// A root document plus every document it transitively includes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    /// Canonical path of the root file.
    pub path: PathBuf,
    pub document: Document,
    /// Canonical path -> document, for every included file.
    pub documents: BTreeMap<PathBuf, Document>,
    /// Canonical path -> (include alias -> canonical path).
    links: BTreeMap<PathBuf, BTreeMap<String, PathBuf>>,
}

impl ParsedFile {
    /// The documents the root includes, keyed by alias.
    pub fn includes(&self) -> BTreeMap<&str, &Document> {
        self.links
            .get(&self.path)
            .into_iter()
            .flatten()
            .filter_map(|(alias, path)| self.get(path).map(|d| (alias.as_str(), d)))
            .collect()
    }

    /// The document that `from` refers to as `alias`.
    pub fn resolve(&self, from: &Path, alias: &str) -> Option<&Document> {
        let target = self.links.get(from)?.get(alias)?;
        self.get(target)
    }

    /// Look up any loaded document, root included, by canonical path.
    pub fn get(&self, path: &Path) -> Option<&Document> {
        if path == self.path {
            Some(&self.document)
        } else {
            self.documents.get(path)
        }
    }

    /// Root first, then included documents in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Document)> {
        std::iter::once((self.path.as_path(), &self.document))
            .chain(self.documents.iter().map(|(p, d)| (p.as_path(), d)))
    }
}

/// Parse the root file and all transitive includes from disk.
pub fn parse_file(root: &Path) -> Result<ParsedFile, ParseError> {
    parse_file_with_provider(root, &FileSystemProvider::new())
}

/// Parse the root file and all transitive includes through `provider`.
pub fn parse_file_with_provider(
    root: &Path,
    provider: &dyn SourceProvider,
) -> Result<ParsedFile, ParseError> {
    let canon = provider.canonicalize(root).map_err(|e| ParseError::Io {
        file: root.display().to_string(),
        message: format!("cannot open file: {}", e),
    })?;

    let mut loader = Loader {
        provider,
        visited: HashSet::new(),
        stack: Vec::new(),
        stack_set: HashSet::new(),
        documents: BTreeMap::new(),
        links: BTreeMap::new(),
    };
    loader.load_file(&canon)?;

    let Loader {
        mut documents,
        links,
        ..
    } = loader;
    let document = documents.remove(&canon).unwrap_or_default();
    debug!(root = %canon.display(), included = documents.len(), "loaded");
    Ok(ParsedFile {
        path: canon,
        document,
        documents,
        links,
    })
}

struct Loader<'p> {
    provider: &'p dyn SourceProvider,
    visited: HashSet<PathBuf>,
    /// Files currently being loaded, outermost first. Kept in order for the
    /// cycle message; `stack_set` answers membership.
    stack: Vec<PathBuf>,
    stack_set: HashSet<PathBuf>,
    documents: BTreeMap<PathBuf, Document>,
    links: BTreeMap<PathBuf, BTreeMap<String, PathBuf>>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

impl Loader<'_> {
    fn chain(&self) -> Vec<String> {
        self.stack.iter().map(|p| file_name(p)).collect()
    }

    /// `canon` must already be canonical.
    fn load_file(&mut self, canon: &Path) -> Result<(), ParseError> {
        if self.visited.contains(canon) {
            return Ok(());
        }

        let file = canon.display().to_string();
        let src = self.provider.read_source(canon).map_err(|e| {
            if self.stack.is_empty() {
                ParseError::Io {
                    file: file.clone(),
                    message: format!("cannot read file: {}", e),
                }
            } else {
                ParseError::include(&file, self.chain(), format!("cannot read file: {}", e))
            }
        })?;
        debug!(file = %file, "loading");
        let doc = parse_named(&src, &file)?;

        self.stack_set.insert(canon.to_owned());
        self.stack.push(canon.to_owned());

        let base_dir = canon.parent().unwrap_or(Path::new(".")).to_owned();
        let mut aliases = BTreeMap::new();
        for (alias, include) in &doc.includes {
            let resolved = self
                .provider
                .resolve_include(&base_dir, include)
                .and_then(|p| self.provider.canonicalize(&p))
                .map_err(|e| {
                    ParseError::include(
                        &file,
                        self.chain(),
                        format!("cannot resolve include '{}': {}", include, e),
                    )
                })?;

            if self.stack_set.contains(&resolved) {
                let mut chain = self.chain();
                chain.push(file_name(&resolved));
                return Err(ParseError::include(
                    &file,
                    self.chain(),
                    format!("include cycle detected: {}", chain.join(" \u{2192} ")),
                ));
            }

            self.load_file(&resolved)?;
            aliases.insert(alias.clone(), resolved);
        }

        self.stack.pop();
        self.stack_set.remove(canon);
        self.visited.insert(canon.to_owned());
        self.links.insert(canon.to_owned(), aliases);
        self.documents.insert(canon.to_owned(), doc);
        Ok(())
    }
}
