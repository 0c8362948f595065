//! Source provider abstraction for the include loader.
//!
//! The [`SourceProvider`] trait abstracts file I/O so documents can be loaded
//! from disk, from memory in tests, or from whatever an embedding tool
//! supplies.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// File access used by [`crate::load`].
pub trait SourceProvider {
    /// Read the source text for a given path.
    fn read_source(&self, path: &Path) -> Result<String, io::Error>;

    /// Resolve an `include` path as written against the including file's
    /// directory, falling back to any configured include directories.
    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, io::Error>;

    /// Canonicalize a path. Equal canonical paths are the same document.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error>;
}

fn not_found(include: &str, searched: &[PathBuf]) -> io::Error {
    let dirs: Vec<String> = searched.iter().map(|d| d.display().to_string()).collect();
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("'{}' not found (searched: {})", include, dirs.join(", ")),
    )
}

/// Filesystem-backed provider with an ordered list of extra include
/// directories (`-I`).
#[derive(Debug, Clone, Default)]
pub struct FileSystemProvider {
    include_dirs: Vec<PathBuf>,
}

impl FileSystemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_dirs(include_dirs: Vec<PathBuf>) -> Self {
        Self { include_dirs }
    }

    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }
}

impl SourceProvider for FileSystemProvider {
    fn read_source(&self, path: &Path) -> Result<String, io::Error> {
        std::fs::read_to_string(path)
    }

    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, io::Error> {
        let mut searched = Vec::with_capacity(self.include_dirs.len() + 1);
        for dir in std::iter::once(base).chain(self.include_dirs.iter().map(PathBuf::as_path)) {
            let candidate = dir.join(include);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(dir.to_owned());
        }
        Err(not_found(include, &searched))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error> {
        path.canonicalize()
    }
}

/// In-memory source provider for tests and embedding.
///
/// Maps paths to source text. Canonicalization normalizes the path without
/// touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    files: HashMap<PathBuf, String>,
    include_dirs: Vec<PathBuf>,
}

impl InMemoryProvider {
    pub fn new(files: HashMap<PathBuf, String>) -> Self {
        Self {
            files,
            include_dirs: Vec::new(),
        }
    }

    /// Build from `(path, source)` pairs.
    pub fn from_files<P, S>(files: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self::new(
            files
                .into_iter()
                .map(|(p, s)| (Self::normalize_path(&p.into()), s.into()))
                .collect(),
        )
    }

    pub fn with_include_dirs(mut self, include_dirs: Vec<PathBuf>) -> Self {
        self.include_dirs = include_dirs;
        self
    }

    /// Resolve `.` and `..` components lexically.
    fn normalize_path(path: &Path) -> PathBuf {
        let mut components = Vec::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    // never pop past the root
                    if matches!(components.last(), Some(Component::Normal(_))) {
                        components.pop();
                    }
                }
                other => components.push(other),
            }
        }
        components.iter().collect()
    }
}

impl SourceProvider for InMemoryProvider {
    fn read_source(&self, path: &Path) -> Result<String, io::Error> {
        let normalized = Self::normalize_path(path);
        self.files.get(&normalized).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found in memory: {}", normalized.display()),
            )
        })
    }

    fn resolve_include(&self, base: &Path, include: &str) -> Result<PathBuf, io::Error> {
        let mut searched = Vec::with_capacity(self.include_dirs.len() + 1);
        for dir in std::iter::once(base).chain(self.include_dirs.iter().map(PathBuf::as_path)) {
            let candidate = Self::normalize_path(&dir.join(include));
            if self.files.contains_key(&candidate) {
                return Ok(candidate);
            }
            searched.push(dir.to_owned());
        }
        Err(not_found(include, &searched))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, io::Error> {
        let normalized = Self::normalize_path(path);
        if self.files.contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "path not found in memory provider: {}",
                    normalized.display()
                ),
            ))
        }
    }
}
