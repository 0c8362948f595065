#![allow(clippy::result_large_err)]
//! idlc-core: front end for Thrift-style interface definition files.
//!
//! Source text goes through the lexer and a recursive-descent parser into an
//! immutable [`Document`]. File-based parses also follow `include`
//! directives through a [`SourceProvider`] and return a [`ParsedFile`]
//! holding every document reached.
//!
//! # Public API
//!
//! - [`parse_str()`], [`parse_reader()`] -- parse in-memory input
//! - [`parse_file()`], [`parse_file_with_provider()`] -- parse a file and its
//!   includes
//! - [`ParseError`] -- the single error type; every error is fatal
//! - Document model: [`Document`], [`Struct`], [`Field`], [`Type`],
//!   [`ConstValue`], [`Enum`], [`Service`], [`Method`]

pub mod ast;
pub mod error;
pub mod lexer;
pub mod load;
pub mod parser;
pub mod source;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{
    Annotation, ConstValue, Constant, Document, Enum, EnumValue, Field, Method, Requiredness,
    Service, Struct, StructKind, Type, Typedef,
};
pub use error::ParseError;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use load::{parse_file, parse_file_with_provider, parse_reader, parse_str, ParsedFile};
