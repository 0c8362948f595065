//! Recursive-descent parser from a token stream to a [`Document`].
//!
//! One `Parser` value exists per parse call and owns all mutable state,
//! including the pending-comment buffer. The grammar is LL(1): every
//! decision looks at the next non-comment token only.
use crate::ast::Document;
use crate::error::ParseError;
use crate::lexer::{Spanned, Token};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

mod comments;
mod definitions;
mod literals;
mod services;
mod types;

/// Words that can never name a definition, field or method.
pub const KEYWORDS: &[&str] = &[
    "namespace",
    "include",
    "typedef",
    "enum",
    "struct",
    "union",
    "exception",
    "service",
    "const",
    "required",
    "optional",
    "oneway",
    "throws",
    "extends",
    "void",
];

/// Deepest container nesting accepted in type expressions and constant values.
pub const MAX_NESTING: usize = 64;

const DEFINITION_EXPECTED: &str =
    "'namespace', 'include', 'const', 'typedef', 'enum', 'struct', 'union', 'exception' or 'service'";

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    filename: String,
    /// Normalized comment fragments passed over since the last declaration.
    pending: Vec<String>,
    /// Top-level names seen so far, with the kind that claimed them.
    names: HashMap<String, &'static str>,
    /// Open containers in the type or value being parsed.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], filename: &str) -> Self {
        Parser {
            tokens,
            pos: 0,
            filename: filename.to_owned(),
            pending: Vec::new(),
            names: HashMap::new(),
            depth: 0,
        }
    }

    /// Index of the next non-comment token. The stream always ends in `Eof`.
    fn next_index(&self) -> usize {
        let mut i = self.pos;
        while i < self.tokens.len() - 1 && matches!(self.tokens[i].token, Token::Comment { .. }) {
            i += 1;
        }
        i
    }

    fn cur(&self) -> &'a Spanned {
        let tokens = self.tokens;
        &tokens[self.next_index()]
    }

    fn peek(&self) -> &'a Token {
        &self.cur().token
    }

    fn cur_line(&self) -> u32 {
        self.cur().line
    }

    /// Consume the next non-comment token. Comments passed over on the way
    /// are moved into the pending buffer.
    fn advance(&mut self) -> &'a Spanned {
        self.absorb_comments();
        let tokens = self.tokens;
        let t = &tokens[self.pos];
        trace!(line = t.line, column = t.column, token = ?t.token, "advance");
        if self.pos < tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn is(&self, token: &Token) -> bool {
        self.peek() == token
    }

    fn is_ident(&self, w: &str) -> bool {
        matches!(self.peek(), Token::Ident(x) if x == w)
    }

    fn expect(&mut self, token: &Token) -> Result<&'a Spanned, ParseError> {
        if self.is(token) {
            Ok(self.advance())
        } else {
            Err(self.err_expected(token.describe()))
        }
    }

    /// Enter one container level; fails past [`MAX_NESTING`].
    fn nest(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.err_expected(format!("at most {} levels of nesting", MAX_NESTING)));
        }
        self.depth += 1;
        Ok(())
    }

    fn unnest(&mut self) {
        self.depth -= 1;
    }

    fn err_expected(&self, expected: impl Into<String>) -> ParseError {
        let cur = self.cur();
        ParseError::syntax(
            &self.filename,
            cur.line,
            cur.column,
            expected,
            cur.token.describe(),
        )
    }

    /// Any identifier, keywords included (annotation keys, namespace scopes).
    fn take_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        if let Token::Ident(w) = self.peek() {
            self.advance();
            Ok(w.clone())
        } else {
            Err(self.err_expected(expected))
        }
    }

    /// An identifier that is not a reserved keyword.
    fn take_name(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.peek() {
            Token::Ident(w) if !KEYWORDS.contains(&w.as_str()) => {
                self.advance();
                Ok(w.clone())
            }
            _ => Err(self.err_expected(expected)),
        }
    }

    fn take_str(&mut self, expected: &str) -> Result<String, ParseError> {
        if let Token::Str(s) = self.peek() {
            self.advance();
            Ok(s.clone())
        } else {
            Err(self.err_expected(expected))
        }
    }

    fn take_int(&mut self, expected: &str) -> Result<i64, ParseError> {
        if let Token::Int(n) = self.peek() {
            self.advance();
            Ok(*n)
        } else {
            Err(self.err_expected(expected))
        }
    }

    // -- Top level ------------------------------------------------

    fn parse_document(&mut self) -> Result<Document, ParseError> {
        let mut doc = Document::default();
        let mut first = true;
        loop {
            let leading = self.leading_doc();
            if self.is(&Token::Eof) {
                break;
            }
            let line = self.cur_line();
            let keyword = match self.peek() {
                Token::Ident(w) => w.as_str(),
                _ => return Err(self.err_expected(DEFINITION_EXPECTED)),
            };
            match keyword {
                "namespace" | "include" => {
                    if keyword == "namespace" {
                        self.parse_namespace(&mut doc)?;
                    } else {
                        self.parse_include(&mut doc, line)?;
                    }
                    if first {
                        doc.doc = leading.join("\n");
                    }
                    self.finish_doc(Vec::new());
                }
                "const" => {
                    let c = self.parse_const(leading)?;
                    self.claim(&c.name, "const", line)?;
                    doc.constants.insert(c.name.clone(), c);
                }
                "typedef" => {
                    let t = self.parse_typedef(leading)?;
                    self.claim(&t.alias, "typedef", line)?;
                    doc.typedefs.insert(t.alias.clone(), t);
                }
                "enum" => {
                    let e = self.parse_enum(leading)?;
                    self.claim(&e.name, "enum", line)?;
                    doc.enums.insert(e.name.clone(), e);
                }
                "struct" | "union" | "exception" => {
                    let s = self.parse_struct_like(leading)?;
                    self.claim(&s.name, s.kind.keyword(), line)?;
                    let group = match keyword {
                        "struct" => &mut doc.structs,
                        "union" => &mut doc.unions,
                        _ => &mut doc.exceptions,
                    };
                    group.insert(s.name.clone(), s);
                }
                "service" => {
                    let s = self.parse_service(leading)?;
                    self.claim(&s.name, "service", line)?;
                    doc.services.insert(s.name.clone(), s);
                }
                _ => return Err(self.err_expected(DEFINITION_EXPECTED)),
            }
            first = false;
        }
        Ok(doc)
    }

    /// Register a top-level name; names are unique across all definition kinds.
    fn claim(&mut self, name: &str, kind: &'static str, line: u32) -> Result<(), ParseError> {
        if let Some(first) = self.names.get(name) {
            debug!(file = %self.filename, name, first = *first, "duplicate definition");
            return Err(ParseError::duplicate(&self.filename, line, kind, name));
        }
        debug!(file = %self.filename, kind, name, line, "parsed definition");
        self.names.insert(name.to_owned(), kind);
        Ok(())
    }

    fn parse_namespace(&mut self, doc: &mut Document) -> Result<(), ParseError> {
        self.advance();
        let scope = if self.is(&Token::Star) {
            self.advance();
            "*".to_owned()
        } else {
            self.take_ident("namespace scope")?
        };
        let value = match self.peek() {
            Token::Str(s) => {
                self.advance();
                s.clone()
            }
            _ => self.take_ident("namespace value")?,
        };
        if let Some(previous) = doc.namespaces.insert(scope.clone(), value) {
            debug!(file = %self.filename, scope, previous, "namespace overwritten");
        }
        Ok(())
    }

    fn parse_include(&mut self, doc: &mut Document, line: u32) -> Result<(), ParseError> {
        self.advance();
        let path = self.take_str("include path string")?;
        let alias = Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if alias.is_empty() {
            return Err(ParseError::syntax(
                &self.filename,
                line,
                1,
                "include path with a file name",
                format!("\"{}\"", path),
            ));
        }
        if doc.includes.contains_key(&alias) {
            return Err(ParseError::duplicate(
                &self.filename,
                line,
                "include alias",
                &alias,
            ));
        }
        doc.includes.insert(alias, path);
        Ok(())
    }
}

pub fn parse(tokens: &[Spanned], filename: &str) -> Result<Document, ParseError> {
    let mut p = Parser::new(tokens, filename);
    p.parse_document()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    pub(super) fn parse_src(src: &str) -> Result<Document, ParseError> {
        let tokens = lexer::lex(src, "test.thrift")?;
        parse(&tokens, "test.thrift")
    }

    #[test]
    fn empty_input_is_empty_document() {
        assert_eq!(parse_src("").unwrap(), Document::default());
        assert_eq!(parse_src("  // only a comment\n").unwrap(), Document::default());
    }

    #[test]
    fn namespaces_overwrite_by_scope() {
        let doc = parse_src(
            "namespace go somepkg\n\
             namespace python some.module123\n\
             namespace python.py-twisted another\n\
             namespace * fallback\n\
             namespace go otherpkg\n",
        )
        .unwrap();
        assert_eq!(doc.namespaces.len(), 4);
        assert_eq!(doc.namespaces["go"], "otherpkg");
        assert_eq!(doc.namespaces["python"], "some.module123");
        assert_eq!(doc.namespaces["python.py-twisted"], "another");
        assert_eq!(doc.namespaces["*"], "fallback");
    }

    #[test]
    fn include_alias_is_file_stem() {
        let doc = parse_src("include \"other.thrift\"\ninclude 'dir/shared.thrift';").unwrap();
        assert_eq!(doc.includes["other"], "other.thrift");
        assert_eq!(doc.includes["shared"], "dir/shared.thrift");
    }

    #[test]
    fn duplicate_include_alias_is_rejected() {
        let err = parse_src("include \"a/x.thrift\"\ninclude \"b/x.thrift\"").unwrap_err();
        assert!(matches!(
            err,
            ParseError::DuplicateDefinition { ref name, line: 2, .. } if name == "x"
        ));
    }

    #[test]
    fn header_comments_become_document_doc() {
        let doc = parse_src(
            "// IDL doc1\n/* IDL doc2 */\n\n/**\n* IDL doc3\n*/\ninclude \"other.thrift\"\n",
        )
        .unwrap();
        assert_eq!(doc.doc, "IDL doc1\nIDL doc2\nIDL doc3");
    }

    #[test]
    fn leading_comment_of_first_definition_is_not_document_doc() {
        let doc = parse_src("// the struct\nstruct A {}").unwrap();
        assert_eq!(doc.doc, "");
        assert_eq!(doc.structs["A"].doc, "the struct");
    }

    #[test]
    fn duplicate_top_level_names_are_rejected_across_kinds() {
        let err = parse_src("struct A {}\nenum A { X }").unwrap_err();
        match err {
            ParseError::DuplicateDefinition { what, name, line, .. } => {
                assert_eq!((what.as_str(), name.as_str(), line), ("enum", "A", 2));
            }
            other => panic!("expected DuplicateDefinition, got {:?}", other),
        }
        assert!(parse_src("struct A {}\nstruct A {}").is_err());
    }

    #[test]
    fn unknown_top_level_word_is_syntax_error() {
        let err = parse_src("struct A {}\nmessage B {}").unwrap_err();
        match err {
            ParseError::Syntax {
                line,
                column,
                found,
                ..
            } => {
                assert_eq!((line, column), (2, 1));
                assert_eq!(found, "identifier 'message'");
            }
            other => panic!("expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn keyword_cannot_name_a_definition() {
        let err = parse_src("struct service {}").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { column: 8, .. }));
    }

    #[test]
    fn reparsing_is_deterministic() {
        let src = "namespace go a\nconst i32 X = 1\nstruct S { 1: i32 a }\nenum E { A, B }";
        assert_eq!(parse_src(src).unwrap(), parse_src(src).unwrap());
    }
}
