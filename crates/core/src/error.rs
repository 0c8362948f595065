use serde::Serialize;

/// A parse error. Every variant is fatal: the parse call that produced it
/// returns no document.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// Malformed token: unterminated string or comment, bad numeric literal,
    /// or a character the grammar does not use.
    #[error("{file}:{line}:{column}: {message}")]
    Lex {
        file: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// The token stream does not match the production being parsed.
    #[error("{file}:{line}:{column}: expected {expected}, found {found}")]
    Syntax {
        file: String,
        line: u32,
        column: u32,
        expected: String,
        found: String,
    },

    /// A name defined twice in the same scope.
    #[error("{file}:{line}: duplicate {what} '{name}'")]
    DuplicateDefinition {
        file: String,
        line: u32,
        what: String,
        name: String,
    },

    /// Two fields of one list share a numeric id.
    #[error("{file}:{line}: duplicate field id {id} in {owner}")]
    DuplicateFieldId {
        file: String,
        line: u32,
        owner: String,
        id: i16,
    },

    /// An included file is missing or unreadable, or the include graph has a
    /// cycle. `chain` lists the files on the include stack, outermost first.
    #[error("{file}: {message}")]
    Include {
        file: String,
        chain: Vec<String>,
        message: String,
    },

    /// The root input could not be read.
    #[error("{file}: {message}")]
    Io { file: String, message: String },
}

impl ParseError {
    pub fn lex(file: &str, line: u32, column: u32, message: impl Into<String>) -> Self {
        ParseError::Lex {
            file: file.to_owned(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn syntax(
        file: &str,
        line: u32,
        column: u32,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ParseError::Syntax {
            file: file.to_owned(),
            line,
            column,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn duplicate(file: &str, line: u32, what: &str, name: &str) -> Self {
        ParseError::DuplicateDefinition {
            file: file.to_owned(),
            line,
            what: what.to_owned(),
            name: name.to_owned(),
        }
    }

    pub fn include(file: &str, chain: Vec<String>, message: impl Into<String>) -> Self {
        ParseError::Include {
            file: file.to_owned(),
            chain,
            message: message.into(),
        }
    }

    /// The file the error was reported against.
    pub fn file(&self) -> &str {
        match self {
            ParseError::Lex { file, .. }
            | ParseError::Syntax { file, .. }
            | ParseError::DuplicateDefinition { file, .. }
            | ParseError::DuplicateFieldId { file, .. }
            | ParseError::Include { file, .. }
            | ParseError::Io { file, .. } => file,
        }
    }

    /// Serialize to a JSON object for machine-readable CLI output.
    /// The rendered message is included next to the structured fields.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "display".to_owned(),
                serde_json::Value::String(self.to_string()),
            );
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_names_position_and_production() {
        let e = ParseError::syntax("a.thrift", 3, 7, "field name", "'}'");
        assert_eq!(e.to_string(), "a.thrift:3:7: expected field name, found '}'");
    }

    #[test]
    fn json_value_carries_kind_and_display() {
        let e = ParseError::duplicate("a.thrift", 9, "struct", "Foo");
        let v = e.to_json_value();
        assert_eq!(v["kind"], "duplicate_definition");
        assert_eq!(v["name"], "Foo");
        assert_eq!(v["line"], 9);
        assert_eq!(v["display"], "a.thrift:9: duplicate struct 'Foo'");
    }

    #[test]
    fn include_error_keeps_chain() {
        let e = ParseError::include(
            "b.thrift",
            vec!["a.thrift".into(), "b.thrift".into()],
            "include cycle detected: a.thrift \u{2192} b.thrift \u{2192} a.thrift",
        );
        assert_eq!(e.file(), "b.thrift");
        match e {
            ParseError::Include { chain, .. } => assert_eq!(chain.len(), 2),
            other => panic!("expected Include, got {:?}", other),
        }
    }
}
