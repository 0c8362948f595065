use super::{Parser, KEYWORDS};
use crate::ast::Type;
use crate::error::ParseError;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    // -- Type parsing -------------------------------------------

    /// A type expression followed by its own optional annotation list.
    pub(super) fn parse_type(&mut self) -> Result<Type, ParseError> {
        let name = match self.peek() {
            Token::Ident(w) if !KEYWORDS.contains(&w.as_str()) => w.clone(),
            _ => return Err(self.err_expected("type")),
        };
        self.advance();
        let t = match name.as_str() {
            "list" | "set" => {
                self.nest()?;
                self.expect(&Token::Lt)?;
                let value = self.parse_type()?;
                self.expect(&Token::Gt)?;
                self.unnest();
                if name == "list" {
                    Type::list(value)
                } else {
                    Type::set(value)
                }
            }
            "map" => {
                self.nest()?;
                self.expect(&Token::Lt)?;
                let key = self.parse_type()?;
                self.expect(&Token::Comma)?;
                let value = self.parse_type()?;
                self.expect(&Token::Gt)?;
                self.unnest();
                Type::map(key, value)
            }
            other => Type::named(other),
        };
        let annotations = self.parse_annotations()?;
        Ok(t.with_annotations(annotations))
    }
}
