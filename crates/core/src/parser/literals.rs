use super::Parser;
use crate::ast::{Annotation, ConstValue};
use crate::error::ParseError;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// Consume one optional `,` or `;` item separator.
    pub(super) fn skip_separator(&mut self) -> bool {
        if matches!(self.peek(), Token::Comma | Token::Semi) {
            self.advance();
            true
        } else {
            false
        }
    }

    // -- Constant values ----------------------------------------

    pub(super) fn parse_const_value(&mut self) -> Result<ConstValue, ParseError> {
        let value = match self.peek() {
            Token::Int(n) => ConstValue::Int(*n),
            Token::Float(f) => ConstValue::Double(*f),
            Token::Str(s) => ConstValue::String(s.clone()),
            Token::Ident(w) => match w.as_str() {
                "true" => ConstValue::Bool(true),
                "false" => ConstValue::Bool(false),
                _ => ConstValue::Identifier(w.clone()),
            },
            Token::LBracket => return self.parse_const_list(),
            Token::LBrace => return self.parse_const_map(),
            _ => return Err(self.err_expected("constant value")),
        };
        self.advance();
        Ok(value)
    }

    fn parse_const_list(&mut self) -> Result<ConstValue, ParseError> {
        self.nest()?;
        self.expect(&Token::LBracket)?;
        let mut items = Vec::new();
        while !self.is(&Token::RBracket) {
            items.push(self.parse_const_value()?);
            self.skip_separator();
        }
        self.expect(&Token::RBracket)?;
        self.unnest();
        Ok(ConstValue::List(items))
    }

    fn parse_const_map(&mut self) -> Result<ConstValue, ParseError> {
        self.nest()?;
        self.expect(&Token::LBrace)?;
        let mut entries = Vec::new();
        while !self.is(&Token::RBrace) {
            let key = self.parse_const_value()?;
            self.expect(&Token::Colon)?;
            let value = self.parse_const_value()?;
            entries.push((key, value));
            self.skip_separator();
        }
        self.expect(&Token::RBrace)?;
        self.unnest();
        Ok(ConstValue::Map(entries))
    }

    // -- Annotations --------------------------------------------

    /// Parse `( key = value, ... )` if present; no list means no annotations.
    pub(super) fn parse_annotations(&mut self) -> Result<Vec<Annotation>, ParseError> {
        let mut annotations = Vec::new();
        if !self.is(&Token::LParen) {
            return Ok(annotations);
        }
        self.advance();
        while !self.is(&Token::RParen) {
            let key = self.take_ident("annotation key")?;
            let value = if self.is(&Token::Eq) {
                self.advance();
                self.annotation_value()?
            } else {
                String::new()
            };
            annotations.push(Annotation { key, value });
            self.skip_separator();
        }
        self.expect(&Token::RParen)?;
        Ok(annotations)
    }

    fn annotation_value(&mut self) -> Result<String, ParseError> {
        let value = match self.peek() {
            Token::Str(s) => s.clone(),
            Token::Int(_) | Token::Float(_) => self.cur().raw.clone(),
            Token::Ident(w) => w.clone(),
            _ => return Err(self.err_expected("annotation value")),
        };
        self.advance();
        Ok(value)
    }
}
