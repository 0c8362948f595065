use super::Parser;
use crate::ast::{Constant, Enum, EnumValue, Field, Requiredness, Struct, StructKind, Typedef};
use crate::error::ParseError;
use crate::lexer::Token;
use std::collections::HashSet;

impl<'a> Parser<'a> {
    pub(super) fn parse_const(&mut self, leading: Vec<String>) -> Result<Constant, ParseError> {
        self.advance();
        let type_ = self.parse_type()?;
        let name = self.take_name("constant name")?;
        self.expect(&Token::Eq)?;
        let value = self.parse_const_value()?;
        Ok(Constant {
            name,
            type_,
            value,
            doc: self.finish_doc(leading),
        })
    }

    pub(super) fn parse_typedef(&mut self, leading: Vec<String>) -> Result<Typedef, ParseError> {
        self.advance();
        let type_ = self.parse_type()?;
        let alias = self.take_name("typedef name")?;
        let annotations = self.parse_annotations()?;
        Ok(Typedef {
            alias,
            type_,
            annotations,
            doc: self.finish_doc(leading),
        })
    }

    pub(super) fn parse_enum(&mut self, leading: Vec<String>) -> Result<Enum, ParseError> {
        self.advance();
        let mut e = Enum::new(self.take_name("enum name")?);
        self.expect(&Token::LBrace)?;
        let mut previous: Option<i64> = None;
        loop {
            let member_leading = self.leading_doc();
            if self.is(&Token::RBrace) {
                break;
            }
            let line = self.cur_line();
            let name = self.take_name("enum member name")?;
            let value = if self.is(&Token::Eq) {
                self.advance();
                self.take_int("integer enum value")?
            } else {
                match previous {
                    None => 1,
                    Some(p) => p.checked_add(1).ok_or_else(|| {
                        self.err_expected(format!("explicit value for '{}' (overflow)", name))
                    })?,
                }
            };
            let annotations = self.parse_annotations()?;
            let member = EnumValue {
                name,
                value,
                doc: self.finish_doc(member_leading),
                annotations,
            };
            if let Err(dup) = e.push(member) {
                return Err(ParseError::duplicate(
                    &self.filename,
                    line,
                    &format!("member of enum {}", e.name),
                    &dup.name,
                ));
            }
            previous = Some(value);
        }
        self.expect(&Token::RBrace)?;
        e.annotations = self.parse_annotations()?;
        e.doc = self.finish_doc(leading);
        Ok(e)
    }

    /// `struct`, `union` or `exception`; the keyword picks the kind.
    pub(super) fn parse_struct_like(&mut self, leading: Vec<String>) -> Result<Struct, ParseError> {
        let kind = match self.peek() {
            Token::Ident(w) if w == "struct" => StructKind::Struct,
            Token::Ident(w) if w == "union" => StructKind::Union,
            Token::Ident(w) if w == "exception" => StructKind::Exception,
            _ => return Err(self.err_expected("'struct', 'union' or 'exception'")),
        };
        self.advance();
        let name = self.take_name(&format!("{} name", kind.keyword()))?;
        self.expect(&Token::LBrace)?;
        let mut fields = self.parse_fields(&Token::RBrace, &format!("{} {}", kind.keyword(), name))?;
        if kind == StructKind::Union {
            for f in &mut fields {
                f.requiredness = Requiredness::Optional;
            }
        }
        let annotations = self.parse_annotations()?;
        Ok(Struct {
            name,
            kind,
            doc: self.finish_doc(leading),
            fields,
            annotations,
        })
    }

    /// Fields up to and including `close`. Ids must be unique within the
    /// list; fields written without an id count down from -1.
    pub(super) fn parse_fields(
        &mut self,
        close: &Token,
        owner: &str,
    ) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();
        let mut ids = HashSet::new();
        let mut implicit_id: i16 = -1;
        loop {
            let leading = self.leading_doc();
            if self.is(close) {
                break;
            }
            let line = self.cur_line();
            let field = self.parse_field(leading, &mut implicit_id)?;
            if !ids.insert(field.id) {
                return Err(ParseError::DuplicateFieldId {
                    file: self.filename.clone(),
                    line,
                    owner: owner.to_owned(),
                    id: field.id,
                });
            }
            fields.push(field);
        }
        self.expect(close)?;
        Ok(fields)
    }

    fn parse_field(
        &mut self,
        leading: Vec<String>,
        implicit_id: &mut i16,
    ) -> Result<Field, ParseError> {
        let id = if let Token::Int(n) = self.peek() {
            let id = i16::try_from(*n)
                .map_err(|_| self.err_expected("field id between -32768 and 32767"))?;
            self.advance();
            self.expect(&Token::Colon)?;
            id
        } else {
            let id = *implicit_id;
            *implicit_id = implicit_id.saturating_sub(1);
            id
        };

        let requiredness = if self.is_ident("required") {
            self.advance();
            Requiredness::Required
        } else if self.is_ident("optional") {
            self.advance();
            Requiredness::Optional
        } else {
            Requiredness::Unset
        };

        let type_ = self.parse_type()?;
        let name = self.take_name("field name")?;
        let default = if self.is(&Token::Eq) {
            self.advance();
            Some(self.parse_const_value()?)
        } else {
            None
        };
        let annotations = self.parse_annotations()?;
        Ok(Field {
            id,
            name,
            type_,
            requiredness,
            default,
            doc: self.finish_doc(leading),
            annotations,
        })
    }
}
