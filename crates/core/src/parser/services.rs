use super::Parser;
use crate::ast::{Method, Requiredness, Service, Type};
use crate::error::ParseError;
use crate::lexer::Token;
use std::collections::BTreeMap;
use tracing::trace;

impl<'a> Parser<'a> {
    pub(super) fn parse_service(&mut self, leading: Vec<String>) -> Result<Service, ParseError> {
        self.advance();
        let name = self.take_name("service name")?;
        let extends = if self.is_ident("extends") {
            self.advance();
            Some(Type::named(self.take_name("base service name")?))
        } else {
            None
        };
        self.expect(&Token::LBrace)?;

        let mut methods = BTreeMap::new();
        loop {
            let method_leading = self.leading_doc();
            if self.is(&Token::RBrace) {
                break;
            }
            let line = self.cur_line();
            let method = self.parse_method(method_leading)?;
            if methods.contains_key(&method.name) {
                return Err(ParseError::duplicate(
                    &self.filename,
                    line,
                    &format!("method of service {}", name),
                    &method.name,
                ));
            }
            trace!(service = %name, method = %method.name, "parsed method");
            methods.insert(method.name.clone(), method);
        }
        self.expect(&Token::RBrace)?;

        let annotations = self.parse_annotations()?;
        Ok(Service {
            name,
            extends,
            doc: self.finish_doc(leading),
            methods,
            annotations,
        })
    }

    fn parse_method(&mut self, leading: Vec<String>) -> Result<Method, ParseError> {
        let oneway = if self.is_ident("oneway") {
            self.advance();
            true
        } else {
            false
        };
        let return_type = if self.is_ident("void") {
            self.advance();
            None
        } else {
            match self.peek() {
                Token::Ident(_) => Some(self.parse_type()?),
                _ => return Err(self.err_expected("return type or 'void'")),
            }
        };
        let name = self.take_name("method name")?;

        self.expect(&Token::LParen)?;
        let arguments = self.parse_fields(&Token::RParen, &format!("arguments of {}", name))?;

        let exceptions = if self.is_ident("throws") {
            self.advance();
            self.expect(&Token::LParen)?;
            let mut thrown =
                self.parse_fields(&Token::RParen, &format!("exceptions of {}", name))?;
            for f in &mut thrown {
                f.requiredness = Requiredness::Optional;
            }
            thrown
        } else {
            Vec::new()
        };

        let annotations = self.parse_annotations()?;
        Ok(Method {
            name,
            return_type,
            oneway,
            arguments,
            exceptions,
            doc: self.finish_doc(leading),
            annotations,
        })
    }
}
