use crate::error::ParseError;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `// ...`
    Slash,
    /// `# ...`
    Hash,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and keywords; distinguished in the parser
    Ident(String),
    /// Quoted string literal (content without quotes, escapes resolved)
    Str(String),
    Int(i64),
    Float(f64),
    /// Comment body with the delimiters removed
    Comment { style: CommentStyle, text: String },
    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Lt,
    Gt,
    Comma,
    Semi,
    Colon,
    Eq,
    Star,
    // End of input
    Eof,
}

impl Token {
    /// Human-readable rendering for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(w) => format!("identifier '{}'", w),
            Token::Str(s) => format!("string \"{}\"", s),
            Token::Int(n) => format!("integer {}", n),
            Token::Float(f) => format!("number {}", f),
            Token::Comment { .. } => "comment".to_owned(),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::LBracket => "'['".to_owned(),
            Token::RBracket => "']'".to_owned(),
            Token::LParen => "'('".to_owned(),
            Token::RParen => "')'".to_owned(),
            Token::Lt => "'<'".to_owned(),
            Token::Gt => "'>'".to_owned(),
            Token::Comma => "','".to_owned(),
            Token::Semi => "';'".to_owned(),
            Token::Colon => "':'".to_owned(),
            Token::Eq => "'='".to_owned(),
            Token::Star => "'*'".to_owned(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
    /// The token starts on the line where the previous token ended.
    pub same_line: bool,
    /// Source text of the token, exactly as written.
    pub raw: String,
}

pub fn lex(src: &str, filename: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut scanner = Scanner {
        chars: src.chars().collect(),
        pos: 0,
        line: 1,
        column: 1,
        prev_end_line: 0,
        filename,
        tokens: Vec::new(),
    };
    scanner.run()?;
    debug!(file = filename, tokens = scanner.tokens.len(), "lexed");
    Ok(scanner.tokens)
}

struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    /// Line on which the last emitted token ended; 0 before the first token.
    prev_end_line: u32,
    filename: &'a str,
    tokens: Vec<Spanned>,
}

impl<'a> Scanner<'a> {
    fn at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, token: Token, start: usize, line: u32, column: u32) {
        self.tokens.push(Spanned {
            token,
            line,
            column,
            same_line: self.prev_end_line == line,
            raw: self.chars[start..self.pos].iter().collect(),
        });
        self.prev_end_line = self.line;
    }

    fn err(&self, line: u32, column: u32, message: impl Into<String>) -> ParseError {
        ParseError::lex(self.filename, line, column, message)
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.at(0) {
            let (start, line, column) = (self.pos, self.line, self.column);

            if c.is_whitespace() {
                self.bump();
                continue;
            }

            // Line comments
            if (c == '/' && self.at(1) == Some('/')) || c == '#' {
                let style = if c == '#' {
                    self.bump();
                    CommentStyle::Hash
                } else {
                    self.bump();
                    self.bump();
                    CommentStyle::Slash
                };
                let mut text = String::new();
                while let Some(ch) = self.at(0) {
                    if ch == '\n' {
                        break;
                    }
                    text.push(ch);
                    self.bump();
                }
                self.push(Token::Comment { style, text }, start, line, column);
                continue;
            }

            // Block comment; `/**` opens a doc comment unless it is the empty `/**/`
            if c == '/' && self.at(1) == Some('*') {
                self.bump();
                self.bump();
                let style = if self.at(0) == Some('*') && self.at(1) != Some('/') {
                    self.bump();
                    CommentStyle::Doc
                } else {
                    CommentStyle::Block
                };
                let mut text = String::new();
                loop {
                    match self.at(0) {
                        None => return Err(self.err(line, column, "unterminated block comment")),
                        Some('*') if self.at(1) == Some('/') => {
                            self.bump();
                            self.bump();
                            break;
                        }
                        Some(ch) => {
                            text.push(ch);
                            self.bump();
                        }
                    }
                }
                self.push(Token::Comment { style, text }, start, line, column);
                continue;
            }

            if c == '"' || c == '\'' {
                let s = self.scan_string(c, line, column)?;
                self.push(Token::Str(s), start, line, column);
                continue;
            }

            if c.is_ascii_digit()
                || ((c == '-' || c == '+') && self.at(1).is_some_and(|d| d.is_ascii_digit()))
            {
                let token = self.scan_number(line, column)?;
                self.push(token, start, line, column);
                continue;
            }

            if c.is_alphabetic() || c == '_' {
                let mut word = String::new();
                while let Some(ch) = self.at(0) {
                    let joins = (ch == '.' || ch == '-')
                        && self.at(1).is_some_and(|n| n.is_alphanumeric() || n == '_');
                    if ch.is_alphanumeric() || ch == '_' || joins {
                        word.push(ch);
                        self.bump();
                    } else {
                        break;
                    }
                }
                self.push(Token::Ident(word), start, line, column);
                continue;
            }

            let token = match c {
                '{' => Token::LBrace,
                '}' => Token::RBrace,
                '[' => Token::LBracket,
                ']' => Token::RBracket,
                '(' => Token::LParen,
                ')' => Token::RParen,
                '<' => Token::Lt,
                '>' => Token::Gt,
                ',' => Token::Comma,
                ';' => Token::Semi,
                ':' => Token::Colon,
                '=' => Token::Eq,
                '*' => Token::Star,
                other => {
                    return Err(self.err(line, column, format!("unexpected character '{}'", other)))
                }
            };
            self.bump();
            self.push(token, start, line, column);
        }

        let (start, line, column) = (self.pos, self.line, self.column);
        self.push(Token::Eof, start, line, column);
        Ok(())
    }

    fn scan_string(&mut self, quote: char, line: u32, column: u32) -> Result<String, ParseError> {
        self.bump();
        let mut s = String::new();
        loop {
            let Some(sc) = self.at(0) else {
                return Err(self.err(line, column, "unterminated string literal"));
            };
            if sc == '\n' {
                return Err(self.err(line, column, "unterminated string literal"));
            }
            self.bump();
            if sc == quote {
                return Ok(s);
            }
            if sc == '\\' {
                let Some(esc) = self.bump() else {
                    return Err(self.err(line, column, "unterminated escape in string"));
                };
                match esc {
                    q if q == quote => s.push(q),
                    '\\' => s.push('\\'),
                    't' => s.push('\t'),
                    'n' => s.push('\n'),
                    'r' => s.push('\r'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
                continue;
            }
            s.push(sc);
        }
    }

    fn scan_number(&mut self, line: u32, column: u32) -> Result<Token, ParseError> {
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.at(0) {
            text.push(sign);
            self.bump();
        }

        if self.at(0) == Some('0') && matches!(self.at(1), Some('x' | 'X')) {
            self.bump();
            self.bump();
            let mut digits = String::new();
            while let Some(ch) = self.at(0).filter(|ch| ch.is_ascii_hexdigit()) {
                digits.push(ch);
                self.bump();
            }
            self.reject_suffix(&text, line, column)?;
            if digits.is_empty() {
                return Err(self.err(line, column, "invalid hex literal: no digits after '0x'"));
            }
            let out_of_range =
                || self.err(line, column, format!("hex literal {}0x{} out of range", text, digits));
            let magnitude = u64::from_str_radix(&digits, 16).map_err(|_| out_of_range())?;
            let value = if text == "-" {
                0i64.checked_sub_unsigned(magnitude)
            } else {
                i64::try_from(magnitude).ok()
            };
            return value.map(Token::Int).ok_or_else(out_of_range);
        }

        let mut is_float = false;
        self.take_digits(&mut text);
        if self.at(0) == Some('.') && self.at(1).is_some_and(|d| d.is_ascii_digit()) {
            is_float = true;
            text.push('.');
            self.bump();
            self.take_digits(&mut text);
        }
        if matches!(self.at(0), Some('e' | 'E')) {
            is_float = true;
            text.push('e');
            self.bump();
            if let Some(sign @ ('-' | '+')) = self.at(0) {
                text.push(sign);
                self.bump();
            }
            if !self.at(0).is_some_and(|d| d.is_ascii_digit()) {
                return Err(self.err(
                    line,
                    column,
                    format!("invalid numeric literal '{}': missing exponent digits", text),
                ));
            }
            self.take_digits(&mut text);
        }
        self.reject_suffix(&text, line, column)?;

        if is_float {
            let f: f64 = text.parse().map_err(|_| {
                self.err(line, column, format!("invalid numeric literal '{}'", text))
            })?;
            Ok(Token::Float(f))
        } else {
            let n: i64 = text.parse().map_err(|_| {
                self.err(line, column, format!("integer literal '{}' out of range", text))
            })?;
            Ok(Token::Int(n))
        }
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.at(0).filter(|ch| ch.is_ascii_digit()) {
            text.push(ch);
            self.bump();
        }
    }

    /// Digits running straight into letters (`12ab`) are one malformed literal.
    fn reject_suffix(&self, text: &str, line: u32, column: u32) -> Result<(), ParseError> {
        match self.at(0) {
            Some(ch) if ch.is_alphanumeric() || ch == '_' => Err(self.err(
                line,
                column,
                format!("invalid numeric literal '{}{}'", text, ch),
            )),
            _ => Ok(()),
        }
    }
}
