//! Lexical scanner for Go source text.
//!
//! The scanner covers the whole Go lexical grammar closely enough to reject
//! malformed files (unterminated literals or comments, stray characters) while
//! keeping the byte span of every token, so callers can splice replacement
//! text into the original source without disturbing anything else.

use super::error::{ParseError, ParseResult};

const OPERATOR_CHARS: &str = "+-*/%&|^<>=!()[]{},;.:~";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Interpreted string literal (`"..."`).
    String,
    /// Raw string literal (`` `...` ``).
    RawString,
    Rune,
    Number,
    /// Operator or delimiter; multi-character operators appear as a run of
    /// single-character tokens.
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_ident(&self, src: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(src) == word
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Self { src, pos }
    }

    /// Scan the entire source. Comments and whitespace are dropped.
    pub fn tokenize(src: &'a str) -> ParseResult<Vec<Token>> {
        let mut lexer = Lexer::new(src);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    pub fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_trivia()?;

        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let kind = if c.is_alphabetic() || c == '_' {
            self.eat_while(|c| c.is_alphanumeric() || c == '_');
            TokenKind::Ident
        } else if c.is_ascii_digit() || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()))
        {
            self.scan_number();
            TokenKind::Number
        } else if c == '"' {
            self.scan_quoted('"', "string literal not terminated")?;
            TokenKind::String
        } else if c == '\'' {
            self.scan_quoted('\'', "rune literal not terminated")?;
            TokenKind::Rune
        } else if c == '`' {
            match self.src[start + 1..].find('`') {
                Some(i) => self.pos = start + 1 + i + 1,
                None => return Err(self.error(start, "raw string literal not terminated")),
            }
            TokenKind::RawString
        } else if OPERATOR_CHARS.contains(c) {
            self.bump();
            TokenKind::Punct(c)
        } else {
            return Err(self.error(
                start,
                format!("invalid character U+{:04X} {:?}", c as u32, c),
            ));
        };

        Ok(Some(Token {
            kind,
            start,
            end: self.pos,
        }))
    }

    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            self.eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(i) => self.pos += 2 + i + 2,
                    None => return Err(self.error(self.pos, "comment not terminated")),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn scan_number(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.bump();
                // Exponent sign: 1e+9, 0x1p-2
                if matches!(c, 'e' | 'E' | 'p' | 'P') && matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn scan_quoted(&mut self, quote: char, unterminated: &str) -> ParseResult<()> {
        let start = self.pos;
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error(start, unterminated)),
                Some('\\') => {
                    if matches!(self.bump(), None | Some('\n')) {
                        return Err(self.error(start, unterminated));
                    }
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.src, offset, message)
    }
}
