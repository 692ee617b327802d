//! Parsed Go source files.
//!
//! Only the preamble (package clause and import declarations) is parsed into
//! structure; the remainder of the file is validated lexically and for
//! balanced delimiters, then carried through untouched. Re-emitting a file
//! replaces the quoted path literal of each modified import and nothing else,
//! so comments and formatting survive exactly.

use super::error::{ParseError, ParseResult};
use super::lexer::{Lexer, Token, TokenKind};
use super::literal;
use std::ops::Range;

/// One import declaration (`import name "path"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local package name: an identifier, `.` or `_`.
    pub name: Option<String>,
    /// Unquoted import path.
    pub path: String,
    literal: Range<usize>,
    modified: bool,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    src: String,
    imports: Vec<ImportSpec>,
}

impl SourceFile {
    pub fn parse(src: impl Into<String>) -> ParseResult<Self> {
        let src = src.into();
        let tokens = Lexer::tokenize(&src)?;
        let imports = {
            let mut parser = Parser {
                src: &src,
                tokens: &tokens,
                pos: 0,
            };
            parser.package_clause()?;
            let imports = parser.import_decls()?;
            parser.check_body()?;
            imports
        };
        Ok(Self { src, imports })
    }

    pub fn imports(&self) -> &[ImportSpec] {
        &self.imports
    }

    /// Replace the path of the import at `index`.
    pub fn set_import_path(&mut self, index: usize, path: String) {
        let spec = &mut self.imports[index];
        spec.path = path;
        spec.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.imports.iter().any(|spec| spec.modified)
    }

    /// Render the file with every modified import path re-quoted in place.
    pub fn emit(&self) -> String {
        let mut out = String::with_capacity(self.src.len() + 64);
        let mut cursor = 0;
        for spec in self.imports.iter().filter(|spec| spec.modified) {
            out.push_str(&self.src[cursor..spec.literal.start]);
            out.push_str(&literal::quote(&spec.path));
            cursor = spec.literal.end;
        }
        out.push_str(&self.src[cursor..]);
        out
    }
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn package_clause(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some(tok) if tok.is_ident(self.src, "package") => self.pos += 1,
            other => return Err(self.unexpected(other, "expected 'package'")),
        }
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident => self.pos += 1,
            other => return Err(self.unexpected(other, "expected package name")),
        }
        self.end_statement(false)
    }

    fn import_decls(&mut self) -> ParseResult<Vec<ImportSpec>> {
        let mut imports = Vec::new();
        while let Some(tok) = self.peek() {
            if !tok.is_ident(self.src, "import") {
                break;
            }
            self.pos += 1;

            if self.peek().is_some_and(|t| t.kind == TokenKind::Punct('(')) {
                let open = self.tokens[self.pos];
                self.pos += 1;
                loop {
                    match self.peek() {
                        None => return Err(self.error(open.start, "import group not closed")),
                        Some(t) if t.kind == TokenKind::Punct(')') => {
                            self.pos += 1;
                            break;
                        }
                        Some(t) if t.kind == TokenKind::Punct(';') => self.pos += 1,
                        Some(_) => {
                            imports.push(self.import_spec()?);
                            self.end_statement(true)?;
                        }
                    }
                }
            } else {
                imports.push(self.import_spec()?);
            }
            self.end_statement(false)?;
        }
        Ok(imports)
    }

    fn import_spec(&mut self) -> ParseResult<ImportSpec> {
        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Punct('.') || t.kind == TokenKind::Ident => {
                self.pos += 1;
                Some(t.text(self.src).to_string())
            }
            _ => None,
        };

        let tok = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::String | TokenKind::RawString) => t,
            other => return Err(self.unexpected(other, "expected import path")),
        };
        self.pos += 1;

        let path = literal::unquote(tok.text(self.src))
            .map_err(|msg| self.error(tok.start, format!("invalid import path: {}", msg)))?;
        if path.is_empty() {
            return Err(self.error(tok.start, "invalid import path: empty"));
        }

        Ok(ImportSpec {
            name,
            path,
            literal: tok.start..tok.end,
            modified: false,
        })
    }

    /// A statement ends at `;`, a line break, end of input, or (inside an
    /// import group) the closing parenthesis.
    fn end_statement(&mut self, in_group: bool) -> ParseResult<()> {
        let prev_end = self.tokens[self.pos - 1].end;
        match self.peek() {
            None => Ok(()),
            Some(t) if t.kind == TokenKind::Punct(';') => {
                self.pos += 1;
                Ok(())
            }
            Some(t) if in_group && t.kind == TokenKind::Punct(')') => Ok(()),
            Some(t) if self.src[prev_end..t.start].contains('\n') => Ok(()),
            other => Err(self.unexpected(other, "expected ';' or newline")),
        }
    }

    /// Reject late imports and unbalanced delimiters in the rest of the file.
    fn check_body(&self) -> ParseResult<()> {
        let mut open: Vec<Token> = Vec::new();
        for tok in &self.tokens[self.pos..] {
            match tok.kind {
                TokenKind::Ident if tok.text(self.src) == "import" => {
                    return Err(self.error(
                        tok.start,
                        "imports must appear before other declarations",
                    ));
                }
                TokenKind::Punct('(' | '[' | '{') => open.push(*tok),
                TokenKind::Punct(c @ (')' | ']' | '}')) => {
                    let expected = open.pop().and_then(|o| closing(o.kind));
                    if expected != Some(c) {
                        return Err(self.error(tok.start, format!("unexpected '{}'", c)));
                    }
                }
                _ => {}
            }
        }
        match open.pop() {
            Some(tok) => Err(self.error(
                tok.start,
                format!("'{}' is never closed", tok.text(self.src)),
            )),
            None => Ok(()),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn unexpected(&self, found: Option<Token>, expected: &str) -> ParseError {
        match found {
            Some(tok) => self.error(
                tok.start,
                format!("{}, found '{}'", expected, tok.text(self.src)),
            ),
            None => self.error(self.src.len(), format!("{}, found EOF", expected)),
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::at(self.src, offset, message)
    }
}

fn closing(kind: TokenKind) -> Option<char> {
    match kind {
        TokenKind::Punct('(') => Some(')'),
        TokenKind::Punct('[') => Some(']'),
        TokenKind::Punct('{') => Some('}'),
        _ => None,
    }
}
