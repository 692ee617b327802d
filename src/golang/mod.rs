//! Go source handling.
//!
//! - [`Lexer`] - token scanner with byte spans
//! - [`SourceFile`] - package clause and import declarations of one file,
//!   re-emitted with edited import paths
//! - [`literal`] - string literal quoting

mod error;
mod lexer;
pub mod literal;
mod source;

pub use error::{ParseError, ParseResult};
pub use lexer::{Lexer, Token, TokenKind};
pub use source::{ImportSpec, SourceFile};
