//! Veld source code parser
//!
//! This module transforms Veld source text into an Abstract Syntax Tree:
//! - [`token`]: Token and token-kind definitions
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: The [`Parser`] coordinator, context, and error type
//! - [`declarations`] / [`statements`] / [`expressions`]: the grammar,
//!   as further `impl Parser` blocks
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary
//! operators and a single token of pushback for the ambiguous postfix forms.
//! Newlines are significant: statements end at a newline or a semicolon.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
pub mod token;

pub use ast::{Compound, Node};
pub use lexer::{LexError, Lexer};
pub use parse::{Ctx, ParseError, Parser};
pub use token::{Token, TokenKind};
