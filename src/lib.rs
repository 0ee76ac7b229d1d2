//! # Introduction
//!
//! veldc is the compiler front end for the Veld programming language: it
//! turns raw source text into a validated AST, collecting lexical and parse
//! diagnostics along the way.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST (one Compound per unit)
//! ```
//!
//! 1. [`parser::lexer`] — tokenises the source; lexical errors are recorded
//!    in a [`diagnostics::DiagnosticSink`] and scanning resumes on the next
//!    line.
//! 2. [`parser`] — recursive-descent parser; the first parse error is fatal
//!    for the unit and is returned as a typed [`parser::ParseError`].
//! 3. [`diagnostics`] — accumulates warnings and errors and renders them
//!    with the offending source line and a caret marker.
//!
//! Name resolution, type checking, and code generation are later stages and
//! not part of this crate.

pub mod diagnostics;
pub mod parser;
