//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! the fatal [`ParseError`] type, the [`Ctx`] value threaded through the
//! recursive parse functions, cursor helpers, and the [`Parser::parse`] entry
//! point. The grammar itself lives in the `declarations`, `statements`, and
//! `expressions` modules as further `impl Parser` blocks.

use crate::diagnostics::{DiagnosticSink, Location};
use crate::parser::ast::Compound;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenKind};
use rustc_hash::FxHashMap;
use std::fmt;

/// A fatal parse error. The first one aborts the current compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse-position context, passed by value into the recursive parse
/// functions. Each caller copies and adjusts it for the subtree it parses,
/// so there is no save-and-restore bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct Ctx {
    /// `name:` parses as a label definition. Off inside call arguments,
    /// switch case expressions, and ternary branches, where a colon belongs
    /// to the surrounding construct.
    pub parses_goto_labels: bool,
    /// A `$(...)` clause at the start of a compound is only legal inside a
    /// function body.
    pub inside_function_body: bool,
    /// Variable declarations may omit the initializer (struct fields,
    /// catch bindings, range-for index bindings).
    pub allow_uninitialized: bool,
    /// Duplicate declaration names are collected per compound. Off inside
    /// for-loop init/increment clauses.
    pub check_duplicates: bool,
}

impl Default for Ctx {
    fn default() -> Self {
        Self {
            parses_goto_labels: true,
            inside_function_body: false,
            allow_uninitialized: false,
            check_duplicates: true,
        }
    }
}

/// Recursive-descent parser over the token stream of one translation unit.
pub struct Parser<'s, 'd> {
    pub(crate) source: &'s str,
    pub(crate) sink: &'d mut DiagnosticSink,
    tokens: Vec<Token>,
    index: usize,
}

impl<'s, 'd> Parser<'s, 'd> {
    /// Tokenize `source` and position the parser at the first token. Lexical
    /// errors land in `sink`; the parser still runs over what was recovered.
    pub fn new(source: &'s str, sink: &'d mut DiagnosticSink) -> Self {
        let tokens = Lexer::new(source).tokenize(sink);
        Self {
            source,
            sink,
            tokens,
            index: 0,
        }
    }

    /// Parse one translation unit. The first parse error is returned and the
    /// unit has no AST; duplicate-declaration diagnostics go into the sink
    /// without aborting.
    pub fn parse(&mut self) -> Result<Compound, ParseError> {
        let compound = self.compound(Ctx::default())?;

        if self.current().kind == TokenKind::RBrace {
            return Err(ParseError::new("unexpected '}'", self.current().location));
        }

        Ok(compound)
    }

    // Cursor helpers. Tokens are `Copy`; the stream always ends with EOF, so
    // `current` is total.

    pub(crate) fn current(&self) -> Token {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek(&self) -> Token {
        self.tokens[(self.index + 1).min(self.tokens.len() - 1)]
    }

    pub(crate) fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }

    /// Single-token pushback, used to disambiguate member access, initializer
    /// calls, and destructor declarations.
    pub(crate) fn step_back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub(crate) fn advance_if(&mut self, kind: TokenKind) -> bool {
        if self.current().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance_expect(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                format!("{}, found {}", message, self.current().kind),
                self.current().location,
            ))
        }
    }

    pub(crate) fn advance_newlines(&mut self) {
        while self.current().kind == TokenKind::Newline {
            self.advance();
        }
    }

    /// Consume the current token and return its value text.
    pub(crate) fn value_and_advance(&mut self) -> &'s str {
        let value = self.current().value(self.source);
        self.advance();
        value
    }

    /// Consume an expected token and return its value text.
    pub(crate) fn expect_value_and_advance(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<&'s str, ParseError> {
        let value = self.current().value(self.source);
        self.advance_expect(kind, message)?;
        Ok(value)
    }

    /// Consume the current token and return its kind.
    pub(crate) fn kind_and_advance(&mut self) -> TokenKind {
        let kind = self.current().kind;
        self.advance();
        kind
    }

    pub(crate) fn current_location(&self) -> Location {
        self.current().location
    }

    /// Parse a statement sequence up to `}` or EOF. Statements are separated
    /// by newlines or semicolons; declared names are collected and duplicates
    /// reported when the compound closes.
    pub(crate) fn compound(&mut self, ctx: Ctx) -> Result<Compound, ParseError> {
        let location = self.current_location();
        let mut statements = Vec::new();
        let mut declared: Vec<(String, Location)> = Vec::new();

        let first_class_function = if self.current().kind == TokenKind::Dollar {
            if !ctx.inside_function_body {
                return Err(ParseError::new(
                    "a first-class function parameter clause must be inside a function body",
                    self.current_location(),
                ));
            }
            Some(self.first_class_function(ctx)?)
        } else {
            None
        };

        self.advance_newlines();

        while self.current().kind != TokenKind::RBrace && self.current().kind != TokenKind::Eof {
            let statement = self.statement(ctx)?;

            if ctx.check_duplicates {
                if let Some(name) = statement.declared_name() {
                    declared.push((name.to_string(), statement.location()));
                }
            }
            statements.push(statement);

            if self.current().kind != TokenKind::Eof {
                match self.current().kind {
                    TokenKind::Newline | TokenKind::Semicolon => self.advance(),
                    _ => {
                        return Err(ParseError::new(
                            format!(
                                "expected a new line or a semicolon after statement, found {}",
                                self.current().kind
                            ),
                            self.current_location(),
                        ))
                    }
                }
                self.advance_newlines();
            }
        }

        self.report_duplicates(&declared);

        Ok(Compound {
            statements,
            first_class_function,
            location,
        })
    }

    /// One diagnostic per duplicated name, at its second occurrence.
    fn report_duplicates(&mut self, declared: &[(String, Location)]) {
        let mut counts: FxHashMap<&str, u32> = FxHashMap::default();
        for (name, location) in declared {
            let count = counts.entry(name.as_str()).or_insert(0);
            *count += 1;
            if *count == 2 {
                self.sink
                    .add_error(format!("duplicate declaration of '{}'", name), *location);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Result<Compound, ParseError>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new("test.veld");
        let result = Parser::new(source, &mut sink).parse();
        (result, sink)
    }

    #[test]
    fn test_empty_unit() {
        let (result, sink) = parse("\n\n");
        let compound = result.unwrap();
        assert!(compound.statements.is_empty());
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_statements_split_on_newlines_and_semicolons() {
        let (result, _) = parse("var a = 1; var b = 2\nvar c = 3");
        assert_eq!(result.unwrap().statements.len(), 3);
    }

    #[test]
    fn test_missing_separator_is_fatal() {
        let (result, _) = parse("var a = 1 var b = 2");
        let error = result.unwrap_err();
        assert!(error
            .message
            .starts_with("expected a new line or a semicolon"));
    }

    #[test]
    fn test_stray_closing_brace() {
        let (result, _) = parse("var a = 1\n}");
        assert_eq!(result.unwrap_err().message, "unexpected '}'");
    }

    #[test]
    fn test_duplicate_declarations_are_reported_not_fatal() {
        let (result, sink) = parse("var x = 1\nvar x = 2\nvar x = 3\nvar y = 4");
        assert!(result.is_ok());
        let errors = sink.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "duplicate declaration of 'x'");
        // reported at the second occurrence
        assert_eq!(errors[0].location.line, 2);
    }

    #[test]
    fn test_fatal_error_yields_no_ast() {
        let (result, _) = parse("func {");
        assert!(result.is_err());
    }
}
