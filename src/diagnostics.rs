//! Diagnostic sink for lexer and parser messages
//!
//! Warnings and errors are accumulated in two ordered sequences and rendered
//! together: `<file>:<line>:<column>: <severity>: <message>` followed by the
//! offending source line and a caret under the stated column. The sink never
//! terminates the process; the driver inspects [`DiagnosticSink::has_errors`]
//! and decides the exit status.

use std::fmt;
use std::fmt::Write;

/// A 1-based line/column position in the source buffer.
///
/// Attached to every token and every AST node; never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single accumulated message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub location: Location,
}

/// Accumulates warnings and errors tied to source locations.
///
/// The sink owns the file name purely for rendering context; the source
/// buffer is handed to [`DiagnosticSink::render`] so that the lexer and
/// parser can keep borrowing it while diagnostics are collected.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    file_name: String,
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>, location: Location) {
        self.errors.push(Diagnostic {
            message: message.into(),
            location,
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>, location: Location) {
        self.warnings.push(Diagnostic {
            message: message.into(),
            location,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Render every warning, then every error, each with its source line and
    /// a caret marker under the offending column.
    pub fn render(&self, source: &str) -> String {
        let mut out = String::new();

        for warning in &self.warnings {
            self.render_one(&mut out, source, warning, "warning");
        }
        for error in &self.errors {
            self.render_one(&mut out, source, error, "error");
        }

        out
    }

    fn render_one(&self, out: &mut String, source: &str, diagnostic: &Diagnostic, severity: &str) {
        let location = diagnostic.location;
        let _ = writeln!(
            out,
            "{}:{}:{}: {}: {}",
            self.file_name, location.line, location.column, severity, diagnostic.message
        );

        let line_text = source
            .lines()
            .nth(location.line.saturating_sub(1) as usize)
            .unwrap_or("");
        let _ = writeln!(out, "{}", line_text);

        for _ in 0..location.column.saturating_sub(1) {
            out.push('-');
        }
        out.push('^');
        out.push('\n');
    }
}
