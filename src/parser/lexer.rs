//! Pull-based tokenizer for Veld source text
//!
//! [`Lexer::next_token`] is infallible at the API level: lexical errors are
//! recorded in the [`DiagnosticSink`], the cursor skips to the next newline,
//! and scanning resumes there. Newlines are significant and produce their own
//! tokens; the stream always ends with a single EOF token.

use crate::diagnostics::{DiagnosticSink, Location};
use crate::parser::token::{Token, TokenKind};
use std::fmt;

/// A recoverable lexical error: message plus the location it was detected at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub location: Location,
}

impl LexError {
    fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

impl std::error::Error for LexError {}

/// Tokenizer over a borrowed source buffer.
pub struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the next token. Lexical errors go into `sink` and the lexer
    /// resynchronizes at the next newline, so this never fails.
    pub fn next_token(&mut self, sink: &mut DiagnosticSink) -> Token {
        loop {
            self.skip_insignificant(sink);
            match self.scan() {
                Ok(token) => return token,
                Err(error) => {
                    sink.add_error(error.message, error.location);
                    self.skip_to_line_end();
                }
            }
        }
    }

    /// Drive [`Lexer::next_token`] to EOF. The EOF token is included.
    pub fn tokenize(&mut self, sink: &mut DiagnosticSink) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(sink);
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
        // Columns count characters, not bytes. A UTF-8 continuation byte
        // stays on the column of the character it belongs to.
        if !matches!(self.peek(), Some(byte) if byte & 0xC0 == 0x80) {
            self.column += 1;
        }
    }

    fn advance_line(&mut self) {
        self.pos += 1;
        self.line += 1;
        self.column = 1;
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }

    /// Skip spaces, tabs, carriage returns, and comments. Newlines stay: they
    /// are significant tokens.
    fn skip_insignificant(&mut self, sink: &mut DiagnosticSink) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') => self.advance(),
                Some(b'/') if self.peek_at(1) == Some(b'/') => self.skip_to_line_end(),
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    if let Err(error) = self.skip_block_comment() {
                        sink.add_error(error.message, error.location);
                    }
                }
                _ => return,
            }
        }
    }

    /// Consume up to, but not including, the next newline.
    fn skip_to_line_end(&mut self) {
        while let Some(byte) = self.peek() {
            if byte == b'\n' {
                return;
            }
            self.advance();
        }
    }

    /// Block comments nest; the depth counter is explicit rather than
    /// recursive. An unterminated comment is reported at its opening `/*`.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.location();
        self.advance();
        self.advance();
        let mut depth = 1usize;

        while depth > 0 {
            match self.peek() {
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                Some(b'*') if self.peek_at(1) == Some(b'/') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                Some(b'\n') => self.advance_line(),
                Some(_) => self.advance(),
                None => return Err(LexError::new("unterminated block comment", start)),
            }
        }
        Ok(())
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        let location = self.location();
        let start = self.pos;

        let byte = match self.peek() {
            Some(byte) => byte,
            None => return Ok(Token::new(TokenKind::Eof, start, 0, location)),
        };

        if byte == b'\n' {
            self.advance_line();
            return Ok(Token::new(TokenKind::Newline, start, 1, location));
        }
        if byte.is_ascii_alphabetic() || byte == b'_' {
            return Ok(self.identifier(start, location));
        }
        if byte.is_ascii_digit() {
            return self.number(start, location);
        }
        if byte == b'"' {
            return self.string(start, location);
        }
        if byte == b'\'' {
            return self.character(start, location);
        }

        self.operator(start, location)
    }

    fn token_here(&self, kind: TokenKind, start: usize, location: Location) -> Token {
        Token::new(kind, start, self.pos - start, location)
    }

    fn identifier(&mut self, start: usize, location: Location) -> Token {
        while let Some(byte) = self.peek() {
            if byte.is_ascii_alphanumeric() || byte == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.source[start..self.pos];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.token_here(kind, start, location)
    }

    fn number(&mut self, start: usize, location: Location) -> Result<Token, LexError> {
        if self.peek() == Some(b'0') {
            let prefixed = match self.peek_at(1) {
                Some(b'x') | Some(b'X') => Some(TokenKind::Hex),
                Some(b'b') | Some(b'B') => Some(TokenKind::Binary),
                Some(b'o') | Some(b'O') => Some(TokenKind::Octal),
                _ => None,
            };
            if let Some(kind) = prefixed {
                return self.prefixed_number(kind, start, location);
            }
        }

        let mut is_float = false;
        loop {
            match self.peek() {
                Some(byte) if byte.is_ascii_digit() || byte == b'_' => self.advance(),
                Some(b'.') => {
                    // two consecutive dots are a range operator, not a float
                    if self.peek_at(1) == Some(b'.') {
                        break;
                    }
                    if is_float {
                        return Err(LexError::new("invalid number", location));
                    }
                    match self.peek_at(1) {
                        Some(byte) if byte.is_ascii_digit() => {
                            is_float = true;
                            self.advance();
                        }
                        _ => return Err(LexError::new("invalid number", location)),
                    }
                }
                _ => break,
            }
        }

        let kind = if is_float {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Ok(self.token_here(kind, start, location))
    }

    fn prefixed_number(
        &mut self,
        kind: TokenKind,
        start: usize,
        location: Location,
    ) -> Result<Token, LexError> {
        self.advance();
        self.advance();
        let digits_start = self.pos;
        while let Some(byte) = self.peek() {
            let valid = match kind {
                TokenKind::Hex => byte.is_ascii_hexdigit(),
                TokenKind::Binary => byte == b'0' || byte == b'1',
                _ => (b'0'..=b'7').contains(&byte),
            };
            if valid || byte == b'_' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == digits_start {
            return Err(LexError::new("invalid number", location));
        }
        Ok(self.token_here(kind, start, location))
    }

    fn string(&mut self, start: usize, location: Location) -> Result<Token, LexError> {
        self.advance();
        if self.peek() == Some(b'"') && self.peek_at(1) == Some(b'"') {
            self.advance();
            self.advance();
            return self.multiline_string(start, location);
        }
        if self.peek() == Some(b'"') {
            // empty string
            self.advance();
            return Ok(self.token_here(TokenKind::String, start, location));
        }

        loop {
            match self.peek() {
                Some(b'"') => {
                    self.advance();
                    return Ok(self.token_here(TokenKind::String, start, location));
                }
                Some(b'\n') | None => {
                    return Err(LexError::new("unterminated string literal", location))
                }
                Some(b'\\') => self.escape_sequence()?,
                Some(_) => self.advance(),
            }
        }
    }

    /// A `"""` string runs until the matching `"""` and may span lines.
    fn multiline_string(&mut self, start: usize, location: Location) -> Result<Token, LexError> {
        loop {
            match self.peek() {
                Some(b'"') if self.peek_at(1) == Some(b'"') && self.peek_at(2) == Some(b'"') => {
                    self.advance();
                    self.advance();
                    self.advance();
                    return Ok(self.token_here(TokenKind::MultilineString, start, location));
                }
                Some(b'\n') => self.advance_line(),
                Some(b'\\') => self.escape_sequence()?,
                Some(_) => self.advance(),
                None => return Err(LexError::new("unterminated string literal", location)),
            }
        }
    }

    fn character(&mut self, start: usize, location: Location) -> Result<Token, LexError> {
        self.advance();
        match self.peek() {
            Some(b'\'') => return Err(LexError::new("empty character literal", location)),
            Some(b'\\') => self.escape_sequence()?,
            Some(b'\n') | None => {
                return Err(LexError::new("unterminated character literal", location))
            }
            Some(_) => self.advance(),
        }
        match self.peek() {
            Some(b'\'') => {
                self.advance();
                Ok(self.token_here(TokenKind::Char, start, location))
            }
            Some(b'\n') | None => Err(LexError::new("unterminated character literal", location)),
            Some(_) => Err(LexError::new(
                "character literal contains more than one character",
                location,
            )),
        }
    }

    /// Validate one `\`-escape inside a string or character literal. The
    /// cursor is on the backslash; on success it has moved past the escape.
    fn escape_sequence(&mut self) -> Result<(), LexError> {
        let location = self.location();
        self.advance();
        match self.peek() {
            Some(b'n') | Some(b't') | Some(b'r') | Some(b'\\') | Some(b'0') | Some(b'a')
            | Some(b'b') | Some(b'f') | Some(b'v') | Some(b'\'') | Some(b'"') => {
                self.advance();
                Ok(())
            }
            Some(b'x') => {
                self.advance();
                for _ in 0..2 {
                    match self.peek() {
                        Some(byte) if byte.is_ascii_hexdigit() => self.advance(),
                        _ => return Err(LexError::new("invalid escape sequence", location)),
                    }
                }
                Ok(())
            }
            _ => Err(LexError::new("invalid escape sequence", location)),
        }
    }

    fn operator(&mut self, start: usize, location: Location) -> Result<Token, LexError> {
        let byte = self.bytes[self.pos];
        self.advance();

        // one byte consumed; the follow set below decides compound forms
        let kind = match byte {
            b'?' => TokenKind::Question,
            b'<' => match self.peek() {
                Some(b'=') => self.compound(TokenKind::LtEq),
                Some(b'<') => {
                    self.advance();
                    self.maybe_eq(TokenKind::Shl, TokenKind::ShlEq)
                }
                _ => TokenKind::Lt,
            },
            b'>' => match self.peek() {
                Some(b'=') => self.compound(TokenKind::GtEq),
                Some(b'>') => {
                    self.advance();
                    self.maybe_eq(TokenKind::Shr, TokenKind::ShrEq)
                }
                _ => TokenKind::Gt,
            },
            b'=' => self.maybe_eq(TokenKind::Equal, TokenKind::EqEq),
            b'!' => self.maybe_eq(TokenKind::Not, TokenKind::NotEq),
            b'+' => self.maybe_eq(TokenKind::Plus, TokenKind::PlusEq),
            b'-' => match self.peek() {
                Some(b'>') => self.compound(TokenKind::Arrow),
                Some(b'=') => self.compound(TokenKind::MinusEq),
                _ => TokenKind::Minus,
            },
            b'*' => self.maybe_eq(TokenKind::Star, TokenKind::StarEq),
            b'/' => self.maybe_eq(TokenKind::Slash, TokenKind::SlashEq),
            b'%' => self.maybe_eq(TokenKind::Percent, TokenKind::PercentEq),
            b'&' => match self.peek() {
                Some(b'=') => self.compound(TokenKind::AmpEq),
                Some(b'&') => {
                    self.advance();
                    self.maybe_eq(TokenKind::AmpAmp, TokenKind::AmpAmpEq)
                }
                _ => TokenKind::Amp,
            },
            b'|' => match self.peek() {
                Some(b'=') => self.compound(TokenKind::PipeEq),
                Some(b'|') => {
                    self.advance();
                    self.maybe_eq(TokenKind::PipePipe, TokenKind::PipePipeEq)
                }
                _ => TokenKind::Pipe,
            },
            b'^' => self.maybe_eq(TokenKind::Caret, TokenKind::CaretEq),
            b'~' => TokenKind::Tilde,
            b':' => match self.peek() {
                Some(b':') => self.compound(TokenKind::ColonColon),
                _ => TokenKind::Colon,
            },
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b'.' => match self.peek() {
                Some(b'.') => self.compound(TokenKind::DotDot),
                _ => TokenKind::Dot,
            },
            b'@' => TokenKind::At,
            b'$' => TokenKind::Dollar,
            _ => {
                return Err(LexError::new(
                    format!("unexpected character '{}'", byte as char),
                    location,
                ))
            }
        };

        Ok(self.token_here(kind, start, location))
    }

    fn compound(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn maybe_eq(&mut self, bare: TokenKind, with_eq: TokenKind) -> TokenKind {
        if self.peek() == Some(b'=') {
            self.advance();
            with_eq
        } else {
            bare
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<Token>, DiagnosticSink) {
        let mut sink = DiagnosticSink::new("test.veld");
        let tokens = Lexer::new(source).tokenize(&mut sink);
        (tokens, sink)
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, sink) = lex(source);
        assert!(!sink.has_errors(), "unexpected lex errors");
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("func main"),
            vec![TokenKind::Func, TokenKind::Identifier, TokenKind::Eof]
        );
        assert_eq!(
            kinds("selfish self"),
            vec![TokenKind::Identifier, TokenKind::SelfKw, TokenKind::Eof]
        );
    }

    #[test]
    fn test_operator_lengths() {
        assert_eq!(
            kinds("<<= && &&= -> :: .."),
            vec![
                TokenKind::ShlEq,
                TokenKind::AmpAmp,
                TokenKind::AmpAmpEq,
                TokenKind::Arrow,
                TokenKind::ColonColon,
                TokenKind::DotDot,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(
            kinds("42 4_200 3.5 0x1F 0b1010 0o17"),
            vec![
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Hex,
                TokenKind::Binary,
                TokenKind::Octal,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_hex_value_strips_prefix() {
        let source = "0x1F";
        let (tokens, _) = lex(source);
        assert_eq!(tokens[0].lexeme(source), "0x1F");
        assert_eq!(tokens[0].value(source), "1F");
    }

    #[test]
    fn test_range_is_not_a_float() {
        assert_eq!(
            kinds("3..5"),
            vec![
                TokenKind::Int,
                TokenKind::DotDot,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_double_dotted_number_is_an_error() {
        let (_, sink) = lex("3.5.2");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "invalid number");
    }

    #[test]
    fn test_string_forms() {
        let source = "\"plain\" \"\"\"multi\nline\"\"\" 'c' '\\n'";
        let (tokens, sink) = lex(source);
        assert!(!sink.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value(source), "plain");
        assert_eq!(tokens[1].kind, TokenKind::MultilineString);
        assert_eq!(tokens[1].value(source), "multi\nline");
        assert_eq!(tokens[2].kind, TokenKind::Char);
        assert_eq!(tokens[3].kind, TokenKind::Char);
        assert_eq!(tokens[3].value(source), "\\n");
    }

    #[test]
    fn test_unterminated_string_recovers_on_next_line() {
        let (tokens, sink) = lex("\"oops\nvar x");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "unterminated string literal");
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Newline,
                TokenKind::Var,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_nested_block_comments() {
        assert_eq!(
            kinds("/* a /* b */ c */ x"),
            vec![TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (_, sink) = lex("/* /* */ x");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "unterminated block comment");
    }

    #[test]
    fn test_newlines_are_tokens() {
        assert_eq!(
            kinds("a\nb"),
            vec![
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_round_trip_lexemes() {
        let source = "func add(x: i32) { return x + 0x1F }";
        let (tokens, sink) = lex(source);
        assert!(!sink.has_errors());
        for token in &tokens {
            let lexeme = token.lexeme(source);
            assert_eq!(lexeme, &source[token.start..token.start + token.len]);
        }
    }

    #[test]
    fn test_lexing_is_idempotent() {
        let source = "var x = 3..5 // comment\nlet y = \"s\"";
        let (first, _) = lex(source);
        let (second, _) = lex(source);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_escape() {
        let (_, sink) = lex("\"bad \\q escape\"");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "invalid escape sequence");
    }

    #[test]
    fn test_unexpected_character() {
        let (_, sink) = lex("var # = 1");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "unexpected character '#'");
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        // 'é' is two bytes wide; the '#' after it still sits at column 15.
        let (_, sink) = lex("var s = \"é\" ; # = 1");
        assert!(sink.has_errors());
        assert_eq!(sink.errors()[0].message, "unexpected character '#'");
        assert_eq!(sink.errors()[0].location.column, 15);
    }
}
