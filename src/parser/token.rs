//! Token definitions for the Veld lexer
//!
//! A [`Token`] is a kind plus a byte span into the source buffer. Re-slicing
//! the buffer at `[start, start + len)` reproduces exactly the characters the
//! lexer consumed for it, which keeps the token stream cheap and lets error
//! messages quote the original text.

use crate::diagnostics::Location;
use std::fmt;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Struct,
    Union,
    Enum,
    Func,
    Var,
    Let,
    Typealias,
    Return,
    Throw,
    If,
    Else,
    While,
    For,
    In,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Do,
    Try,
    Catch,
    Import,
    Goto,
    Asm,
    Cast,
    Extern,
    Volatile,
    Private,
    SelfKw,
    Operator,
    True,
    False,
    Nil,

    // Builtin type keywords
    I8,
    I16,
    I32,
    I64,
    ISize,
    U8,
    U16,
    U32,
    U64,
    USize,
    F32,
    F64,
    Void,
    StringType,
    CharType,
    Bool,
    Any,

    // Literal values
    Int,
    Float,
    Hex,
    Octal,
    Binary,
    String,
    MultilineString,
    Char,
    Identifier,

    // Operators
    Question,   // ?
    Lt,         // <
    LtEq,       // <=
    Gt,         // >
    GtEq,       // >=
    Equal,      // =
    EqEq,       // ==
    Not,        // !
    NotEq,      // !=
    Plus,       // +
    PlusEq,     // +=
    Minus,      // -
    MinusEq,    // -=
    Arrow,      // ->
    Star,       // *
    StarEq,     // *=
    Slash,      // /
    SlashEq,    // /=
    Percent,    // %
    PercentEq,  // %=
    Amp,        // &
    AmpEq,      // &=
    AmpAmp,     // &&
    AmpAmpEq,   // &&=
    Pipe,       // |
    PipeEq,     // |=
    PipePipe,   // ||
    PipePipeEq, // ||=
    Shl,        // <<
    ShlEq,      // <<=
    Shr,        // >>
    ShrEq,      // >>=
    Caret,      // ^
    CaretEq,    // ^=
    Tilde,      // ~

    // Punctuation
    Colon,      // :
    ColonColon, // ::
    Semicolon,  // ;
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Comma,      // ,
    Dot,        // .
    DotDot,     // ..
    At,         // @
    Dollar,     // $

    // Structural
    Newline,
    Eof,
}

impl TokenKind {
    /// Keyword table: maps reserved identifier text to its keyword kind.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "struct" => TokenKind::Struct,
            "union" => TokenKind::Union,
            "enum" => TokenKind::Enum,
            "func" => TokenKind::Func,
            "var" => TokenKind::Var,
            "let" => TokenKind::Let,
            "typealias" => TokenKind::Typealias,
            "return" => TokenKind::Return,
            "throw" => TokenKind::Throw,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "do" => TokenKind::Do,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "import" => TokenKind::Import,
            "goto" => TokenKind::Goto,
            "asm" => TokenKind::Asm,
            "cast" => TokenKind::Cast,
            "extern" => TokenKind::Extern,
            "volatile" => TokenKind::Volatile,
            "private" => TokenKind::Private,
            "self" => TokenKind::SelfKw,
            "operator" => TokenKind::Operator,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            "i8" => TokenKind::I8,
            "i16" => TokenKind::I16,
            "i32" => TokenKind::I32,
            "i64" => TokenKind::I64,
            "isize" => TokenKind::ISize,
            "u8" => TokenKind::U8,
            "u16" => TokenKind::U16,
            "u32" => TokenKind::U32,
            "u64" => TokenKind::U64,
            "usize" => TokenKind::USize,
            "f32" => TokenKind::F32,
            "f64" => TokenKind::F64,
            "void" => TokenKind::Void,
            "string" => TokenKind::StringType,
            "char" => TokenKind::CharType,
            "bool" => TokenKind::Bool,
            "any" => TokenKind::Any,
            _ => return None,
        };
        Some(kind)
    }

    /// Operators valid at the equality precedence level: equality, logical,
    /// and the compound-assignment forms.
    pub fn is_equality_op(self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::AmpAmp
                | TokenKind::PipePipe
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::ShlEq
                | TokenKind::ShrEq
                | TokenKind::CaretEq
                | TokenKind::AmpAmpEq
                | TokenKind::PipePipeEq
        )
    }

    pub fn is_comparison_op(self) -> bool {
        matches!(
            self,
            TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq
        )
    }

    pub fn is_additive_op(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative_op(self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Slash | TokenKind::Percent)
    }

    /// Prefix unary operators.
    pub fn is_unary_op(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Not | TokenKind::Tilde
        )
    }

    /// Tokens a primary expression can start from: literal values,
    /// identifiers, and `self`.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Float
                | TokenKind::Hex
                | TokenKind::Octal
                | TokenKind::Binary
                | TokenKind::String
                | TokenKind::MultilineString
                | TokenKind::Char
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::Identifier
                | TokenKind::SelfKw
        )
    }

    pub fn is_builtin_type(self) -> bool {
        matches!(
            self,
            TokenKind::I8
                | TokenKind::I16
                | TokenKind::I32
                | TokenKind::I64
                | TokenKind::ISize
                | TokenKind::U8
                | TokenKind::U16
                | TokenKind::U32
                | TokenKind::U64
                | TokenKind::USize
                | TokenKind::F32
                | TokenKind::F64
                | TokenKind::Void
                | TokenKind::StringType
                | TokenKind::CharType
                | TokenKind::Bool
                | TokenKind::Any
        )
    }

    /// Tokens a type expression can start from.
    pub fn is_type_start(self) -> bool {
        self.is_builtin_type() || matches!(self, TokenKind::Identifier | TokenKind::Dollar)
    }

    /// Types accepted as template parameter kinds: builtins plus the
    /// aggregate keywords.
    pub fn is_template_keyword(self) -> bool {
        self.is_builtin_type()
            || matches!(self, TokenKind::Struct | TokenKind::Enum | TokenKind::Union)
    }

    /// Operator tokens allowed inside an `operator` overload signature.
    pub fn is_overloadable_op(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::Equal
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Plus
                | TokenKind::PlusEq
                | TokenKind::Minus
                | TokenKind::MinusEq
                | TokenKind::Star
                | TokenKind::StarEq
                | TokenKind::Slash
                | TokenKind::SlashEq
                | TokenKind::Percent
                | TokenKind::PercentEq
                | TokenKind::Amp
                | TokenKind::AmpEq
                | TokenKind::AmpAmp
                | TokenKind::AmpAmpEq
                | TokenKind::Pipe
                | TokenKind::PipeEq
                | TokenKind::PipePipe
                | TokenKind::PipePipeEq
                | TokenKind::Shl
                | TokenKind::ShlEq
                | TokenKind::Shr
                | TokenKind::ShrEq
                | TokenKind::Caret
                | TokenKind::CaretEq
                | TokenKind::LBracket
                | TokenKind::RBracket
        )
    }

    pub fn is_qualifier(self) -> bool {
        matches!(
            self,
            TokenKind::Extern | TokenKind::Volatile | TokenKind::Private
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Struct => "'struct'",
            TokenKind::Union => "'union'",
            TokenKind::Enum => "'enum'",
            TokenKind::Func => "'func'",
            TokenKind::Var => "'var'",
            TokenKind::Let => "'let'",
            TokenKind::Typealias => "'typealias'",
            TokenKind::Return => "'return'",
            TokenKind::Throw => "'throw'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::In => "'in'",
            TokenKind::Switch => "'switch'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::Do => "'do'",
            TokenKind::Try => "'try'",
            TokenKind::Catch => "'catch'",
            TokenKind::Import => "'import'",
            TokenKind::Goto => "'goto'",
            TokenKind::Asm => "'asm'",
            TokenKind::Cast => "'cast'",
            TokenKind::Extern => "'extern'",
            TokenKind::Volatile => "'volatile'",
            TokenKind::Private => "'private'",
            TokenKind::SelfKw => "'self'",
            TokenKind::Operator => "'operator'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Nil => "'nil'",
            TokenKind::I8 => "'i8'",
            TokenKind::I16 => "'i16'",
            TokenKind::I32 => "'i32'",
            TokenKind::I64 => "'i64'",
            TokenKind::ISize => "'isize'",
            TokenKind::U8 => "'u8'",
            TokenKind::U16 => "'u16'",
            TokenKind::U32 => "'u32'",
            TokenKind::U64 => "'u64'",
            TokenKind::USize => "'usize'",
            TokenKind::F32 => "'f32'",
            TokenKind::F64 => "'f64'",
            TokenKind::Void => "'void'",
            TokenKind::StringType => "'string'",
            TokenKind::CharType => "'char'",
            TokenKind::Bool => "'bool'",
            TokenKind::Any => "'any'",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Hex => "hexadecimal literal",
            TokenKind::Octal => "octal literal",
            TokenKind::Binary => "binary literal",
            TokenKind::String => "string literal",
            TokenKind::MultilineString => "multiline string literal",
            TokenKind::Char => "character literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Question => "'?'",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
            TokenKind::Equal => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::Not => "'!'",
            TokenKind::NotEq => "'!='",
            TokenKind::Plus => "'+'",
            TokenKind::PlusEq => "'+='",
            TokenKind::Minus => "'-'",
            TokenKind::MinusEq => "'-='",
            TokenKind::Arrow => "'->'",
            TokenKind::Star => "'*'",
            TokenKind::StarEq => "'*='",
            TokenKind::Slash => "'/'",
            TokenKind::SlashEq => "'/='",
            TokenKind::Percent => "'%'",
            TokenKind::PercentEq => "'%='",
            TokenKind::Amp => "'&'",
            TokenKind::AmpEq => "'&='",
            TokenKind::AmpAmp => "'&&'",
            TokenKind::AmpAmpEq => "'&&='",
            TokenKind::Pipe => "'|'",
            TokenKind::PipeEq => "'|='",
            TokenKind::PipePipe => "'||'",
            TokenKind::PipePipeEq => "'||='",
            TokenKind::Shl => "'<<'",
            TokenKind::ShlEq => "'<<='",
            TokenKind::Shr => "'>>'",
            TokenKind::ShrEq => "'>>='",
            TokenKind::Caret => "'^'",
            TokenKind::CaretEq => "'^='",
            TokenKind::Tilde => "'~'",
            TokenKind::Colon => "':'",
            TokenKind::ColonColon => "'::'",
            TokenKind::Semicolon => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::DotDot => "'..'",
            TokenKind::At => "'@'",
            TokenKind::Dollar => "'$'",
            TokenKind::Newline => "new line",
            TokenKind::Eof => "end of file",
        };
        f.write_str(text)
    }
}

/// A lexed token: kind plus byte span and source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, len: usize, location: Location) -> Self {
        Self {
            kind,
            start,
            len,
            location,
        }
    }

    /// The exact source substring this token was scanned from.
    pub fn lexeme<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.start + self.len]
    }

    /// The semantically useful text of the token: quotes are stripped from
    /// string and character literals, the `"""` fences from multiline
    /// strings, and the base prefix from hex/octal/binary literals.
    pub fn value<'a>(&self, source: &'a str) -> &'a str {
        let lexeme = self.lexeme(source);
        match self.kind {
            TokenKind::String | TokenKind::Char => &lexeme[1..lexeme.len() - 1],
            TokenKind::MultilineString => &lexeme[3..lexeme.len() - 3],
            TokenKind::Hex | TokenKind::Octal | TokenKind::Binary => &lexeme[2..],
            _ => lexeme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        assert_eq!(TokenKind::keyword("func"), Some(TokenKind::Func));
        assert_eq!(TokenKind::keyword("typealias"), Some(TokenKind::Typealias));
        assert_eq!(TokenKind::keyword("self"), Some(TokenKind::SelfKw));
        assert_eq!(TokenKind::keyword("usize"), Some(TokenKind::USize));
        assert_eq!(TokenKind::keyword("main"), None);
    }

    #[test]
    fn test_operator_classification() {
        assert!(TokenKind::AmpAmp.is_equality_op());
        assert!(TokenKind::PlusEq.is_equality_op());
        assert!(!TokenKind::Lt.is_equality_op());
        assert!(TokenKind::Lt.is_comparison_op());
        assert!(TokenKind::Tilde.is_unary_op());
        assert!(TokenKind::LBracket.is_overloadable_op());
        assert!(!TokenKind::Question.is_overloadable_op());
    }

    #[test]
    fn test_token_value_strips_delimiters() {
        let source = "\"hi\" 'c' 0x1F";
        let string = Token::new(TokenKind::String, 0, 4, Location::new(1, 1));
        let ch = Token::new(TokenKind::Char, 5, 3, Location::new(1, 6));
        let hex = Token::new(TokenKind::Hex, 9, 4, Location::new(1, 10));

        assert_eq!(string.value(source), "hi");
        assert_eq!(ch.value(source), "c");
        assert_eq!(hex.value(source), "1F");
        assert_eq!(hex.lexeme(source), "0x1F");
    }
}
