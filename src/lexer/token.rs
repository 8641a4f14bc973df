//! Token shape produced by the [`Lexer`](super::Lexer).

/// The closed set of token kinds the lexer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,

    Plus,
    Minus,
    Multiply,
    Divide,

    Assign,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,

    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    Print,
    If,
    Elif,
    Else,
    While,
    For,
    To,
    Func,
    Return,
    End,
    And,
    Or,
    Not,
    True,
    False,

    Newline,
    Indent,
    Dedent,
    Eof,
}

/// A single token. Immutable once constructed.
///
/// `lexeme` is empty for synthetic tokens (`Indent`/`Dedent`/`Eof`). For
/// `String` tokens it already holds the escape-decoded text, not the raw
/// source bytes between the quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub indent: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, indent: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            indent,
        }
    }

    pub fn synthetic(kind: TokenKind, line: usize, indent: usize) -> Self {
        Self::new(kind, "", line, indent)
    }
}

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup table for keywords, mirroring the teacher's `LEX_MAP` approach of
/// a static table from lexeme to token kind, built once behind
/// `once_cell::sync::Lazy` (the teacher used `lazy_static!` for the same
/// purpose).
static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    HashMap::from([
        ("Print", Print),
        ("If", If),
        ("Elif", Elif),
        ("Else", Else),
        ("While", While),
        ("For", For),
        ("To", To),
        ("Func", Func),
        ("Return", Return),
        ("End", End),
        ("And", And),
        ("Or", Or),
        ("Not", Not),
        ("True", True),
        ("False", False),
    ])
});

pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}
