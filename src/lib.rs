//! Loom: a small, indentation-sensitive, dynamically-typed scripting
//! language — lexer, recursive-descent parser, and tree-walking
//! interpreter.
pub mod ast;
pub mod interpreter;
pub mod lexer;

use std::error::Error as StdError;
use std::fmt::{self, Display};

use ast::ParseError;
use interpreter::RuntimeError;
use lexer::LexError;

/// Unifies the three error kinds a run can fail with, so callers that walk
/// lex → parse → interpret can propagate a single type with `?`.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Lex(e) => write!(f, "{e}"),
            Error::Parse(e) => write!(f, "{e}"),
            Error::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl StdError for Error {}

impl From<LexError> for Error {
    fn from(e: LexError) -> Self {
        Error::Lex(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Error::Runtime(e)
    }
}
