//! Diagnostics shared by the tokenizer and the parser.
//!
//! Every failure is positional: it remembers the byte offset it was raised at
//! and renders as the source line, a caret under that offset, and a message.

use thiserror::Error;

use crate::Punct;

pub type CompileResult<T> = Result<T, CompileError>;

/// Which stage gave up on the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Lex,
    Parse,
    NestingTooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid token")]
    InvalidToken,
    #[error("number too large")]
    NumberTooLarge,
    #[error("expected number")]
    ExpectedNumber,
    #[error("expected {}", .0.describe())]
    Expected(Punct),
    #[error("extra token")]
    ExtraToken,
    #[error("expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidToken | Self::NumberTooLarge => ErrorClass::Lex,
            Self::ExpectedNumber | Self::Expected(_) | Self::ExtraToken => ErrorClass::Parse,
            Self::NestingTooDeep { .. } => ErrorClass::NestingTooDeep,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}\n{marker}\n{kind}")]
pub struct CompileError {
    pub kind: ErrorKind,
    pub offset: usize,
    line: String,
    marker: String,
}

impl CompileError {
    /// Anchor `kind` at byte `offset` of `src`.
    pub fn at(src: &str, offset: usize, kind: ErrorKind) -> Self {
        let safe_offset = offset.min(src.len());
        let column = src
            .get(..safe_offset)
            .map_or(safe_offset, |prefix| prefix.chars().count());
        Self {
            kind,
            offset,
            line: src.to_string(),
            marker: format!("{}^", " ".repeat(column)),
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{program}: invalid number of arguments\nusage: {program} <expression>")]
pub struct UsageError {
    pub program: String,
}
