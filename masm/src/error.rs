//! The error type returned by [`crate::parse`] and [`crate::assemble`].

use crate::Rule;
use pest::error::{Error as PestError, ErrorVariant, InputLocation};
use pest::Span;
use std::fmt;

/// What went wrong while turning source text into a finished program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidLabel,
    InvalidLabelDelimitation,
    InvalidMnemonic,
    InvalidOperand,
    InvalidOperandType,
    InvalidConstant,
    InvalidLookupTable,
    UnresolvableLabel,
    DuplicateLabel,
    DuplicateLookupTable,
    MemoryOverflow,
}

/// A single error, carrying enough of the offending span to let a caller
/// underline it in the original source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerError {
    pub kind: ErrorKind,
    pub line: usize,
    pub highlight_start: usize,
    pub highlight_len: usize,
    pub snippet: String,
    pub message: String,
}

impl CompilerError {
    pub(crate) fn new(kind: ErrorKind, span: Span, message: impl Into<String>) -> CompilerError {
        let (line, _) = span.start_pos().line_col();
        let snippet: String = span.as_str().chars().take(4).collect();
        CompilerError {
            kind,
            line,
            highlight_start: span.start(),
            highlight_len: (span.end() - span.start()).max(1),
            snippet,
            message: message.into(),
        }
    }

    pub(crate) fn from_pest(err: PestError<Rule>) -> CompilerError {
        let kind = match &err.variant {
            ErrorVariant::ParsingError { positives, .. } => {
                if positives.contains(&Rule::hex_byte) {
                    ErrorKind::InvalidLookupTable
                } else if positives.contains(&Rule::identifier) {
                    ErrorKind::InvalidLabelDelimitation
                } else {
                    ErrorKind::InvalidOperand
                }
            }
            ErrorVariant::CustomError { .. } => ErrorKind::InvalidOperand,
        };

        let (line, col) = match err.line_col {
            pest::error::LineColLocation::Pos((line, col)) => (line, col),
            pest::error::LineColLocation::Span((line, col), _) => (line, col),
        };

        let highlight_start = match err.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };

        let snippet: String = err.line().chars().skip(col.saturating_sub(1)).take(4).collect();

        CompilerError {
            kind,
            line,
            highlight_start,
            highlight_len: 1,
            snippet,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for CompilerError {}

pub type Result<T> = std::result::Result<T, CompilerError>;
