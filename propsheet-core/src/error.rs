//! Error types for the props compiler
//!
//! This module provides error handling using the `thiserror` crate.
//! There are two kinds of failure: syntax errors raised while recognizing
//! the input, and internal consistency errors raised by the materializer
//! when it meets a tree shape the grammar never produces.

use thiserror::Error;

/// The main error type for the props compiler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input does not conform to the entry or regex grammar
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The materializer was handed a tree it cannot represent
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}

/// A syntax error with its location in the source
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at offset {}", span.start)]
pub struct SyntaxError {
    /// What went wrong
    pub kind: SyntaxErrorKind,
    /// Where it went wrong
    pub span: Span,
}

impl SyntaxError {
    /// Create a new syntax error
    pub fn new(kind: SyntaxErrorKind, span: Span) -> Self {
        SyntaxError { kind, span }
    }

    /// Create a syntax error pointing at a single position
    pub fn at(kind: SyntaxErrorKind, pos: usize) -> Self {
        SyntaxError {
            kind,
            span: Span::single(pos),
        }
    }
}

/// Specific kinds of syntax errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxErrorKind {
    /// Encountered a character that cannot start or continue the construct
    #[error("expected {expected}, found '{found}'")]
    UnexpectedChar {
        /// What was expected
        expected: String,
        /// What was actually found
        found: char,
    },

    /// Input ended in the middle of a construct
    #[error("expected {expected}, found end of input")]
    UnexpectedEof {
        /// What was expected
        expected: String,
    },

    /// A quantifier that does not follow an atom (e.g. a leading `+`)
    #[error("nothing to repeat before quantifier '{0}'")]
    NothingToRepeat(String),

    /// A `)` with no matching `(`
    #[error("unbalanced ')'")]
    UnbalancedParen,

    /// A group opened with `(` but never closed
    #[error("unterminated group")]
    UnterminatedGroup,

    /// A character class opened with `[` but never closed
    #[error("unterminated character class")]
    UnterminatedClass,

    /// A backslash followed by something that is not a valid escape
    #[error("invalid escape sequence")]
    InvalidEscape,

    /// A bounded quantifier whose minimum exceeds its maximum
    #[error("quantifier bounds out of order: {{{min},{max}}}")]
    QuantifierOutOfOrder {
        /// The lower bound, as written
        min: String,
        /// The upper bound, as written
        max: String,
    },

    /// A class range whose start comes after its end
    #[error("class range out of order: {start}-{end}")]
    RangeOutOfOrder {
        /// Range start as written
        start: String,
        /// Range end as written
        end: String,
    },

    /// A class range with a class escape such as `\d` as an endpoint
    #[error("class escape '{0}' cannot be a range endpoint")]
    ClassEscapeInRange(String),

    /// A numeric literal that does not fit its target type
    #[error("number '{0}' is out of range")]
    NumberOutOfRange(String),

    /// A quoted string missing its closing quote
    #[error("unterminated string literal")]
    UnterminatedString,

    /// Groups or props blocks nested past the supported depth
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

/// A span representing a location in the source text (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (inclusive)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single character
    pub fn single(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// 1-based line and column of the span start within `source`
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let upto = &source[..self.start.min(source.len())];
        let line = upto.matches('\n').count() + 1;
        let column = match upto.rfind('\n') {
            Some(nl) => upto[nl + 1..].chars().count() + 1,
            None => upto.chars().count() + 1,
        };
        (line, column)
    }
}

/// Result type alias for props operations
pub type Result<T> = std::result::Result<T, Error>;
