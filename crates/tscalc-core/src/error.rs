//! Error types for parsing and evaluation.
//!
//! A parser that simply does not apply at a position is not an error; it
//! returns `Ok(None)` and lets the caller try something else. The types here
//! are the hard failures that abort a whole line. Each carries the cursor of
//! the offending text so callers can point at it.

use std::num::ParseFloatError;

use thiserror::Error;

use crate::cursor::Cursor;
use crate::eval::Sign;

/// Hard failures raised while parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError<'src> {
    /// The grammar did not match at all.
    #[error("no expression matched at {:?}", .cursor.rest())]
    NoMatch { cursor: Cursor<'src> },

    /// The grammar matched a prefix but left non-blank input behind.
    #[error("failed to parse whole input, the remainder: {:?}", .cursor.rest())]
    TrailingInput { cursor: Cursor<'src> },

    /// Text shaped like a number that does not convert to one.
    #[error("invalid number {text:?}: {source}")]
    InvalidNumber {
        text: &'src str,
        cursor: Cursor<'src>,
        #[source]
        source: ParseFloatError,
    },

    /// Text shaped like a timestamp that is not a valid date or time.
    #[error("invalid timestamp {text:?}: {source}")]
    InvalidTimestamp {
        text: &'src str,
        cursor: Cursor<'src>,
        #[source]
        source: chrono::ParseError,
    },

    /// Text shaped like a period whose value cannot be represented.
    #[error("invalid period {text:?}: {reason}")]
    InvalidPeriod {
        text: &'src str,
        reason: &'static str,
        cursor: Cursor<'src>,
    },

    /// A forward reference was parsed through before being bound.
    #[error("BUG: parser reference {name} used before it was bound")]
    UnboundRef { name: String, cursor: Cursor<'src> },
}

impl<'src> ParseError<'src> {
    /// Position of the offending input.
    pub const fn cursor(&self) -> Cursor<'src> {
        match self {
            Self::NoMatch { cursor }
            | Self::TrailingInput { cursor }
            | Self::InvalidNumber { cursor, .. }
            | Self::InvalidTimestamp { cursor, .. }
            | Self::InvalidPeriod { cursor, .. }
            | Self::UnboundRef { cursor, .. } => *cursor,
        }
    }
}

/// Hard failures raised while reducing a parsed expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError<'src> {
    /// The operands have no defined result for this operator.
    #[error("cannot combine {left} {sign} {right}")]
    CannotCombine {
        left: &'static str,
        sign: Sign,
        right: &'static str,
        cursor: Cursor<'src>,
    },

    /// A leading sign in front of something other than a period.
    #[error("cannot apply sign {sign} to {kind}")]
    CannotNegate {
        sign: Sign,
        kind: &'static str,
        cursor: Cursor<'src>,
    },

    /// The result does not fit in the supported time range.
    #[error("{what} is out of range")]
    OutOfRange {
        what: &'static str,
        cursor: Cursor<'src>,
    },

    /// The tree contains a node the expression grammar never produces.
    #[error("unexpected {kind} in expression")]
    UnexpectedNode {
        kind: &'static str,
        cursor: Cursor<'src>,
    },
}

impl<'src> EvalError<'src> {
    /// Position of the offending node.
    pub const fn cursor(&self) -> Cursor<'src> {
        match self {
            Self::CannotCombine { cursor, .. }
            | Self::CannotNegate { cursor, .. }
            | Self::OutOfRange { cursor, .. }
            | Self::UnexpectedNode { cursor, .. } => *cursor,
        }
    }
}

/// Either kind of failure for one line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error<'src> {
    #[error(transparent)]
    Parse(ParseError<'src>),

    #[error(transparent)]
    Eval(EvalError<'src>),
}

impl<'src> Error<'src> {
    pub const fn cursor(&self) -> Cursor<'src> {
        match self {
            Self::Parse(err) => err.cursor(),
            Self::Eval(err) => err.cursor(),
        }
    }
}

impl<'src> From<ParseError<'src>> for Error<'src> {
    fn from(err: ParseError<'src>) -> Self {
        Self::Parse(err)
    }
}

impl<'src> From<EvalError<'src>> for Error<'src> {
    fn from(err: EvalError<'src>) -> Self {
        Self::Eval(err)
    }
}
