//! Parse tree produced by the combinators.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::cursor::Cursor;
use crate::time;

/// A node of the parse tree.
///
/// Every variant knows where in the input it was produced, so errors raised
/// while reducing the tree can still point at the offending text.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'src> {
    /// An optional rule that did not match.
    Empty { cursor: Cursor<'src> },

    /// Text matched by a literal or a regular expression.
    Literal { text: &'src str, cursor: Cursor<'src> },

    /// Results of consecutive parsers, in grammar order.
    Sequence {
        elements: Vec<Self>,
        cursor: Cursor<'src>,
    },

    /// A node labelled by the grammar that produced it.
    Typed { inner: Box<Self>, tag: Tag },

    /// Seconds since the Unix epoch.
    EpochTime { seconds: f64, cursor: Cursor<'src> },

    /// An instant with an explicit UTC offset.
    IsoTime {
        instant: DateTime<FixedOffset>,
        cursor: Cursor<'src>,
    },

    /// A signed span of time.
    Period {
        duration: TimeDelta,
        cursor: Cursor<'src>,
    },
}

impl<'src> Node<'src> {
    /// Where this node starts in the input.
    ///
    /// Typed nodes report the position of the node they wrap.
    pub fn cursor(&self) -> Cursor<'src> {
        match self {
            Self::Empty { cursor }
            | Self::Literal { cursor, .. }
            | Self::Sequence { cursor, .. }
            | Self::EpochTime { cursor, .. }
            | Self::IsoTime { cursor, .. }
            | Self::Period { cursor, .. } => *cursor,
            Self::Typed { inner, .. } => inner.cursor(),
        }
    }

    /// Short human-readable name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty",
            Self::Literal { .. } => "literal",
            Self::Sequence { .. } => "sequence",
            Self::Typed { .. } => "typed node",
            Self::EpochTime { .. } => "epoch time",
            Self::IsoTime { .. } => "iso time",
            Self::Period { .. } => "period",
        }
    }

    pub const fn tag(&self) -> Option<Tag> {
        match self {
            Self::Typed { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    pub const fn text(&self) -> Option<&'src str> {
        match self {
            Self::Literal { text, .. } => Some(*text),
            _ => None,
        }
    }

    pub const fn as_period(&self) -> Option<TimeDelta> {
        match self {
            Self::Period { duration, .. } => Some(*duration),
            _ => None,
        }
    }

    pub const fn as_instant(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::IsoTime { instant, .. } => Some(*instant),
            _ => None,
        }
    }

    pub const fn as_epoch_seconds(&self) -> Option<f64> {
        match self {
            Self::EpochTime { seconds, .. } => Some(*seconds),
            _ => None,
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { .. } => f.write_str("<empty>"),
            Self::Literal { text, .. } => write!(f, "{text:?}"),
            Self::Sequence { elements, .. } => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str("]")
            }
            Self::Typed { inner, tag } => write!(f, "({inner}):{tag}"),
            Self::EpochTime { seconds, .. } => write!(f, "{seconds:.6}"),
            Self::IsoTime { instant, .. } => f.write_str(&time::format_iso(instant)),
            Self::Period { duration, .. } => f.write_str(&time::format_period(*duration)),
        }
    }
}

/// Label attached by [`typed`](crate::combinator::typed).
///
/// Each grammar owns its own set of tags, so code walking a tree can match
/// them exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Expr(ExprTag),
    Select(SelectTag),
}

/// Tags used by the timestamp expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprTag {
    /// A `+` or `-` operator.
    Sign,
    /// The `now` placeholder, resolved during evaluation.
    Now,
}

/// Tags used by the experimental select grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectTag {
    SelectLit,
    SelectorName,
    Selector,
    FromLit,
    TableName,
    FromExpr,
    SelectExpr,
}

impl Tag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expr(ExprTag::Sign) => "sign",
            Self::Expr(ExprTag::Now) => "now",
            Self::Select(SelectTag::SelectLit) => "select_lit",
            Self::Select(SelectTag::SelectorName) => "selector_name",
            Self::Select(SelectTag::Selector) => "selector",
            Self::Select(SelectTag::FromLit) => "from_lit",
            Self::Select(SelectTag::TableName) => "table_name",
            Self::Select(SelectTag::FromExpr) => "from_expr",
            Self::Select(SelectTag::SelectExpr) => "select_expr",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ExprTag> for Tag {
    fn from(tag: ExprTag) -> Self {
        Self::Expr(tag)
    }
}

impl From<SelectTag> for Tag {
    fn from(tag: SelectTag) -> Self {
        Self::Select(tag)
    }
}
