//! Reduction of a parsed expression to a single value.
//!
//! The tree is flattened into `[sign] term (sign term)*` and folded left to
//! right. A line with a single term is a format conversion instead: epoch
//! seconds become a timestamp and a timestamp becomes epoch seconds.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};

use crate::cursor::Cursor;
use crate::error::{Error, EvalError};
use crate::flatten::{Unpack, flatten_with};
use crate::grammar::Grammar;
use crate::node::{ExprTag, Node, Tag};
use crate::time::{epoch_to_instant, instant_to_epoch};

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }

    fn from_text(text: &str) -> Option<Self> {
        match text {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the current time for `now`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc>,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reads the clock on first use and hands out the same instant afterwards,
/// so every `now` of a line means the same moment.
struct Now<'c> {
    clock: &'c dyn Clock,
    cached: Option<DateTime<Utc>>,
}

impl Now<'_> {
    fn get(&mut self) -> DateTime<FixedOffset> {
        let clock = self.clock;
        self.cached
            .get_or_insert_with(|| {
                let now = clock.now();
                tracing::debug!(%now, "read clock");
                now
            })
            .fixed_offset()
    }
}

/// Reduces a tree produced by [`Grammar::expression`] or
/// [`Grammar::single_term`].
pub fn evaluate<'src>(node: Node<'src>, clock: &dyn Clock) -> Result<Node<'src>, EvalError<'src>> {
    let start = node.cursor();
    let items = match flatten_with(node, unpack_expression) {
        None => Vec::new(),
        Some(Node::Sequence { elements, .. }) => elements,
        Some(other) => vec![other],
    };
    let mut items = items.into_iter().peekable();
    let mut now = Now {
        clock,
        cached: None,
    };

    let leading = items
        .next_if(|node| sign_of(node).is_some())
        .as_ref()
        .and_then(sign_of);
    let Some(first) = items.next() else {
        return Err(EvalError::UnexpectedNode {
            kind: "empty",
            cursor: start,
        });
    };
    let first = apply_leading_sign(leading, first)?;

    let Some(mut next) = items.next() else {
        let result = convert(first, &mut now)?;
        tracing::debug!(%result, "converted");
        return Ok(result);
    };

    let mut acc = resolve(first, &mut now)?;
    loop {
        let Some(sign) = sign_of(&next) else {
            return Err(EvalError::UnexpectedNode {
                kind: next.kind(),
                cursor: next.cursor(),
            });
        };
        let Some(term) = items.next() else {
            return Err(EvalError::UnexpectedNode {
                kind: "dangling operator",
                cursor: next.cursor(),
            });
        };
        let term = resolve(term, &mut now)?;
        acc = combine(acc, sign, term)?;
        tracing::trace!(%sign, acc = %acc, "folded");

        match items.next() {
            Some(node) => next = node,
            None => break,
        }
    }
    tracing::debug!(result = %acc, "evaluated");
    Ok(acc)
}

/// Parses and evaluates one line.
pub fn calculate<'src>(
    grammar: &Grammar,
    line: &'src str,
    clock: &dyn Clock,
) -> Result<Node<'src>, Error<'src>> {
    let node = grammar.parse(line)?;
    Ok(evaluate(node, clock)?)
}

/// Keeps terms and tagged signs, drops whitespace and skipped optionals.
fn unpack_expression(node: Node<'_>) -> Unpack<'_> {
    match node {
        Node::Sequence { elements, .. } => Unpack::Splice(elements),
        Node::Empty { .. } => Unpack::Drop,
        Node::Literal { text, .. } if text.trim().is_empty() => Unpack::Drop,
        other => Unpack::Keep(other),
    }
}

fn sign_of(node: &Node<'_>) -> Option<Sign> {
    match node {
        Node::Typed {
            inner,
            tag: Tag::Expr(ExprTag::Sign),
        } => inner.text().and_then(Sign::from_text),
        _ => None,
    }
}

fn is_now(node: &Node<'_>) -> bool {
    node.tag() == Some(Tag::Expr(ExprTag::Now))
}

fn apply_leading_sign<'src>(
    sign: Option<Sign>,
    term: Node<'src>,
) -> Result<Node<'src>, EvalError<'src>> {
    match (sign, term) {
        (None | Some(Sign::Plus), term @ Node::Period { .. }) | (None, term) => Ok(term),
        (Some(Sign::Minus), Node::Period { duration, cursor }) => Ok(Node::Period {
            duration: -duration,
            cursor,
        }),
        (Some(sign), term) => Err(EvalError::CannotNegate {
            sign,
            kind: term.kind(),
            cursor: term.cursor(),
        }),
    }
}

/// Converts a lone term between epoch seconds and timestamps.
fn convert<'src>(term: Node<'src>, now: &mut Now<'_>) -> Result<Node<'src>, EvalError<'src>> {
    match term {
        Node::IsoTime { instant, cursor } => Ok(Node::EpochTime {
            seconds: instant_to_epoch(&instant),
            cursor,
        }),
        Node::EpochTime { .. } | Node::Period { .. } => resolve(term, now),
        term if is_now(&term) => resolve(term, now),
        term => Err(EvalError::UnexpectedNode {
            kind: term.kind(),
            cursor: term.cursor(),
        }),
    }
}

/// Turns a term into a value arithmetic applies to: a period or a timestamp.
fn resolve<'src>(term: Node<'src>, now: &mut Now<'_>) -> Result<Node<'src>, EvalError<'src>> {
    match term {
        Node::Period { .. } | Node::IsoTime { .. } => Ok(term),
        Node::EpochTime { seconds, cursor } => {
            let instant = epoch_to_instant(seconds).ok_or(EvalError::OutOfRange {
                what: "epoch time",
                cursor,
            })?;
            Ok(Node::IsoTime { instant, cursor })
        }
        term if is_now(&term) => Ok(Node::IsoTime {
            instant: now.get(),
            cursor: term.cursor(),
        }),
        term => Err(EvalError::UnexpectedNode {
            kind: term.kind(),
            cursor: term.cursor(),
        }),
    }
}

/// Applies one operator. The result takes the position of the left operand.
fn combine<'src>(
    left: Node<'src>,
    sign: Sign,
    right: Node<'src>,
) -> Result<Node<'src>, EvalError<'src>> {
    let cursor = left.cursor();
    let at = right.cursor();
    match (&left, sign, &right) {
        (Node::Period { duration: a, .. }, _, Node::Period { duration: b, .. }) => {
            let duration = match sign {
                Sign::Plus => a.checked_add(b),
                Sign::Minus => a.checked_sub(b),
            };
            period_result(duration, cursor, at)
        }
        (Node::Period { duration, .. }, Sign::Plus, Node::IsoTime { instant, .. })
        | (Node::IsoTime { instant, .. }, Sign::Plus, Node::Period { duration, .. }) => {
            instant_result(instant.checked_add_signed(*duration), cursor, at)
        }
        (Node::IsoTime { instant, .. }, Sign::Minus, Node::Period { duration, .. }) => {
            instant_result(instant.checked_sub_signed(*duration), cursor, at)
        }
        (Node::IsoTime { instant: a, .. }, Sign::Minus, Node::IsoTime { instant: b, .. }) => {
            Ok(Node::Period {
                duration: a.signed_duration_since(*b),
                cursor,
            })
        }
        _ => Err(EvalError::CannotCombine {
            left: left.kind(),
            sign,
            right: right.kind(),
            cursor: at,
        }),
    }
}

fn period_result<'src>(
    duration: Option<TimeDelta>,
    cursor: Cursor<'src>,
    at: Cursor<'src>,
) -> Result<Node<'src>, EvalError<'src>> {
    duration
        .map(|duration| Node::Period { duration, cursor })
        .ok_or(EvalError::OutOfRange {
            what: "period",
            cursor: at,
        })
}

fn instant_result<'src>(
    instant: Option<DateTime<FixedOffset>>,
    cursor: Cursor<'src>,
    at: Cursor<'src>,
) -> Result<Node<'src>, EvalError<'src>> {
    instant
        .map(|instant| Node::IsoTime { instant, cursor })
        .ok_or(EvalError::OutOfRange {
            what: "timestamp",
            cursor: at,
        })
}
