use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::node::Node;
use crate::parser::{ParseResult, Parser, ParserRef};

use super::literal::regex;

/// Applies parsers one after another.
///
/// Matches only if every parser matches; otherwise nothing is consumed.
pub struct Sequence {
    parsers: Vec<ParserRef>,
}

impl Parser for Sequence {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let _span = tracing::trace_span!("sequence", parsers = self.parsers.len(), rest = %input)
            .entered();
        let mut elements = Vec::with_capacity(self.parsers.len());
        let mut cursor = input;
        for (i, parser) in self.parsers.iter().enumerate() {
            let Some((node, rest)) = parser.parse(cursor)? else {
                tracing::trace!(step = i + 1, %parser, "sequence broken");
                return Ok(None);
            };
            elements.push(node);
            cursor = rest;
        }
        let node = Node::Sequence {
            elements,
            cursor: input,
        };
        Ok(Some((node, cursor)))
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, parser) in self.parsers.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{parser}")?;
        }
        f.write_str(")")
    }
}

/// Yields an empty node instead of failing when the inner parser does not match.
pub struct Optional {
    parser: ParserRef,
}

impl Parser for Optional {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        match self.parser.parse(input)? {
            Some(found) => Ok(Some(found)),
            None => Ok(Some((Node::Empty { cursor: input }, input))),
        }
    }
}

impl fmt::Display for Optional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.parser)
    }
}

/// Applies a parser as many times as it matches, zero included.
pub struct Repeated {
    parser: ParserRef,
}

impl Parser for Repeated {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let _span = tracing::trace_span!("repeated", parser = %self.parser).entered();
        let mut elements = Vec::new();
        let mut cursor = input;
        while !cursor.ended() {
            let Some((node, rest)) = self.parser.parse(cursor)? else {
                break;
            };
            elements.push(node);
            // A match that consumes nothing would match forever.
            if rest.position() == cursor.position() {
                break;
            }
            cursor = rest;
        }
        tracing::trace!(count = elements.len(), "repeated done");
        let node = Node::Sequence {
            elements,
            cursor: input,
        };
        Ok(Some((node, cursor)))
    }
}

impl fmt::Display for Repeated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*", self.parser)
    }
}

/// Yields the main parser's node only if the continuation matches right after it.
///
/// The continuation's text is consumed, its node is dropped.
pub struct ContinuedBy {
    main: ParserRef,
    continuation: ParserRef,
}

impl Parser for ContinuedBy {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some((node, rest)) = self.main.parse(input)? else {
            return Ok(None);
        };
        match self.continuation.parse(rest)? {
            Some((_, after)) => Ok(Some((node, after))),
            None => Ok(None),
        }
    }
}

impl fmt::Display for ContinuedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (?={})", self.main, self.continuation)
    }
}

/// Matches `inner` between parentheses, tolerating whitespace inside them.
pub struct Bracket {
    inner: ParserRef,
    sequence: Sequence,
}

impl Parser for Bracket {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some((node, rest)) = self.sequence.parse(input)? else {
            return Ok(None);
        };
        let Node::Sequence { elements, .. } = node else {
            return Ok(None);
        };
        Ok(elements.into_iter().nth(1).map(|inner| (inner, rest)))
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"(\" {} \")\"", self.inner)
    }
}

/// Matches every parser in order.
pub fn sequence(parsers: impl IntoIterator<Item = ParserRef>) -> ParserRef {
    Rc::new(Sequence {
        parsers: parsers.into_iter().collect(),
    })
}

/// Matches `parser` or yields [`Node::Empty`] without consuming input.
pub fn optional(parser: ParserRef) -> ParserRef {
    Rc::new(Optional { parser })
}

/// Matches `parser` zero or more times.
pub fn repeated(parser: ParserRef) -> ParserRef {
    Rc::new(Repeated { parser })
}

/// Matches `main` only when followed by `continuation`.
pub fn continued_by(main: ParserRef, continuation: ParserRef) -> ParserRef {
    Rc::new(ContinuedBy { main, continuation })
}

/// Matches `( inner )`.
pub fn bracket(inner: ParserRef) -> ParserRef {
    let sequence = Sequence {
        parsers: vec![regex(r"\(\s*"), Rc::clone(&inner), regex(r"\s*\)")],
    };
    Rc::new(Bracket { inner, sequence })
}
