use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::flatten::flatten;
use crate::node::{Node, Tag};
use crate::parser::{ParseResult, Parser, ParserRef};

/// Labels whatever the inner parser produces.
///
/// In `2 / 5` both numbers have the same shape; tagging one as numerator and
/// the other as denominator lets later passes tell them apart. Matching
/// behaviour is unchanged.
pub struct Typed {
    parser: ParserRef,
    tag: Tag,
}

impl Parser for Typed {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let found = self.parser.parse(input)?;
        Ok(found.map(|(node, rest)| {
            let node = Node::Typed {
                inner: Box::new(node),
                tag: self.tag,
            };
            (node, rest)
        }))
    }
}

impl fmt::Display for Typed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tag, self.parser)
    }
}

/// Flattens nested sequences in whatever the inner parser produces.
pub struct Flat {
    parser: ParserRef,
}

impl Parser for Flat {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let found = self.parser.parse(input)?;
        Ok(found.map(|(node, rest)| (flatten(node), rest)))
    }
}

impl fmt::Display for Flat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parser)
    }
}

/// Wraps the result of `parser` in a [`Node::Typed`] carrying `tag`.
pub fn typed(parser: ParserRef, tag: impl Into<Tag>) -> ParserRef {
    Rc::new(Typed {
        parser,
        tag: tag.into(),
    })
}

/// Flattens the result of `parser`, see [`flatten`].
pub fn flat(parser: ParserRef) -> ParserRef {
    Rc::new(Flat { parser })
}
