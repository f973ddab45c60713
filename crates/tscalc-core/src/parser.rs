use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::node::Node;

/// Outcome of a single parse attempt.
///
/// - `Ok(Some((node, rest)))`: matched, `rest` points past the consumed text.
/// - `Ok(None)`: this rule does not apply here; callers may try another.
/// - `Err(_)`: the input is malformed and parsing must stop.
pub type ParseResult<'src> = Result<Option<(Node<'src>, Cursor<'src>)>, ParseError<'src>>;

/// Core parser trait for the combinators.
///
/// `Display` renders a grammar-like description of the parser, which shows
/// up in trace output.
pub trait Parser: fmt::Display {
    /// Attempt to parse at the given cursor position.
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src>;
}

/// Shared handle to a parser, so one rule can appear in several places of a
/// grammar.
pub type ParserRef = Rc<dyn Parser>;

impl<P: Parser + ?Sized> Parser for Rc<P> {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        (**self).parse(input)
    }
}
