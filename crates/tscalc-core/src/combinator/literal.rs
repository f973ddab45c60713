use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::cursor::Cursor;
use crate::node::Node;
use crate::parser::{ParseResult, Parser, ParserRef};

/// Matches an exact string at the cursor.
pub struct Literal {
    exact: String,
}

impl Literal {
    pub fn new(exact: impl Into<String>) -> Self {
        Self {
            exact: exact.into(),
        }
    }
}

impl Parser for Literal {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        tracing::trace!(parser = %self, rest = %input, "literal");
        let rest = input.rest();
        if !rest.starts_with(self.exact.as_str()) {
            return Ok(None);
        }
        let len = self.exact.len();
        let node = Node::Literal {
            text: &rest[..len],
            cursor: input,
        };
        Ok(Some((node, input.advance(len))))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.exact)
    }
}

/// Matches a regular expression anchored at the cursor.
///
/// The whole match is always consumed; `group` selects which capture group
/// becomes the text of the resulting literal node (0 for the whole match).
pub struct Pattern {
    regex: Regex,
    group: usize,
}

impl Pattern {
    /// Compiles `pattern`, anchoring it at the start of the remaining input
    /// unless it already begins with `^`.
    pub fn new(pattern: &str, group: usize) -> Result<Self, regex::Error> {
        let anchored = if pattern.starts_with('^') {
            pattern.to_string()
        } else {
            format!("^(?:{pattern})")
        };
        Ok(Self {
            regex: Regex::new(&anchored)?,
            group,
        })
    }
}

impl Parser for Pattern {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let rest = input.rest();
        let Some(captures) = self.regex.captures(rest) else {
            tracing::trace!(parser = %self, rest = %input, "regex did not match");
            return Ok(None);
        };
        let consumed = captures.get(0).map_or(0, |m| m.end());
        // A group that did not take part in the match yields empty text.
        let text = captures.get(self.group).map_or("", |m| m.as_str());
        tracing::trace!(parser = %self, matched = text, "regex matched");
        let node = Node::Literal {
            text,
            cursor: input,
        };
        Ok(Some((node, input.advance(consumed))))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.regex.as_str())
    }
}

/// Matches `exact` literally.
pub fn literal(exact: &str) -> ParserRef {
    Rc::new(Literal::new(exact))
}

/// Matches `pattern` and yields the whole match.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression. Grammar patterns
/// are fixed in the source; use [`try_regex`] for patterns built at runtime.
pub fn regex(pattern: &str) -> ParserRef {
    compile(pattern, 0)
}

/// Matches `pattern` and yields its first capture group.
///
/// # Panics
///
/// Panics if `pattern` is not a valid regular expression.
pub fn regex_group(pattern: &str) -> ParserRef {
    compile(pattern, 1)
}

/// Like [`regex`], returning the compile error instead of panicking.
pub fn try_regex(pattern: &str) -> Result<ParserRef, regex::Error> {
    Ok(Rc::new(Pattern::new(pattern, 0)?))
}

/// Matches a run of whitespace, or the end of the input.
pub fn whitespace_eol() -> ParserRef {
    regex(r"\s+|$")
}

fn compile(pattern: &str, group: usize) -> ParserRef {
    match Pattern::new(pattern, group) {
        Ok(parser) => Rc::new(parser),
        Err(err) => panic!("invalid grammar pattern {pattern:?}: {err}"),
    }
}
