use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::parser::{ParseResult, Parser, ParserRef};

/// Tries alternatives in order on the same input and yields the first match.
///
/// Earlier alternatives win on ambiguous prefixes. An error from any
/// alternative stops the search.
pub struct FirstOf {
    alternatives: Vec<ParserRef>,
}

impl Parser for FirstOf {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let _span = tracing::trace_span!(
            "first_of",
            alternatives = self.alternatives.len(),
            rest = %input
        )
        .entered();
        for (i, alternative) in self.alternatives.iter().enumerate() {
            if let Some(found) = alternative.parse(input)? {
                tracing::trace!(choice = i + 1, %alternative, rest = %found.1, "first_of matched");
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl fmt::Display for FirstOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, alternative) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{alternative}")?;
        }
        f.write_str(")")
    }
}

/// Matches the first alternative that applies.
pub fn first_of(alternatives: impl IntoIterator<Item = ParserRef>) -> ParserRef {
    Rc::new(FirstOf {
        alternatives: alternatives.into_iter().collect(),
    })
}
