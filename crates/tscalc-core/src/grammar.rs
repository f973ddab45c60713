//! The timestamp expression grammar.
//!
//! ```text
//! term        = period | iso-time | "now" | epoch-time
//! signed-term = ws? sign ws? term
//! expr        = ws? (sign ws? period | term) signed-term*
//! ```
//!
//! Alternatives are tried in order, so `1m` is a period and never the epoch
//! time `1` followed by garbage.

use std::fmt;

use crate::combinator::{first_of, literal, optional, regex, repeated, sequence, typed};
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::node::{ExprTag, Node};
use crate::parser::{Parser, ParserRef};
use crate::time::{epoch_time, iso_time, period};

/// A ready to use grammar for one line of input.
pub struct Grammar {
    root: ParserRef,
}

impl Grammar {
    /// Sums and differences of periods, timestamps and `now`.
    pub fn expression() -> Self {
        let ws = optional(regex(r"\s+"));
        let sign = typed(regex("[+-]"), ExprTag::Sign);
        let term = term();

        let head = first_of([
            sequence([sign.clone(), ws.clone(), period()]),
            term.clone(),
        ]);
        let signed_term = sequence([ws.clone(), sign, ws.clone(), term]);

        Self {
            root: sequence([ws, head, repeated(signed_term)]),
        }
    }

    /// A single term without arithmetic, for plain format conversion.
    pub fn single_term() -> Self {
        Self {
            root: sequence([optional(regex(r"\s+")), term()]),
        }
    }

    /// Parses a whole line.
    ///
    /// Fails with [`ParseError::NoMatch`] if the grammar does not apply at
    /// all, and with [`ParseError::TrailingInput`] if anything but
    /// whitespace is left once it stops matching.
    pub fn parse<'src>(&self, line: &'src str) -> Result<Node<'src>, ParseError<'src>> {
        parse_line(&self.root, line)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::expression()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

fn term() -> ParserRef {
    first_of([
        period(),
        iso_time(),
        typed(literal("now"), ExprTag::Now),
        epoch_time(),
    ])
}

/// Runs `parser` over a whole line, applying the top-level failure policy
/// shared by every grammar.
pub(crate) fn parse_line<'src>(
    parser: &dyn Parser,
    line: &'src str,
) -> Result<Node<'src>, ParseError<'src>> {
    let _span = tracing::debug_span!("parse", line).entered();
    let start = Cursor::new(line);
    let Some((node, rest)) = parser.parse(start)? else {
        tracing::debug!("no match");
        return Err(ParseError::NoMatch { cursor: start });
    };
    if !rest.rest().trim().is_empty() {
        tracing::debug!(%rest, "trailing input");
        return Err(ParseError::TrailingInput { cursor: rest });
    }
    tracing::debug!(%node, "parsed");
    Ok(node)
}

thread_local! {
    static EXPRESSION: Grammar = Grammar::expression();
}

/// Parses `line` with the expression grammar.
///
/// The grammar is built once per thread.
pub fn parse(line: &str) -> Result<Node<'_>, ParseError<'_>> {
    EXPRESSION.with(|grammar| grammar.parse(line))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_sum_of_periods_tree() {
        assert_snapshot!(parse("1m + 1s").unwrap(), @r#"[<empty> 1m [[" " ("+"):sign " " 1s]]]"#);
    }

    #[test]
    fn test_leading_sign_tree() {
        assert_snapshot!(
            parse("-4h + now").unwrap(),
            @r#"[<empty> [("-"):sign <empty> 4h] [[" " ("+"):sign " " ("now"):now]]]"#
        );
    }

    #[test]
    fn test_single_epoch_tree() {
        assert_snapshot!(parse("100").unwrap(), @"[<empty> 100.000000 []]");
    }

    #[test]
    fn test_compact_operators() {
        assert_snapshot!(
            parse("now-1h").unwrap(),
            @r#"[<empty> ("now"):now [[<empty> ("-"):sign <empty> 1h]]]"#
        );
    }

    #[test]
    fn test_grammar_display() {
        assert_snapshot!(
            Grammar::single_term(),
            @r#"([/^(?:\s+)/] (<period> | <iso-time> | now("now") | <epoch-time>))"#
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_accepted() {
        assert!(parse("  1m + 1s  ").is_ok());
        assert!(parse("\t100\n").is_ok());
    }

    #[test]
    fn test_empty_line_is_no_match() {
        let err = parse("").unwrap_err();
        assert_eq!(
            err,
            ParseError::NoMatch {
                cursor: Cursor::new("")
            }
        );
        assert!(matches!(parse("   "), Err(ParseError::NoMatch { .. })));
        assert!(matches!(parse("later"), Err(ParseError::NoMatch { .. })));
    }

    #[test]
    fn test_trailing_garbage_reports_remainder() {
        let err = parse("100 garbage").unwrap_err();
        let ParseError::TrailingInput { cursor } = err else {
            panic!("expected trailing input, got {err:?}");
        };
        assert_eq!(cursor.rest(), " garbage");
        assert_eq!(cursor.column(), 3);
    }

    #[test]
    fn test_dangling_operator_is_trailing_input() {
        let err = parse("1s +").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { cursor } if cursor.rest() == " +"));
    }

    #[test]
    fn test_only_periods_take_a_leading_sign() {
        assert!(matches!(parse("-now"), Err(ParseError::NoMatch { .. })));
        assert!(matches!(parse("-100"), Err(ParseError::NoMatch { .. })));
    }

    #[test]
    fn test_malformed_timestamp_is_hard_error() {
        let err = parse("1h + 2020-13-40T99:99:99+00:00").unwrap_err();
        assert!(matches!(err, ParseError::InvalidTimestamp { .. }));
        assert_eq!(err.cursor().column(), 5);
    }

    #[test]
    fn test_single_term_rejects_arithmetic() {
        let grammar = Grammar::single_term();
        assert!(grammar.parse(" 2024-01-01T00:00:00+00:00").is_ok());
        let err = grammar.parse("1m + 1s").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { cursor } if cursor.rest() == " + 1s"));
    }

    #[test]
    fn test_now_is_case_sensitive() {
        assert!(parse("NOW").is_err());
    }
}
