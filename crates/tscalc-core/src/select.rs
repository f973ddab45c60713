//! A tiny SQL-like `select` grammar over the same combinators.
//!
//! ```text
//! select-expr = "select" selector from-expr?
//! selector    = name (ws? "," ws? name)*
//! from-expr   = ws? "from" table
//! name        = "*" | [0-9]+ | identifier
//! ```
//!
//! Keywords must be followed by whitespace or the end of the line, so
//! `selectx` is not a keyword. Every interesting piece is tagged with a
//! [`SelectTag`], and [`parse_select`] reads the statement back from the tags.

use crate::combinator::{
    continued_by, literal, optional, regex, repeated, sequence, typed, whitespace_eol,
};
use crate::error::ParseError;
use crate::flatten::{Unpack, flatten_with, unpack_typed};
use crate::grammar::parse_line;
use crate::node::{Node, SelectTag, Tag};
use crate::parser::ParserRef;

const IDENTIFIER: &str = "[a-zA-Z][a-zA-Z0-9_]*";

/// A parsed `select` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement<'src> {
    /// Selected names in order; `*` and numbers included verbatim.
    pub columns: Vec<&'src str>,
    pub table: Option<&'src str>,
}

/// Builds the select grammar.
pub fn select_grammar() -> ParserRef {
    let ws = optional(regex(r"\s+"));
    let keyword =
        |word: &str, tag: SelectTag| typed(continued_by(literal(word), whitespace_eol()), tag);

    let name = typed(
        regex(&format!(r"[*]|[0-9]+|{IDENTIFIER}")),
        SelectTag::SelectorName,
    );
    let selector = typed(
        sequence([
            name.clone(),
            repeated(sequence([ws.clone(), literal(","), ws.clone(), name])),
        ]),
        SelectTag::Selector,
    );
    let from_expr = typed(
        sequence([
            ws.clone(),
            keyword("from", SelectTag::FromLit),
            ws.clone(),
            typed(regex(IDENTIFIER), SelectTag::TableName),
        ]),
        SelectTag::FromExpr,
    );

    typed(
        sequence([
            keyword("select", SelectTag::SelectLit),
            ws,
            selector,
            optional(from_expr),
        ]),
        SelectTag::SelectExpr,
    )
}

thread_local! {
    static SELECT: ParserRef = select_grammar();
}

/// Parses a select statement into its flattened, tagged tree.
///
/// Structural tags are unwrapped, whitespace and skipped optionals dropped;
/// what remains are the keywords, names and separators.
pub fn select_tree(line: &str) -> Result<Node<'_>, ParseError<'_>> {
    let tree = SELECT.with(|grammar| parse_line(grammar, line))?;
    let cursor = tree.cursor();
    let flat = flatten_with(tree, |node| match node {
        Node::Empty { .. } => Unpack::Drop,
        Node::Literal { text, .. } if text.trim().is_empty() => Unpack::Drop,
        node => unpack_typed(node),
    });
    Ok(flat.unwrap_or(Node::Empty { cursor }))
}

/// Parses a select statement.
pub fn parse_select(line: &str) -> Result<SelectStatement<'_>, ParseError<'_>> {
    let elements = match select_tree(line)? {
        Node::Sequence { elements, .. } => elements,
        other => vec![other],
    };

    let mut statement = SelectStatement {
        columns: Vec::new(),
        table: None,
    };
    for node in elements {
        let Node::Typed {
            inner,
            tag: Tag::Select(tag),
        } = node
        else {
            continue;
        };
        match tag {
            SelectTag::SelectorName => statement.columns.extend(inner.text()),
            SelectTag::TableName => statement.table = inner.text(),
            _ => {}
        }
    }
    tracing::debug!(?statement, "parsed select");
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_select_with_table() {
        let statement = parse_select("select a, b, c, d from foo").unwrap();
        assert_eq!(statement.columns, ["a", "b", "c", "d"]);
        assert_eq!(statement.table, Some("foo"));
    }

    #[test]
    fn test_select_without_table() {
        let statement = parse_select("select 1").unwrap();
        assert_eq!(statement.columns, ["1"]);
        assert_eq!(statement.table, None);

        let statement = parse_select("select *").unwrap();
        assert_eq!(statement.columns, ["*"]);
    }

    #[test]
    fn test_separators_take_optional_whitespace() {
        let statement = parse_select("select a,b ,c from t").unwrap();
        assert_eq!(statement.columns, ["a", "b", "c"]);
        assert_eq!(statement.table, Some("t"));
    }

    #[test]
    fn test_flattened_tree_keeps_tags() {
        assert_snapshot!(
            select_tree("select a, b from foo").unwrap(),
            @r#"[("select"):select_lit ("a"):selector_name "," ("b"):selector_name ("from"):from_lit ("foo"):table_name]"#
        );
    }

    #[test]
    fn test_keywords_need_a_boundary() {
        assert!(matches!(
            parse_select("selectx a"),
            Err(ParseError::NoMatch { .. })
        ));

        let err = parse_select("select a fromage").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { cursor } if cursor.rest() == " fromage"));
    }

    #[test]
    fn test_incomplete_statements_fail() {
        assert!(matches!(
            parse_select("select"),
            Err(ParseError::NoMatch { .. })
        ));
        let err = parse_select("select a from").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { cursor } if cursor.rest() == " from"));
    }

    #[test]
    fn test_table_name_can_look_like_a_keyword() {
        let statement = parse_select("select fromage from select_log").unwrap();
        assert_eq!(statement.columns, ["fromage"]);
        assert_eq!(statement.table, Some("select_log"));
    }
}
