//! Post-processing that collapses nested sequences into flat lists.
//!
//! Grammars built from small combinators produce deeply nested sequences
//! whose nesting says nothing about meaning. Flattening them first keeps the
//! code walking the tree simple.

use crate::node::Node;

/// What [`flatten_with`] should do with a node.
#[derive(Debug)]
pub enum Unpack<'src> {
    /// Leave the node out.
    Drop,
    /// Use the node as is, without looking inside it.
    Keep(Node<'src>),
    /// Replace the node by these children, each flattened in turn.
    Splice(Vec<Node<'src>>),
}

/// Flattens `node` according to `unpack`.
///
/// If the root itself is spliced, the result is a single sequence carrying
/// the root's cursor. If the root is dropped, the result is `None`.
pub fn flatten_with<'src, F>(node: Node<'src>, unpack: F) -> Option<Node<'src>>
where
    F: Fn(Node<'src>) -> Unpack<'src>,
{
    let cursor = node.cursor();
    match unpack(node) {
        Unpack::Drop => None,
        Unpack::Keep(node) => Some(node),
        Unpack::Splice(children) => {
            let mut elements = Vec::with_capacity(children.len());
            for child in children {
                splice_into(child, &unpack, &mut elements);
            }
            Some(Node::Sequence { elements, cursor })
        }
    }
}

fn splice_into<'src, F>(node: Node<'src>, unpack: &F, out: &mut Vec<Node<'src>>)
where
    F: Fn(Node<'src>) -> Unpack<'src>,
{
    match unpack(node) {
        Unpack::Drop => {}
        Unpack::Keep(node) => out.push(node),
        Unpack::Splice(children) => {
            for child in children {
                splice_into(child, unpack, out);
            }
        }
    }
}

/// Splices every nested sequence into one flat sequence.
///
/// Typed nodes are left alone, sequences inside them included.
pub fn flatten(node: Node<'_>) -> Node<'_> {
    let cursor = node.cursor();
    flatten_with(node, |node| match node {
        Node::Sequence { elements, .. } => Unpack::Splice(elements),
        other => Unpack::Keep(other),
    })
    .unwrap_or(Node::Empty { cursor })
}

/// Like [`flatten`], but also unwraps typed sequences.
///
/// A typed node wrapping a sequence loses its tag and its elements are
/// spliced in; typed nodes wrapping anything else are kept.
pub fn flatten_typed(node: Node<'_>) -> Node<'_> {
    let cursor = node.cursor();
    flatten_with(node, unpack_typed).unwrap_or(Node::Empty { cursor })
}

/// The [`flatten_typed`] policy, for callers that extend it.
pub fn unpack_typed(node: Node<'_>) -> Unpack<'_> {
    match node {
        Node::Sequence { elements, .. } => Unpack::Splice(elements),
        Node::Typed { inner, tag } => match *inner {
            Node::Sequence { elements, .. } => Unpack::Splice(elements),
            inner => Unpack::Keep(Node::Typed {
                inner: Box::new(inner),
                tag,
            }),
        },
        other => Unpack::Keep(other),
    }
}
