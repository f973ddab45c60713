//! Parser combinators.
//!
//! Each combinator is a [`Parser`](crate::Parser) built from smaller parsers,
//! and is itself usable as a building block. The lowercase constructor
//! functions return shared [`ParserRef`](crate::ParserRef) handles so a rule
//! can be reused in several places of a grammar.

mod choice;
mod literal;
mod reference;
mod sequence;
mod typed;

pub use choice::{FirstOf, first_of};
pub use literal::{Literal, Pattern, literal, regex, regex_group, try_regex, whitespace_eol};
pub use reference::{Ref, named_reference, reference};
pub use sequence::{
    Bracket, ContinuedBy, Optional, Repeated, Sequence, bracket, continued_by, optional, repeated,
    sequence,
};
pub use typed::{Flat, Typed, flat, typed};
