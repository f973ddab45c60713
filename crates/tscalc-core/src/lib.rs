//! tscalc-core: parser combinators and timestamp arithmetic.
//!
//! A line such as `now - 1h30m` or `1700000000 + 15m` is parsed into a
//! [`Node`] tree by a [`Grammar`] assembled from the [`combinator`] module,
//! then reduced to a single value by [`evaluate`]:
//!
//! - period ± period is a period
//! - timestamp ± period is a timestamp
//! - timestamp − timestamp is a period
//!
//! A line holding a single term converts it instead: epoch seconds print as
//! an ISO timestamp and an ISO timestamp prints as epoch seconds. `now` is
//! read from an injected [`Clock`].

pub mod combinator;
pub mod cursor;
pub mod error;
pub mod eval;
pub mod flatten;
pub mod grammar;
pub mod node;
pub mod parser;
pub mod select;
pub mod time;

pub use cursor::Cursor;
pub use error::{Error, EvalError, ParseError};
pub use eval::{Clock, FixedClock, Sign, SystemClock, calculate, evaluate};
pub use flatten::{Unpack, flatten, flatten_typed, flatten_with};
pub use grammar::{Grammar, parse};
pub use node::{ExprTag, Node, SelectTag, Tag};
pub use parser::{ParseResult, Parser, ParserRef};
pub use select::{SelectStatement, parse_select};
