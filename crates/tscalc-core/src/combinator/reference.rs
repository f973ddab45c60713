use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::parser::{ParseResult, Parser, ParserRef};

/// Forward reference to a parser that is bound after construction.
///
/// Recursive grammars use a `Ref` in place of the rule being defined and bind
/// it once the rule exists. The target is held strongly, so rules that are
/// only reachable through a `Ref` live as long as the grammar that uses them.
pub struct Ref {
    name: Option<String>,
    target: RefCell<Option<ParserRef>>,
}

impl Ref {
    /// Points this reference at `target`, replacing any earlier binding.
    pub fn bind(&self, target: &ParserRef) {
        *self.target.borrow_mut() = Some(Rc::clone(target));
    }

    pub fn is_bound(&self) -> bool {
        self.target.borrow().is_some()
    }

    fn resolve(&self) -> Option<ParserRef> {
        self.target.borrow().clone()
    }
}

impl Parser for Ref {
    fn parse<'src>(&self, input: Cursor<'src>) -> ParseResult<'src> {
        let Some(target) = self.resolve() else {
            return Err(ParseError::UnboundRef {
                name: self.to_string(),
                cursor: input,
            });
        };
        target.parse(input)
    }
}

/// Prints the name only; printing the target would recurse forever.
impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or("<ref>"))
    }
}

/// Creates an unbound reference.
pub fn reference() -> Rc<Ref> {
    Rc::new(Ref {
        name: None,
        target: RefCell::new(None),
    })
}

/// Creates an unbound reference shown as `name` in grammar descriptions.
pub fn named_reference(name: &str) -> Rc<Ref> {
    Rc::new(Ref {
        name: Some(name.to_string()),
        target: RefCell::new(None),
    })
}
