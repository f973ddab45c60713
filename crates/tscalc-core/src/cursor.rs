//! Position tracking over a single input line.

use std::fmt;

/// Immutable view into an input string.
///
/// Parsers take a cursor and hand back a new one positioned past whatever
/// they consumed; the original is never modified. Cursors are `Copy` and
/// share the borrowed input, so passing them around is free.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor<'src> {
    input: &'src str,
    /// Byte offset into `input`, always on a char boundary.
    position: usize,
}

impl<'src> Cursor<'src> {
    /// Creates a cursor at the start of `input`.
    pub const fn new(input: &'src str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns a cursor moved forward by `n` bytes.
    ///
    /// The position is clamped to the end of the input.
    #[must_use]
    pub fn advance(self, n: usize) -> Self {
        let position = (self.position + n).min(self.input.len());
        debug_assert!(
            self.input.is_char_boundary(position),
            "cursor advanced into the middle of a char"
        );
        Self {
            input: self.input,
            position,
        }
    }

    /// Whether the whole input has been consumed.
    pub const fn ended(&self) -> bool {
        self.position == self.input.len()
    }

    /// Byte offset of the cursor within the input.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The complete input line, consumed part included.
    pub const fn input(&self) -> &'src str {
        self.input
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'src str {
        &self.input[self.position..]
    }

    /// Number of chars before the cursor, for placing a marker under the input.
    pub fn column(&self) -> usize {
        self.input[..self.position].chars().count()
    }
}

/// Shows the unconsumed remainder, which is what matters when tracing a
/// parse or reporting where it stopped.
impl fmt::Display for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rest())
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("rest", &self.rest())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor_starts_at_zero() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.rest(), "abc");
        assert!(!cursor.ended());
    }

    #[test]
    fn test_advance_returns_new_cursor() {
        let start = Cursor::new("abc");
        let next = start.advance(2);

        assert_eq!(start.position(), 0);
        assert_eq!(next.position(), 2);
        assert_eq!(next.rest(), "c");
        assert_eq!(next.input(), "abc");
    }

    #[test]
    fn test_advance_past_end_is_clamped() {
        let cursor = Cursor::new("ab").advance(5);
        assert!(cursor.ended());
        assert_eq!(cursor.rest(), "");
    }

    #[test]
    fn test_empty_input_is_ended() {
        assert!(Cursor::new("").ended());
    }

    #[test]
    fn test_display_shows_remainder() {
        let cursor = Cursor::new("100 garbage").advance(3);
        assert_eq!(cursor.to_string(), " garbage");
    }

    #[test]
    fn test_column_counts_chars_not_bytes() {
        let cursor = Cursor::new("é + x").advance("é + ".len());
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.column(), 4);
    }
}
