use std::str::Chars;

pub(crate) const EOF_CHAR: char = '\0';

/// Peekable iterator over a char sequence.
///
/// Next characters can be peeked via `first` method,
/// and position can be shifted forward via `bump` method.
/// Positions are byte offsets into the text the cursor was created on.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    source: &'a str,
    /// Iterator over chars. Slightly faster than a &str.
    chars: Chars<'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Cursor<'a> {
        Cursor {
            source,
            chars: source.chars(),
        }
    }

    /// Peeks the next symbol from the input stream without consuming it.
    /// If requested position doesn't exist, `EOF_CHAR` is returned.
    /// However, getting `EOF_CHAR` doesn't always mean actual end of file,
    /// it should be checked with `is_eof` method.
    pub fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    pub fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }

    /// Checks if there is nothing more to consume.
    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Byte offset of the next character.
    pub fn pos(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    /// Text consumed since `from`.
    pub fn slice_from(&self, from: usize) -> &'a str {
        &self.source[from..self.pos()]
    }

    /// Moves to the next character.
    pub fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Eats symbols while predicate returns true or until the end of file is reached.
    pub fn bump_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
        }
    }

    /// Eats everything up to and including the first occurrence of `terminator`.
    /// Does not move and returns `false` when `terminator` never occurs.
    pub fn eat_through(&mut self, terminator: &str) -> bool {
        let rest = self.chars.as_str();
        match rest.find(terminator) {
            Some(idx) => {
                self.chars = rest[idx + terminator.len()..].chars();
                true
            }
            None => false,
        }
    }

    /// With the cursor on an opening character, eats through the first following
    /// `closer`. Nesting of the opener is not tracked: `(a(b)c)` ends after `b)`.
    ///
    /// When `single_line` is set, a line break before `closer` aborts the match.
    /// On failure nothing is consumed and `false` is returned.
    pub fn eat_enclosed(&mut self, closer: char, single_line: bool) -> bool {
        let rest = self.chars.as_str();
        if rest.is_empty() {
            return false;
        }
        let opener_len = self.first().len_utf8();
        let found = rest[opener_len..]
            .char_indices()
            .find(|&(_, c)| c == closer || (single_line && is_line_break(c)));
        match found {
            Some((idx, c)) if c == closer => {
                self.chars = rest[opener_len + idx + c.len_utf8()..].chars();
                true
            }
            _ => false,
        }
    }
}

/// Line terminators. Opaque spans never cross one.
pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod cursor_test {
    use super::Cursor;

    #[test]
    fn positions_are_bytes() {
        let mut cur = Cursor::new("äb");
        assert_eq!(cur.pos(), 0);
        cur.bump();
        assert_eq!(cur.pos(), 2);
        assert_eq!(cur.first(), 'b');
        assert_eq!(cur.slice_from(0), "ä");
    }

    #[test]
    fn enclosed_stops_at_first_closer() {
        let mut cur = Cursor::new("(a(b)c)");
        assert!(cur.eat_enclosed(')', false));
        assert_eq!(cur.slice_from(0), "(a(b)");
        assert_eq!(cur.first(), 'c');
    }

    #[test]
    fn enclosed_without_closer_does_not_move() {
        let mut cur = Cursor::new("[a, b");
        assert!(!cur.eat_enclosed(']', false));
        assert_eq!(cur.pos(), 0);

        let mut cur = Cursor::new("\"a\n\"");
        assert!(!cur.eat_enclosed('"', true));
        assert!(cur.eat_enclosed('"', false));
        assert!(cur.is_eof());
    }

    #[test]
    fn eat_through() {
        let mut cur = Cursor::new("/* x */ y");
        assert!(cur.eat_through("*/"));
        assert_eq!(cur.first(), ' ');
        assert!(!cur.eat_through("*/"));
        assert_eq!(cur.second(), 'y');
    }
}
