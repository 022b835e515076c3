use crate::dialect::Dialect;

use super::cursor::Cursor;
use super::is_word_char;

/// The SCSS at-rule that is split off from the selectors following it.
pub const AT_ROOT: &str = "@at-root";

/// One atomic name a block was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// Text as written in the source, whitespace collapsed.
    pub raw: String,
    /// Fully qualified form after combining with ancestor selectors.
    pub full: String,
    /// `false` for at-rule text and for anything inside a deep-ignored block.
    pub is_selector: bool,
}

impl Name {
    pub fn new(raw: impl Into<String>, is_selector: bool) -> Self {
        let raw = raw.into();
        Self {
            full: raw.clone(),
            raw,
            is_selector,
        }
    }

    /// Copy of this name that resolves to `full`.
    pub(crate) fn with_full(&self, full: String) -> Self {
        Self {
            raw: self.raw.clone(),
            full,
            is_selector: self.is_selector,
        }
    }
}

/// Splits the (trimmed, whitespace collapsed) text in front of a `{` into names.
///
/// At-rules are kept whole, except SCSS `@at-root` which is emitted on its own
/// and followed by the selectors written after it.
pub fn split_names(text: &str, dialect: Dialect, ignore_deep: u32) -> Vec<Name> {
    let mut names = Vec::new();
    let mut selectors = text;

    if let Some(keyword) = at_keyword(text) {
        if dialect.capabilities().supports_at_root_escape && keyword == AT_ROOT {
            names.push(Name::new(keyword, false));
            selectors = text[keyword.len()..].trim_start();
        } else {
            names.push(Name::new(text, false));
            return names;
        }
    }

    let is_selector = ignore_deep == 0;
    names.extend(
        split_top_level_commas(selectors)
            .into_iter()
            .map(|piece| Name::new(piece, is_selector)),
    );
    return names;
}

/// `@` followed by word characters or hyphens, at the very start of `text`.
fn at_keyword(text: &str) -> Option<&str> {
    let rest = text.strip_prefix('@')?;
    let len = rest
        .find(|c: char| !(is_word_char(c) || c == '-'))
        .unwrap_or(rest.len());
    (len > 0).then(|| &text[..len + 1])
}

/// Comma separated pieces, trimmed, empty ones dropped.
///
/// `[...]` and `(...)` are skipped over up to their first closer, so a `]`
/// inside a quoted attribute value ends the attribute early.
fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut cur = Cursor::new(text);
    let mut start = 0;

    while !cur.is_eof() {
        match cur.first() {
            '[' if cur.eat_enclosed(']', false) => {}
            '(' if cur.eat_enclosed(')', false) => {}
            ',' => {
                pieces.push(cur.slice_from(start));
                cur.bump();
                start = cur.pos();
            }
            _ => {
                cur.bump();
            }
        }
    }
    pieces.push(cur.slice_from(start));

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod names_test {
    use super::{split_names, Name};
    use crate::dialect::Dialect;

    fn assert_names(text: &str, dialect: Dialect, ignore_deep: u32, expected: &[(&str, bool)]) {
        let names = split_names(text, dialect, ignore_deep);
        let actual = names
            .iter()
            .map(|n| (n.raw.as_str(), n.is_selector))
            .collect::<Vec<_>>();
        assert_eq!(actual, expected, "splitting `{text}` as {dialect}");
        assert!(
            names.iter().all(|n| n.raw == n.full),
            "freshly split names should not be resolved yet: {names:?}"
        );
    }

    #[test]
    fn selector_list() {
        assert_names(".a", Dialect::Css, 0, &[(".a", true)]);
        assert_names(".a, .b", Dialect::Css, 0, &[(".a", true), (".b", true)]);
        assert_names("h1,h2 , h3", Dialect::Css, 0, &[("h1", true), ("h2", true), ("h3", true)]);
        assert_names(".a, .b,", Dialect::Css, 0, &[(".a", true), (".b", true)]);
        assert_names(".a,,.b", Dialect::Less, 0, &[(".a", true), (".b", true)]);
    }

    #[test]
    fn brackets_and_parens_are_atomic() {
        assert_names(
            "a[title=\"x,y\"], b",
            Dialect::Css,
            0,
            &[("a[title=\"x,y\"]", true), ("b", true)],
        );
        assert_names(
            ".a:not(.b, .c), .d",
            Dialect::Css,
            0,
            &[(".a:not(.b, .c)", true), (".d", true)],
        );
        assert_names(".m(@a, @b)", Dialect::Less, 0, &[(".m(@a, @b)", true)]);
        // unbalanced bracket is an ordinary character
        assert_names("a[x, b", Dialect::Css, 0, &[("a[x", true), ("b", true)]);
    }

    #[test]
    fn quoted_bracket_ends_attribute_early() {
        assert_names(
            "a[x=\"],\"], b",
            Dialect::Css,
            0,
            &[("a[x=\"]", true), ("\"]", true), ("b", true)],
        );
    }

    #[test]
    fn at_rules_are_kept_whole() {
        assert_names("@media screen, print", Dialect::Css, 0, &[("@media screen, print", false)]);
        assert_names("@keyframes spin", Dialect::Scss, 0, &[("@keyframes spin", false)]);
        assert_names("@-webkit-keyframes x", Dialect::Less, 0, &[("@-webkit-keyframes x", false)]);
        assert_names("@at-root .a", Dialect::Less, 0, &[("@at-root .a", false)]);
        assert_names("@at-root .a", Dialect::Css, 0, &[("@at-root .a", false)]);
    }

    #[test]
    fn scss_at_root_splits_remainder() {
        assert_names(
            "@at-root .a, .b",
            Dialect::Scss,
            0,
            &[("@at-root", false), (".a", true), (".b", true)],
        );
        assert_names("@at-root", Dialect::Scss, 0, &[("@at-root", false)]);
        assert_names("@at-rooted .a", Dialect::Scss, 0, &[("@at-rooted .a", false)]);
    }

    #[test]
    fn deep_ignored_names_are_not_selectors() {
        assert_names("0%", Dialect::Css, 1, &[("0%", false)]);
        assert_names("from, to", Dialect::Scss, 2, &[("from", false), ("to", false)]);
    }

    #[test]
    fn lone_at_sign_is_not_an_at_rule() {
        assert_names("@", Dialect::Css, 0, &[("@", true)]);
        assert_eq!(Name::new("@", true).full, "@");
    }
}
