use std::sync::OnceLock;

use regex::Regex;

use super::cursor::Cursor;
use super::{is_combinator, is_word_char};

/// Optional `.`/`#` prefix, then an identifier made of [`is_word_char`]
/// characters and hyphens.
fn main_token_regex() -> &'static Regex {
    static MAIN_TOKEN: OnceLock<Regex> = OnceLock::new();
    MAIN_TOKEN.get_or_init(|| {
        Regex::new(r"^([.#]?)(-?[_A-Za-z][_A-Za-z0-9-]*)").expect("main token pattern compiles")
    })
}

/// The identifier a selector is indexed under, without its `.`/`#` prefix.
///
/// `raw` is the selector as written, `full` after nesting resolution. Returns
/// `None` when the selector only decorates its parent (`&:hover`, `&[open]`) or
/// when its rightmost compound starts with a tag that is not the whole selector
/// (`.nav li`).
pub fn main_name<'a>(raw: &str, full: &'a str) -> Option<&'a str> {
    if is_parent_reference(rightmost_segment(raw)) {
        return None;
    }

    let segment = rightmost_segment(full);
    let captures = main_token_regex().captures(segment)?;
    let prefix = captures.get(1).map_or("", |m| m.as_str());
    if prefix.is_empty() && segment.len() < full.len() {
        return None;
    }
    captures.get(2).map(|m| m.as_str())
}

/// `&` followed by nothing or by a non-word character.
fn is_parent_reference(segment: &str) -> bool {
    segment
        .strip_prefix('&')
        .is_some_and(|rest| rest.chars().next().map_or(true, |c| !is_word_char(c)))
}

/// The compound after the last whitespace or `>`, `+`, `~` combinator.
/// `[...]` and `(...)` are skipped up to their first closer.
pub(crate) fn rightmost_segment(selector: &str) -> &str {
    let mut cur = Cursor::new(selector);
    let mut start = 0;
    while !cur.is_eof() {
        match cur.first() {
            '[' if cur.eat_enclosed(']', false) => {}
            '(' if cur.eat_enclosed(')', false) => {}
            c if c.is_whitespace() || is_combinator(c) => {
                cur.bump();
                start = cur.pos();
            }
            _ => {
                cur.bump();
            }
        }
    }
    &selector[start..]
}

#[cfg(test)]
mod main_name_test {
    use super::{main_name, rightmost_segment};

    fn assert_main(raw: &str, full: &str, expected: Option<&str>) {
        assert_eq!(main_name(raw, full), expected, "main name of `{raw}` resolved as `{full}`");
    }

    #[test]
    fn rightmost() {
        assert_eq!(rightmost_segment(".a .b"), ".b");
        assert_eq!(rightmost_segment(".a>.b"), ".b");
        assert_eq!(rightmost_segment(".a + .b ~ li.c"), "li.c");
        assert_eq!(rightmost_segment("a[data-x~=\"1 2\"]"), "a[data-x~=\"1 2\"]");
        assert_eq!(rightmost_segment(".a:not(.b > .c)"), ".a:not(.b > .c)");
        assert_eq!(rightmost_segment(".a >"), "");
    }

    #[test]
    fn class_and_id() {
        assert_main(".a", ".a", Some("a"));
        assert_main("#main", "#main", Some("main"));
        assert_main(".b", ".a .b", Some("b"));
        assert_main(".a .b", ".a .b", Some("b"));
        assert_main(".btn-primary:hover", ".btn-primary:hover", Some("btn-primary"));
        assert_main("ul > li.item", "ul > li.item", None);
        assert_main(".-x", ".-x", Some("-x"));
    }

    #[test]
    fn bare_tag_only_when_whole_selector() {
        assert_main("div", "div", Some("div"));
        assert_main("h1:first-child", "h1:first-child", Some("h1"));
        assert_main("div", ".a div", None);
        assert_main(".nav li", ".nav li", None);
    }

    #[test]
    fn parent_reference_has_no_main() {
        assert_main("&:hover", ".a:hover", None);
        assert_main("&.active", ".a.active", None);
        assert_main("&", ".a", None);
        assert_main(".b &", ".b .a", None);
        assert_main("&-item", ".a-item", None);
        assert_main("& .b", ".a .b", Some("b"));
        assert_main("&_x", ".a_x", Some("a_x"));
    }

    #[test]
    fn word_characters_are_ascii_on_both_sides() {
        // `é` is not a word character, so `&é` only decorates its parent
        assert_main("&é", ".aé", None);
        assert_main(".é", ".é", None);
        assert_main(".aé", ".aé", Some("a"));
        assert_main("&_x1", ".a_x1", Some("a_x1"));
    }

    #[test]
    fn nothing_to_match() {
        assert_main("*", "*", None);
        assert_main("[type=text]", "[type=text]", None);
        assert_main(":root", ":root", None);
        assert_main("0%", "0%", None);
        assert_main(".a >", ".a >", None);
    }
}
