//! Heuristic, single pass extraction of rule and at-rule blocks from css, less
//! and scss text.
//!
//! This does not build a syntax tree. It only finds where each `{ ... }` block
//! starts and ends, and which fully qualified selectors the block stands for,
//! which is what outline, symbol lookup and hover need.

mod cursor;
pub mod main_name;
pub mod names;
pub mod nesting;
pub mod scanner;

use serde::Serialize;
use tower_lsp::lsp_types::{Position, Range};

use crate::dialect::Dialect;

pub use main_name::main_name;
pub use names::{split_names, Name};
pub use nesting::resolve_nesting;
pub use scanner::{scan, Block};

/// The document a range parse reads from.
pub trait TextDocument {
    fn text(&self) -> &str;

    /// Editor language identifier, e.g. `scss`.
    fn language_id(&self) -> &str;

    /// Documents that keep their dialect around should return it here, so the
    /// language id is not coerced again on every parse.
    fn dialect(&self) -> Dialect {
        Dialect::from_language_id(self.language_id())
    }

    /// Position of a byte offset into [`TextDocument::text`].
    fn offset_to_position(&self, offset: usize) -> Position;
}

/// A resolved selector and the identifier it is indexed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullMainName {
    pub full: String,
    /// Empty when the selector has no main identifier.
    pub main: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRange {
    pub names: Vec<FullMainName>,
    /// From the opening `{` to just past the closing `}`.
    pub range: Range,
    /// The selector text in front of `{`.
    pub selector_range: Range,
    /// Index of the range that was active when this one opened.
    pub parent: Option<usize>,
}

/// Parses `document` into one [`NamedRange`] per block, in source order.
pub fn parse_named_ranges(document: &(impl TextDocument + ?Sized)) -> Vec<NamedRange> {
    let dialect = document.dialect();
    let blocks = scan(document.text(), dialect);
    tracing::trace!(%dialect, blocks = blocks.len(), "scanned named ranges");
    format_ranges(&blocks, document)
}

/// Resolves main names and positions for scanned blocks. Order is kept.
pub fn format_ranges(blocks: &[Block], document: &(impl TextDocument + ?Sized)) -> Vec<NamedRange> {
    let range = |span: std::ops::Range<usize>| Range {
        start: document.offset_to_position(span.start),
        end: document.offset_to_position(span.end),
    };

    blocks
        .iter()
        .map(|block| NamedRange {
            names: block.names.iter().map(full_main_name).collect(),
            range: range(block.span()),
            selector_range: range(block.selector.clone()),
            parent: block.parent,
        })
        .collect()
}

fn full_main_name(name: &Name) -> FullMainName {
    let main = if name.is_selector {
        main_name(&name.raw, &name.full).unwrap_or_default()
    } else {
        ""
    };
    FullMainName {
        full: name.full.clone(),
        main: main.to_owned(),
    }
}

/// ASCII word character, `[A-Za-z0-9_]`. Identifiers are matched with the same set.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Selector combinators other than whitespace.
pub(crate) fn is_combinator(c: char) -> bool {
    matches!(c, '>' | '+' | '~')
}

#[cfg(test)]
mod range_parser_test {
    use tower_lsp::lsp_types::Position;

    use super::{parse_named_ranges, FullMainName, NamedRange, TextDocument};

    /// Single line document where positions are plain byte columns.
    struct Doc<'a> {
        text: &'a str,
        language_id: &'a str,
    }

    impl TextDocument for Doc<'_> {
        fn text(&self) -> &str {
            self.text
        }

        fn language_id(&self) -> &str {
            self.language_id
        }

        fn offset_to_position(&self, offset: usize) -> Position {
            let line = self.text[..offset].matches('\n').count() as u32;
            let line_start = self.text[..offset].rfind('\n').map_or(0, |i| i + 1);
            Position::new(line, (offset - line_start) as u32)
        }
    }

    fn parse(text: &str, language_id: &str) -> Vec<NamedRange> {
        parse_named_ranges(&Doc { text, language_id })
    }

    fn names(range: &NamedRange) -> Vec<(&str, &str)> {
        range
            .names
            .iter()
            .map(|FullMainName { full, main }| (full.as_str(), main.as_str()))
            .collect()
    }

    #[test]
    fn plain_rule() {
        let ranges = parse(".a { color: red; }", "css");
        assert_eq!(ranges.len(), 1);
        assert_eq!(names(&ranges[0]), [(".a", "a")]);
        assert_eq!(ranges[0].range.start, Position::new(0, 3));
        assert_eq!(ranges[0].range.end, Position::new(0, 18));
        assert_eq!(ranges[0].selector_range.end, Position::new(0, 2));
    }

    #[test]
    fn nested_parent_reference() {
        let ranges = parse(".a { &:hover { color: red; } }", "scss");
        assert_eq!(ranges.len(), 2);
        assert_eq!(names(&ranges[0]), [(".a", "a")]);
        assert_eq!(names(&ranges[1]), [(".a:hover", "")]);
    }

    #[test]
    fn nested_descendant() {
        let ranges = parse(".a { .b { color: blue; } }", "less");
        assert_eq!(names(&ranges[1]), [(".a .b", "b")]);
    }

    #[test]
    fn keyframes() {
        let ranges = parse("@keyframes spin { 0% { opacity: 0; } 100% { opacity: 1; } }", "scss");
        assert_eq!(ranges.len(), 3);
        assert_eq!(names(&ranges[0]), [("@keyframes spin", "")]);
        assert_eq!(names(&ranges[1]), [("0%", "")]);
        assert_eq!(names(&ranges[2]), [("100%", "")]);
    }

    #[test]
    fn deep_ignored_identifiers_have_no_main() {
        let ranges = parse("@keyframes k { from { } to { } }", "css");
        assert_eq!(names(&ranges[1]), [("from", "")]);
        assert_eq!(names(&ranges[2]), [("to", "")]);
    }

    #[test]
    fn unterminated_block_ends_at_end_of_document() {
        let text = ".a {\n  color: red;";
        let ranges = parse(text, "css");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range.end, Position::new(1, 13));
    }

    #[test]
    fn unknown_language_is_parsed_as_css() {
        let text = ".a { .b { } }";
        let ranges = parse(text, "stylus");
        assert_eq!(ranges, parse(text, "css"));
        assert_eq!(names(&ranges[1]), [(".b", "b")]);
    }

    #[test]
    fn multi_selector_nesting() {
        let ranges = parse(".a, #b { &:focus, span { } }", "scss");
        assert_eq!(
            names(&ranges[1]),
            [(".a:focus", ""), ("#b:focus", ""), (".a span", ""), ("#b span", "")]
        );
    }

    #[test]
    fn at_root_selectors_still_nest() {
        let ranges = parse(".a { @at-root .b { } }", "scss");
        assert_eq!(names(&ranges[1]), [("@at-root", ""), (".a .b", "b")]);

        let ranges = parse(".a { @at-root { .b { } } }", "scss");
        assert_eq!(names(&ranges[1]), [("@at-root", "")]);
        assert_eq!(names(&ranges[2]), [(".a .b", "b")]);
    }

    #[test]
    fn order_and_positions_over_lines() {
        let text = ".a {\n  .b { }\n}\n\n.c { }\n";
        let ranges = parse(text, "scss");
        let starts = ranges.iter().map(|r| r.range.start).collect::<Vec<_>>();
        assert_eq!(starts, [Position::new(0, 3), Position::new(1, 5), Position::new(4, 3)]);
        assert_eq!(ranges[0].range.end, Position::new(2, 1));
        assert_eq!(ranges[1].selector_range.start, Position::new(1, 2));
    }

    #[test]
    fn parents_point_into_the_output() {
        let ranges = parse("@media print { .a { } }\n.c { }", "css");
        let parents = ranges.iter().map(|r| r.parent).collect::<Vec<_>>();
        assert_eq!(parents, [None, Some(0), None]);

        let ranges = parse(".a { , { } .b { } }", "scss");
        assert!(ranges[1].names.is_empty());
        assert_eq!(ranges[2].parent, Some(0));
        assert_eq!(names(&ranges[2]), [(".a .b", "b")]);
    }

    #[test]
    fn parsing_twice_is_identical() {
        let text = ".a { .b { &:hover { } } @media print { .c { } } }";
        assert_eq!(parse(text, "scss"), parse(text, "scss"));
    }
}
