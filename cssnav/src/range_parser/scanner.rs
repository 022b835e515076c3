use std::ops::Range;

use itertools::Itertools;

use crate::dialect::{Capabilities, Dialect};

use super::cursor::{is_line_break, Cursor};
use super::names::{split_names, Name};
use super::nesting::resolve_nesting;

/// Blocks opened with text starting like this treat all their descendants as
/// non-selectors (`0%`, `from`, ...).
const DEEP_IGNORED_AT_RULE: &str = "@keyframes";

/// A `{ ... }` region and the names it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub names: Vec<Name>,
    /// Offset of the opening `{`.
    pub start: usize,
    /// Offset just past the closing `}`, `None` while the block is open.
    pub end: Option<usize>,
    /// Index of the block that was active when this one opened.
    pub parent: Option<usize>,
    /// Span of the selector text in front of `{`, trailing whitespace excluded.
    pub selector: Range<usize>,
}

impl Block {
    /// `start..end`; a block still open spans nothing.
    pub fn span(&self) -> Range<usize> {
        self.start..self.end.unwrap_or(self.start)
    }
}

/// Text in front of a terminator, comments and opaque spans already handled.
struct Fragment {
    text: String,
    start: usize,
    terminator: char,
    terminator_pos: usize,
}

/// Scans `text` once and returns every block in the order its `{` appears.
///
/// Blocks left open at the end of input are closed at end of text.
pub fn scan(text: &str, dialect: Dialect) -> Vec<Block> {
    ScanState::new(dialect).run(text)
}

/// Everything that lives for exactly one scan.
struct ScanState {
    capabilities: Capabilities,
    dialect: Dialect,
    blocks: Vec<Block>,
    /// Blocks that were active when a nested block opened, innermost last.
    stack: Vec<usize>,
    current: Option<usize>,
    /// Depth inside a deep-ignored at-rule, 0 outside of one.
    ignore_deep: u32,
}

impl ScanState {
    fn new(dialect: Dialect) -> Self {
        Self {
            capabilities: dialect.capabilities(),
            dialect,
            blocks: Vec::new(),
            stack: Vec::new(),
            current: None,
            ignore_deep: 0,
        }
    }

    fn run(mut self, text: &str) -> Vec<Block> {
        let mut cur = Cursor::new(text);
        loop {
            cur.bump_while(char::is_whitespace);
            if cur.is_eof() {
                break;
            }
            if eat_comment(&mut cur) {
                continue;
            }
            let Some(fragment) = read_fragment(&mut cur) else {
                break;
            };
            match fragment.terminator {
                '{' => self.open_block(fragment, text),
                '}' => self.close_block(cur.pos()),
                _ => {}
            }
        }
        self.finish(text.len())
    }

    fn open_block(&mut self, fragment: Fragment, text: &str) {
        let selector = fragment.text.split_whitespace().join(" ");
        if selector.is_empty() {
            return;
        }

        let ignore_deep = if self.ignore_deep > 0 || selector.starts_with(DEEP_IGNORED_AT_RULE) {
            self.ignore_deep + 1
        } else {
            self.ignore_deep
        };

        // a fragment like `,` still opens a block, just one without names
        let mut names = split_names(&selector, self.dialect, ignore_deep);
        self.ignore_deep = ignore_deep;

        if self.capabilities.supports_nesting && ignore_deep == 0 {
            if let Some(parent) = self.current {
                names = resolve_nesting(names, parent, &self.blocks);
            }
        }

        let selector_end =
            fragment.start + text[fragment.start..fragment.terminator_pos].trim_end().len();
        let index = self.blocks.len();
        self.blocks.push(Block {
            names,
            start: fragment.terminator_pos,
            end: None,
            parent: self.current,
            selector: fragment.start..selector_end,
        });

        if self.capabilities.supports_nesting {
            if let Some(current) = self.current {
                self.stack.push(current);
            }
        }
        self.current = Some(index);
    }

    fn close_block(&mut self, end: usize) {
        if self.ignore_deep > 0 {
            self.ignore_deep -= 1;
        }
        if let Some(current) = self.current {
            self.blocks[current].end = Some(end);
            // plain css keeps no ancestors, closing anything leaves no active block
            self.current = if self.capabilities.supports_nesting {
                self.stack.pop()
            } else {
                None
            };
        }
    }

    fn finish(mut self, text_len: usize) -> Vec<Block> {
        for block in self.blocks.iter_mut().filter(|block| block.end.is_none()) {
            block.end = Some(text_len);
        }
        self.blocks
    }
}

/// Eats a `// ...` line comment or a terminated `/* ... */` block comment.
fn eat_comment(cur: &mut Cursor) -> bool {
    match (cur.first(), cur.second()) {
        ('/', '/') => {
            cur.bump_while(|c| !is_line_break(c));
            true
        }
        ('/', '*') => {
            let mut ahead = cur.clone();
            ahead.bump();
            ahead.bump();
            if ahead.eat_through("*/") {
                *cur = ahead;
                return true;
            }
            false
        }
        _ => false,
    }
}

/// Reads up to and including the next `;`, `{` or `}` outside of parentheses and
/// quotes. Returns `None` when the input ends first.
fn read_fragment(cur: &mut Cursor) -> Option<Fragment> {
    let start = cur.pos();
    let mut text = String::new();

    while !cur.is_eof() {
        let ch = cur.first();
        match ch {
            ';' | '{' | '}' => {
                let terminator_pos = cur.pos();
                cur.bump();
                return Some(Fragment {
                    text,
                    start,
                    terminator: ch,
                    terminator_pos,
                });
            }
            '(' | '"' | '\'' => {
                let closer = if ch == '(' { ')' } else { ch };
                let opaque_start = cur.pos();
                if cur.eat_enclosed(closer, true) {
                    text.push_str(cur.slice_from(opaque_start));
                } else {
                    text.push(ch);
                    cur.bump();
                }
            }
            // `//` only starts a comment at the beginning of a fragment
            '/' if cur.second() == '*' && eat_comment(cur) => {}
            _ => {
                text.push(ch);
                cur.bump();
            }
        }
    }
    None
}
