use tower_lsp::lsp_types::Url;

use crate::dialect::Dialect;

use std::ops::Range;

pub struct Source {
    pub url: Url,
    pub version: i32,
    /// Editor language identifier the document was opened with.
    pub language_id: String,
    /// Resolved from `language_id` once, when the document is opened.
    pub dialect: Dialect,
    text: String,
    lines: Vec<Line>,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Source {{
            url: {},
            version: {},
            language_id: {},
            dialect: {},
            text: ...,
            lines: ...,
        }}",
            self.url, self.version, self.language_id, self.dialect
        )
    }
}

impl Source {
    // Create a new source file.
    pub fn new(url: Url, language_id: impl Into<String>, text: String, version: i32) -> Self {
        let language_id = language_id.into();
        Self {
            url,
            version,
            dialect: Dialect::from_language_id(&language_id),
            language_id,
            lines: Line::lines(&text),
            text,
        }
    }

    /// Create a source file without a real url, usually for testing.
    pub fn detached(language_id: &str, text: impl Into<String>) -> Self {
        let url = Url::parse("https://localhost/detached").expect("static url parses");
        return Self::new(url, language_id, text.into(), 0);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len_bytes(&self) -> usize {
        self.text.len()
    }

    pub fn len_lines(&self) -> usize {
        self.lines.len()
    }

    /// Slice out the part of the source code enclosed by the range.
    pub fn get(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    /// Return the index of the line that contains the given byte index.
    pub fn byte_to_line(&self, byte_idx: usize) -> Option<usize> {
        (byte_idx <= self.text.len()).then(|| {
            match self
                .lines
                .binary_search_by_key(&byte_idx, |line| line.utf8_offset)
            {
                Ok(i) => i,
                Err(i) => i - 1,
            }
        })
    }

    /// Return the byte position at which the given line starts.
    pub fn line_to_byte(&self, line_idx: usize) -> Option<usize> {
        self.lines.get(line_idx).map(|line| line.utf8_offset)
    }

    /// Return the range which encloses the given line.
    pub fn line_to_range(&self, line_idx: usize) -> Option<Range<usize>> {
        let start = self.line_to_byte(line_idx)?;
        let end = self.line_to_byte(line_idx + 1).unwrap_or(self.text.len());
        Some(start..end)
    }

    /// Fully replace the source text.
    pub fn replace(&mut self, new: String) {
        self.lines = Line::lines(&new);
        self.text = new;
    }

    /// Replace the text in `replace` with `with`.
    ///
    /// Ranges that do not fall on character boundaries are ignored.
    pub fn edit(&mut self, replace: Range<usize>, with: &str) {
        if self.get(replace.clone()).is_none() {
            tracing::warn!(?replace, url = %self.url, "ignoring edit outside of the document");
            return;
        }
        self.text.replace_range(replace, with);
        self.lines = Line::lines(&self.text);
    }
}

/// Metadata about a line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Line {
    /// The UTF-8 codepoint byte offset where the line starts.
    utf8_offset: usize,
}

impl Line {
    /// Create a line vector.
    fn lines(text: &str) -> Vec<Line> {
        std::iter::once(Line { utf8_offset: 0 })
            .chain(Line::lines_from(text))
            .collect()
    }

    /// Starts of every line after the first.
    fn lines_from(text: &str) -> impl Iterator<Item = Line> + '_ {
        let mut chars = text.char_indices().peekable();

        std::iter::from_fn(move || {
            while let Some((byte_offset, ch)) = chars.next() {
                if !is_newline(ch) {
                    continue;
                }
                let mut utf8_offset = byte_offset + ch.len_utf8();
                // \r\n is a single line break
                if ch == '\r' && chars.peek().map(|&(_, next)| next) == Some('\n') {
                    chars.next();
                    utf8_offset += '\n'.len_utf8();
                }
                return Some(Line { utf8_offset });
            }
            None
        })
    }
}

/// The number of code units this string would use if it was encoded in
/// UTF16. This runs in linear time.
pub fn len_utf16(string: &str) -> usize {
    string.chars().map(char::len_utf16).sum()
}

pub fn is_newline(c: char) -> bool {
    return c == '\n'         // line feed
        || c == '\x0B'       // vertical tab
        || c == '\x0C'       // form feed
        || c == '\r'         // carriage return
        || c == '\u{0085}'   // next line
        || c == '\u{2028}'   // line seperator
        || c == '\u{2029}'; // paragraph seperator
}
