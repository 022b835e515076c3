//! Conversions between byte offsets into a [`Source`] and LSP positions.

use tower_lsp::lsp_types;

use crate::config::PositionEncoding;
use crate::dialect::Dialect;
use crate::range_parser::TextDocument;
use crate::workspace::source::{is_newline, len_utf16, Source};

pub type LspPosition = lsp_types::Position;
pub type LspRange = lsp_types::Range;
pub type CssNavRange = std::ops::Range<usize>;

/// A source seen through the position encoding negotiated with the client.
pub struct EncodedSource<'a> {
    pub source: &'a Source,
    pub position_encoding: PositionEncoding,
}

impl<'a> EncodedSource<'a> {
    pub fn new(source: &'a Source, position_encoding: PositionEncoding) -> Self {
        Self {
            source,
            position_encoding,
        }
    }
}

impl TextDocument for EncodedSource<'_> {
    fn text(&self) -> &str {
        self.source.text()
    }

    fn language_id(&self) -> &str {
        &self.source.language_id
    }

    fn dialect(&self) -> Dialect {
        self.source.dialect
    }

    fn offset_to_position(&self, offset: usize) -> LspPosition {
        cssnav_to_lsp::offset_to_position(offset, self.position_encoding, self.source)
    }
}

pub mod cssnav_to_lsp {
    use super::*;

    /// Offsets past the end of the text map to the end of the text.
    pub fn offset_to_position(
        offset: usize,
        position_encoding: PositionEncoding,
        source: &Source,
    ) -> LspPosition {
        let offset = offset.min(source.len_bytes());
        let line = source
            .byte_to_line(offset)
            .unwrap_or_else(|| source.len_lines() - 1);
        let line_start = source.line_to_byte(line).unwrap_or(0);
        let head = source.get(line_start..offset).unwrap_or_default();

        let character = match position_encoding {
            PositionEncoding::Utf8 => head.len(),
            PositionEncoding::Utf16 => len_utf16(head),
        };

        LspPosition::new(line as u32, character as u32)
    }

    pub fn range(
        range: CssNavRange,
        source: &Source,
        position_encoding: PositionEncoding,
    ) -> LspRange {
        LspRange::new(
            offset_to_position(range.start, position_encoding, source),
            offset_to_position(range.end, position_encoding, source),
        )
    }
}

pub mod lsp_to_cssnav {
    use super::*;

    /// Positions past the end of a line clamp to the end of that line, positions
    /// past the last line clamp to the end of the text.
    pub fn position_to_offset(
        position: LspPosition,
        position_encoding: PositionEncoding,
        source: &Source,
    ) -> usize {
        let Some(line_range) = source.line_to_range(position.line as usize) else {
            return source.len_bytes();
        };
        let line = source
            .get(line_range.clone())
            .unwrap_or_default()
            .trim_end_matches(is_newline);

        let mut units = 0;
        for (idx, ch) in line.char_indices() {
            if units >= position.character as usize {
                return line_range.start + idx;
            }
            units += match position_encoding {
                PositionEncoding::Utf8 => ch.len_utf8(),
                PositionEncoding::Utf16 => ch.len_utf16(),
            };
        }
        line_range.start + line.len()
    }

    pub fn range(
        lsp_range: &LspRange,
        position_encoding: PositionEncoding,
        source: &Source,
    ) -> CssNavRange {
        let start = position_to_offset(lsp_range.start, position_encoding, source);
        let end = position_to_offset(lsp_range.end, position_encoding, source);
        start..end.max(start)
    }
}
