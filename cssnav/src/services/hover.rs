use itertools::Itertools;
use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};

use super::document_symbol::{contains, extents};
use crate::dialect::Dialect;
use crate::range_parser::NamedRange;

/// Lists the resolved selectors of the innermost block around `position`,
/// selector text included.
pub fn hover_at(ranges: &[NamedRange], position: Position, dialect: Dialect) -> Option<Hover> {
    let point = Range::new(position, position);
    let named = ranges
        .iter()
        .zip(extents(ranges))
        .filter(|(_, extent)| contains(extent, &point))
        .max_by_key(|(_, extent)| (extent.start.line, extent.start.character))
        .map(|(named, _)| named)?;
    if named.names.is_empty() {
        return None;
    }

    let selectors = named.names.iter().map(|name| name.full.as_str()).join(",\n");
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: format!("```{dialect}\n{selectors}\n```"),
        }),
        range: Some(named.selector_range),
    })
}
