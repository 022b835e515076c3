use itertools::Itertools;
use tower_lsp::lsp_types::{DocumentSymbol, Position, Range, SymbolKind};

use crate::range_parser::NamedRange;

/// Outline name of a block opened without any names, e.g. `, { }`.
const NAMELESS: &str = "{ }";

/// Folds the flat, source ordered ranges into an outline. A range becomes a
/// child of the range that was active when it opened.
pub fn document_symbols(ranges: Vec<NamedRange>) -> Vec<DocumentSymbol> {
    let extents = extents(&ranges);
    let parents = ranges.iter().map(|named| named.parent).collect::<Vec<_>>();
    let mut slots = ranges
        .into_iter()
        .zip(extents)
        .map(|(named, extent)| Some(to_symbol(named, extent)))
        .collect::<Vec<_>>();

    // parents always precede their children, so children are settled first
    let mut roots = Vec::new();
    for idx in (0..slots.len()).rev() {
        let Some(symbol) = slots[idx].take() else {
            continue;
        };
        let parent = parents[idx].and_then(|parent| slots.get_mut(parent)?.as_mut());
        match parent {
            Some(parent) => parent.children.get_or_insert_with(Vec::new).insert(0, symbol),
            None => roots.push(symbol),
        }
    }
    roots.reverse();
    roots
}

/// Selector start through block end, cut off where the next range that is not
/// nested in it begins. Plain css leaves outer at-rules open until the end of
/// the text, the cut keeps them from swallowing the rules that follow.
pub(crate) fn extents(ranges: &[NamedRange]) -> Vec<Range> {
    ranges
        .iter()
        .enumerate()
        .map(|(idx, named)| {
            let next_outside = ranges
                .iter()
                .enumerate()
                .skip(idx + 1)
                .find(|&(later, _)| !is_nested_in(ranges, later, idx));
            let end = match next_outside {
                Some((_, next)) if key(next.selector_range.start) < key(named.range.end) => {
                    next.selector_range.start
                }
                _ => named.range.end,
            };
            Range::new(named.selector_range.start, end)
        })
        .collect()
}

fn is_nested_in(ranges: &[NamedRange], mut idx: usize, ancestor: usize) -> bool {
    while let Some(parent) = ranges.get(idx).and_then(|named| named.parent) {
        if parent == ancestor {
            return true;
        }
        idx = parent;
    }
    false
}

#[allow(deprecated)]
fn to_symbol(named: NamedRange, extent: Range) -> DocumentSymbol {
    let name = match named.names.is_empty() {
        true => NAMELESS.to_owned(),
        false => named.names.iter().map(|name| &name.full).join(", "),
    };
    DocumentSymbol {
        name,
        detail: None,
        kind: symbol_kind(&named),
        tags: None,
        deprecated: None,
        range: extent,
        selection_range: named.selector_range,
        children: None,
    }
}

pub(crate) fn symbol_kind(named: &NamedRange) -> SymbolKind {
    if named.names.iter().any(|name| !name.main.is_empty()) {
        SymbolKind::CLASS
    } else if named.names.first().is_some_and(|name| name.full.starts_with('@')) {
        SymbolKind::NAMESPACE
    } else {
        SymbolKind::OBJECT
    }
}

fn key(position: Position) -> (u32, u32) {
    (position.line, position.character)
}

pub(crate) fn contains(outer: &Range, inner: &Range) -> bool {
    key(outer.start) <= key(inner.start) && key(inner.end) <= key(outer.end)
}
