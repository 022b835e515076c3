use super::names::Name;
use super::scanner::Block;
use super::is_combinator;

/// Rewrites the `full` form of freshly split child names against the closest
/// ancestor of `parent` (inclusive) that carries real selectors.
///
/// With `parents` being that ancestor's selectors, each child selector yields one
/// name per parent: `&` at a combinator boundary is replaced by the parent,
/// otherwise the parent is prepended as a descendant. Several `&` in one child
/// all receive the same parent within a copy; they are not cross-multiplied.
pub fn resolve_nesting(names: Vec<Name>, parent: usize, blocks: &[Block]) -> Vec<Name> {
    let Some(parents) = closest_selector_fulls(parent, blocks) else {
        return names;
    };

    let mut resolved = Vec::with_capacity(names.len() * parents.len());

    for name in names {
        if !name.is_selector {
            resolved.push(name);
        } else if has_nesting_marker(&name.full) {
            resolved.extend(
                parents
                    .iter()
                    .map(|parent| name.with_full(substitute_marker(&name.full, parent))),
            );
        } else {
            resolved.extend(
                parents
                    .iter()
                    .map(|parent| name.with_full(format!("{parent} {}", name.full))),
            );
        }
    }

    resolved
}

/// Walks up from `index` to the first block with selector names.
fn closest_selector_fulls(index: usize, blocks: &[Block]) -> Option<Vec<&str>> {
    let mut next = Some(index);
    while let Some(index) = next {
        let block = blocks.get(index)?;
        let fulls = block
            .names
            .iter()
            .filter(|name| name.is_selector)
            .map(|name| name.full.as_str())
            .collect::<Vec<_>>();
        if !fulls.is_empty() {
            return Some(fulls);
        }
        next = block.parent;
    }
    None
}

fn marker_offsets(selector: &str) -> impl Iterator<Item = usize> + '_ {
    selector
        .char_indices()
        .filter(|&(_, c)| c == '&')
        .filter(move |&(idx, _)| {
            selector[..idx]
                .chars()
                .next_back()
                .map_or(true, |prev| prev.is_whitespace() || is_combinator(prev))
        })
        .map(|(idx, _)| idx)
}

fn has_nesting_marker(selector: &str) -> bool {
    marker_offsets(selector).next().is_some()
}

fn substitute_marker(selector: &str, parent: &str) -> String {
    let mut substituted = String::with_capacity(selector.len() + parent.len());
    let mut copied = 0;
    for idx in marker_offsets(selector) {
        substituted.push_str(&selector[copied..idx]);
        substituted.push_str(parent);
        copied = idx + '&'.len_utf8();
    }
    substituted.push_str(&selector[copied..]);
    substituted
}
