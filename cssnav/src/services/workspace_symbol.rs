use tower_lsp::lsp_types::{Location, SymbolInformation, SymbolKind, Url};

use super::document_symbol::extents;
use crate::range_parser::NamedRange;

/// Every name whose main identifier contains `query`, ignoring case. An empty
/// query matches every name that has a main identifier.
#[allow(deprecated)]
pub fn workspace_symbols(query: &str, url: &Url, ranges: &[NamedRange]) -> Vec<SymbolInformation> {
    let query = query.to_lowercase();

    ranges
        .iter()
        .zip(extents(ranges))
        .flat_map(|(named, extent)| named.names.iter().map(move |name| (extent, name)))
        .filter(|(_, name)| !name.main.is_empty() && name.main.to_lowercase().contains(&query))
        .map(|(extent, name)| SymbolInformation {
            name: name.main.clone(),
            kind: SymbolKind::CLASS,
            tags: None,
            deprecated: None,
            location: Location::new(url.clone(), extent),
            container_name: Some(name.full.clone()),
        })
        .collect()
}
