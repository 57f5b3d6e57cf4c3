//! Text, source and facet predicates

use super::FacetFilters;
use biospace_common::Document;

/// Lowercased whitespace-split query terms
pub fn query_terms(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// True when any term is a substring of the title, snippet or an entity label.
///
/// OR across terms and fields; no terms matches everything.
pub fn matches_text(document: &Document, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }

    let title = document.title.to_lowercase();
    let snippet = document.snippet.to_lowercase();
    let entities: Vec<String> = document.entities.iter().map(|e| e.to_lowercase()).collect();

    terms.iter().any(|term| {
        title.contains(term.as_str())
            || snippet.contains(term.as_str())
            || entities.iter().any(|e| e.contains(term.as_str()))
    })
}

/// True when the source label contains at least one requested token
pub fn matches_sources(document: &Document, sources: &[String]) -> bool {
    let tokens: Vec<String> = sources
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if tokens.is_empty() {
        return true;
    }

    let label = document.source.to_lowercase();
    tokens.iter().any(|t| label.contains(t.as_str()))
}

/// True when every supplied facet is a substring of its field
pub fn matches_facets(document: &Document, filters: &FacetFilters) -> bool {
    facet_matches(&document.organism, filters.organism.as_deref())
        && facet_matches(&document.mission, filters.mission.as_deref())
        && facet_matches(&document.assay_type, filters.assay_type.as_deref())
}

fn facet_matches(field: &str, wanted: Option<&str>) -> bool {
    match wanted.map(str::trim) {
        Some(w) if !w.is_empty() => field.to_lowercase().contains(&w.to_lowercase()),
        _ => true,
    }
}
