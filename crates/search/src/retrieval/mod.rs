//! Query Engine
//!
//! Filters and ranks corpus documents against:
//! - a free-text query (OR across whitespace-split terms)
//! - a source-label filter
//! - organism / mission / assay-type facets
//! - an optional graph-neighborhood scope

mod matching;
mod scoring;

pub use matching::{matches_facets, matches_sources, matches_text, query_terms};
pub use scoring::{DocumentScorer, PlaceholderScorer};

use crate::graph::{document_id_from_node, GraphBuilder};
use biospace_common::{CorpusSnapshot, Document};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Independent case-insensitive substring facets, ANDed together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetFilters {
    #[serde(default)]
    pub organism: Option<String>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub assay_type: Option<String>,
}

/// Search request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query; blank means "no text constraint"
    pub query: String,

    /// Source tokens; empty is a no-op
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default)]
    pub filters: FacetFilters,

    /// Restrict to the 1-hop neighborhood of this graph node
    #[serde(default)]
    pub node_scope: Option<String>,

    /// Maximum results to return
    pub limit: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            sources: Vec::new(),
            filters: FacetFilters::default(),
            node_scope: None,
            limit: 20,
        }
    }
}

/// Document with its relevance score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: Document,

    /// Relevance score (0.5 - 1.0 with the placeholder scorer)
    pub score: f32,
}

/// Ranked, truncated result set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankedDocuments {
    pub items: Vec<ScoredDocument>,

    /// Matches before truncation to the limit
    pub total: usize,
}

/// Filters and ranks a corpus snapshot
#[derive(Clone)]
pub struct QueryEngine {
    scorer: Arc<dyn DocumentScorer>,
}

impl QueryEngine {
    pub fn new(scorer: Arc<dyn DocumentScorer>) -> Self {
        Self { scorer }
    }

    /// Run a search. Never fails: no match is an empty result.
    pub fn search(&self, snapshot: &CorpusSnapshot, request: &SearchRequest) -> RankedDocuments {
        let terms = query_terms(&request.query);

        let scope = request
            .node_scope
            .as_deref()
            .map(|node_id| scoped_document_ids(snapshot, node_id));

        let mut items: Vec<ScoredDocument> = snapshot
            .documents()
            .iter()
            .filter(|doc| match &scope {
                Some(allowed) => allowed.contains(&doc.id),
                None => true,
            })
            .filter(|doc| matches_text(doc, &terms))
            .filter(|doc| matches_sources(doc, &request.sources))
            .filter(|doc| matches_facets(doc, &request.filters))
            .map(|doc| ScoredDocument {
                score: self.scorer.document_score(&request.query, doc),
                document: doc.clone(),
            })
            .collect();

        // Stable: ties keep corpus order
        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let total = items.len();
        items.truncate(request.limit);

        tracing::debug!(
            query = %request.query,
            terms = terms.len(),
            total,
            returned = items.len(),
            "Query ranked"
        );

        RankedDocuments { items, total }
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(Arc::new(PlaceholderScorer))
    }
}

/// Ids of documents whose node lies in the 1-hop neighborhood of `node_id`.
/// An unknown node scopes to nothing.
fn scoped_document_ids(snapshot: &CorpusSnapshot, node_id: &str) -> HashSet<String> {
    let graph = GraphBuilder::build(snapshot.documents());
    match graph.neighborhood(node_id) {
        Some(hood) => hood
            .nodes
            .iter()
            .filter_map(|node| document_id_from_node(&node.id).map(str::to_string))
            .collect(),
        None => HashSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::entity_node_id;
    use crate::testutil::{doc, sample_snapshot};

    /// Fixed per-id scores, 0.5 for everything else
    struct FixedScorer(Vec<(&'static str, f32)>);

    impl DocumentScorer for FixedScorer {
        fn document_score(&self, _query: &str, document: &Document) -> f32 {
            self.0
                .iter()
                .find(|(id, _)| *id == document.id)
                .map(|(_, s)| *s)
                .unwrap_or(0.5)
        }
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            limit: 50,
            ..Default::default()
        }
    }

    #[test]
    fn test_every_hit_contains_a_query_term() {
        let snapshot = sample_snapshot();
        let engine = QueryEngine::default();

        for query in ["bone", "MICROGRAVITY muscle", "radiation", "arabidopsis roots"] {
            let results = engine.search(&snapshot, &request(query));
            let terms = query_terms(query);
            for item in &results.items {
                let doc = &item.document;
                let haystacks: Vec<String> = std::iter::once(doc.title.to_lowercase())
                    .chain(std::iter::once(doc.snippet.to_lowercase()))
                    .chain(doc.entities.iter().map(|e| e.to_lowercase()))
                    .collect();
                assert!(
                    terms.iter().any(|t| haystacks.iter().any(|h| h.contains(t.as_str()))),
                    "{} matched {:?} without a term",
                    doc.id,
                    query
                );
            }
        }
    }

    #[test]
    fn test_terms_are_ored() {
        let snapshot = sample_snapshot();
        let engine = QueryEngine::default();

        let bone = engine.search(&snapshot, &request("bone")).total;
        let plants = engine.search(&snapshot, &request("arabidopsis")).total;
        let either = engine.search(&snapshot, &request("bone arabidopsis")).total;

        assert!(bone > 0 && plants > 0);
        assert_eq!(either, bone + plants);
    }

    #[test]
    fn test_empty_query_returns_everything() {
        let snapshot = sample_snapshot();
        let results = QueryEngine::default().search(&snapshot, &request("   "));
        assert_eq!(results.total, snapshot.len());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let snapshot = sample_snapshot();
        let results = QueryEngine::default().search(&snapshot, &request("zebrafish"));
        assert!(results.items.is_empty());
        assert_eq!(results.total, 0);

        let empty = CorpusSnapshot::empty();
        assert!(QueryEngine::default().search(&empty, &request("bone")).items.is_empty());
    }

    #[test]
    fn test_source_and_facet_filters() {
        let snapshot = sample_snapshot();
        let engine = QueryEngine::default();

        let mut req = request("");
        req.sources = vec!["osdr".to_string()];
        let results = engine.search(&snapshot, &req);
        assert!(results.total > 0);
        assert!(results.items.iter().all(|i| i.document.source == "OSDR"));

        let mut req = request("");
        req.filters.organism = Some("mus".to_string());
        req.filters.mission = Some("rr-1".to_string());
        let results = engine.search(&snapshot, &req);
        assert!(results.total > 0);
        for item in &results.items {
            assert!(item.document.organism.to_lowercase().contains("mus"));
            assert!(item.document.mission.to_lowercase().contains("rr-1"));
        }
    }

    #[test]
    fn test_scores_in_range_and_sorted() {
        let snapshot = sample_snapshot();
        let results = QueryEngine::default().search(&snapshot, &request(""));
        for pair in results.items.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for item in &results.items {
            assert!((0.5..=1.0).contains(&item.score));
        }
    }

    #[test]
    fn test_ties_keep_corpus_order_and_limit_truncates() {
        let snapshot = CorpusSnapshot::new(
            1,
            vec![doc("a", "M1", &[]), doc("b", "M1", &[]), doc("c", "M1", &[])],
        )
        .unwrap();
        let engine = QueryEngine::new(Arc::new(FixedScorer(vec![("c", 0.9)])));

        let mut req = request("");
        req.limit = 2;
        let results = engine.search(&snapshot, &req);

        let ids: Vec<&str> = results.items.iter().map(|i| i.document.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(results.total, 3);
    }

    #[test]
    fn test_node_scope_restricts_to_neighborhood() {
        let snapshot = CorpusSnapshot::new(
            1,
            vec![
                doc("d1", "M1", &["bone loss", "microgravity"]),
                doc("d2", "M1", &["microgravity"]),
                doc("d3", "M2", &["radiation"]),
            ],
        )
        .unwrap();
        let engine = QueryEngine::default();

        let mut req = request("");
        req.node_scope = Some(entity_node_id("Microgravity"));
        let mut ids: Vec<String> = engine
            .search(&snapshot, &req)
            .items
            .into_iter()
            .map(|i| i.document.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["d1", "d2"]);

        req.node_scope = Some("entity:unknown".to_string());
        assert!(engine.search(&snapshot, &req).items.is_empty());
    }
}
