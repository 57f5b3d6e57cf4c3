//! Research service facade
//!
//! The operations exposed to the presentation layer. Every read pins one
//! corpus snapshot for its whole duration, so a concurrent reseed is never
//! observed half-way.

use crate::graph::{GraphBuilder, KnowledgeGraph};
use crate::retrieval::{DocumentScorer, PlaceholderScorer, QueryEngine, ScoredDocument, SearchRequest};
use crate::synthesis::{AnswerSynthesizer, ComparisonSynthesizer, Summarizer, TemplateSummarizer};
use biospace_common::config::SearchConfig;
use biospace_common::errors::{AppError, Result};
use biospace_common::{metrics, Answer, ComparisonResult, CorpusSnapshot, CorpusSource, CorpusStore, Document};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Ranked items plus a quick cited answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub items: Vec<ScoredDocument>,

    /// Matches before truncation
    pub total: usize,

    /// Absent when nothing matched
    pub quick_answer: Option<Answer>,

    /// Snapshot the search ran against
    pub corpus_version: u64,
}

/// Engine entry point shared by all callers
pub struct ResearchService {
    store: Arc<CorpusStore>,
    source: Arc<dyn CorpusSource>,
    engine: QueryEngine,
    answers: AnswerSynthesizer,
    comparisons: ComparisonSynthesizer,
    config: SearchConfig,
}

impl ResearchService {
    /// Service over an existing store, using the placeholder scorer and template summarizer
    pub fn new(store: Arc<CorpusStore>, source: Arc<dyn CorpusSource>, config: SearchConfig) -> Self {
        let scorer: Arc<dyn DocumentScorer> = Arc::new(PlaceholderScorer);
        Self {
            store,
            source,
            engine: QueryEngine::new(Arc::clone(&scorer)),
            answers: AnswerSynthesizer::new(Arc::new(TemplateSummarizer), config.answer_supports),
            comparisons: ComparisonSynthesizer::new(scorer),
            config,
        }
    }

    /// Load the initial corpus from `source` and build the service
    pub async fn bootstrap(source: Arc<dyn CorpusSource>, config: SearchConfig) -> Result<Self> {
        let store = Arc::new(CorpusStore::empty());
        let documents = source.load().await?;
        let snapshot = store.install(documents)?;

        info!(
            source = %source.describe(),
            documents = snapshot.len(),
            "Initial corpus loaded"
        );
        metrics::record_reload(snapshot.len(), true);

        Ok(Self::new(store, source, config))
    }

    /// Replace the relevance scorer for search and comparison
    pub fn with_scorer(mut self, scorer: Arc<dyn DocumentScorer>) -> Self {
        self.engine = QueryEngine::new(Arc::clone(&scorer));
        self.comparisons = ComparisonSynthesizer::new(scorer);
        self
    }

    /// Replace the prose generator for quick answers
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.answers = AnswerSynthesizer::new(summarizer, self.config.answer_supports);
        self
    }

    /// Currently installed snapshot
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        self.store.snapshot()
    }

    /// Ranked documents and a quick answer. Never fails on absence of matches.
    pub fn search(&self, mut request: SearchRequest) -> SearchOutcome {
        let start = Instant::now();
        let snapshot = self.store.snapshot();

        request.limit = self.effective_limit(request.limit);
        let ranked = self.engine.search(&snapshot, &request);
        let quick_answer = self.answers.synthesize(&request.query, &ranked.items);

        metrics::record_search(
            start.elapsed().as_secs_f64(),
            ranked.items.len(),
            quick_answer.is_some(),
        );

        info!(
            query = %request.query,
            total = ranked.total,
            returned = ranked.items.len(),
            answered = quick_answer.is_some(),
            corpus_version = snapshot.version(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        SearchOutcome {
            items: ranked.items,
            total: ranked.total,
            quick_answer,
            corpus_version: snapshot.version(),
        }
    }

    /// One document by id
    pub fn get_document(&self, id: &str) -> Result<Document> {
        self.store
            .snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::DocumentNotFound { id: id.to_string() })
    }

    /// Whole graph, or the neighborhood of `node_id` within `depth` hops (default 1)
    pub fn build_graph(&self, node_id: Option<&str>, depth: Option<usize>) -> Result<KnowledgeGraph> {
        let start = Instant::now();
        let snapshot = self.store.snapshot();
        let graph = GraphBuilder::build(snapshot.documents());

        let graph = match node_id {
            None => graph,
            Some(id) => {
                let depth = depth.unwrap_or(1).clamp(1, self.config.max_graph_depth.max(1));
                graph
                    .neighborhood_within(id, depth)
                    .ok_or_else(|| AppError::NodeNotFound { id: id.to_string() })?
            }
        };

        metrics::record_graph(start.elapsed().as_secs_f64(), graph.nodes.len(), graph.edges.len());
        tracing::debug!(
            focus = ?node_id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Graph built"
        );

        Ok(graph)
    }

    /// Cross-document synthesis; fails with `InsufficientItems` below 2 known documents
    pub fn compare(&self, ids: &[String]) -> Result<ComparisonResult> {
        let snapshot = self.store.snapshot();
        match self.comparisons.compare(&snapshot, ids) {
            Ok(result) => {
                metrics::record_comparison(result.supports.len(), true);
                info!(
                    requested = ids.len(),
                    resolved = result.supports.len(),
                    confidence = result.confidence,
                    "Comparison completed"
                );
                Ok(result)
            }
            Err(e) => {
                if let AppError::InsufficientItems { resolved } = &e {
                    metrics::record_comparison(*resolved, false);
                }
                Err(e)
            }
        }
    }

    /// Document count per source label
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.store.snapshot().source_counts()
    }

    /// Reload the corpus from the source and swap it in.
    ///
    /// `authorized` comes from the caller's credential check. On failure the
    /// current snapshot stays installed.
    pub async fn reseed(&self, authorized: bool) -> Result<usize> {
        if !authorized {
            warn!("Rejected unauthorized corpus reseed");
            return Err(AppError::Unauthorized {
                message: "corpus reseed requires the admin credential".to_string(),
            });
        }

        let loaded = self
            .source
            .load()
            .await
            .and_then(|documents| self.store.install(documents));

        match loaded {
            Ok(snapshot) => {
                metrics::record_reload(snapshot.len(), true);
                info!(
                    source = %self.source.describe(),
                    version = snapshot.version(),
                    documents = snapshot.len(),
                    "Corpus reseeded"
                );
                Ok(snapshot.len())
            }
            Err(e) => {
                metrics::record_reload(0, false);
                warn!(error = %e, source = %self.source.describe(), "Corpus reseed failed");
                Err(e)
            }
        }
    }

    fn effective_limit(&self, requested: usize) -> usize {
        let max = self.config.max_limit.max(1);
        match requested {
            0 => self.config.default_limit.clamp(1, max),
            n => n.min(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::entity_node_id;
    use crate::synthesis::cited_chunk_ids;
    use crate::testutil::{doc, sample_documents};
    use async_trait::async_trait;
    use biospace_common::corpus::StaticSource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn service() -> ResearchService {
        ResearchService::bootstrap(
            Arc::new(StaticSource::new(sample_documents())),
            SearchConfig::default(),
        )
        .await
        .unwrap()
    }

    /// First load succeeds, later loads return a growing corpus or a broken one
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CorpusSource for Flaky {
        async fn load(&self) -> Result<Vec<Document>> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(vec![doc("a", "M1", &[])]),
                1 => Ok(vec![doc("a", "M1", &[]), doc("b", "M1", &[])]),
                _ => Ok(vec![doc("dup", "M1", &[]), doc("dup", "M1", &[])]),
            }
        }

        fn describe(&self) -> String {
            "flaky".to_string()
        }
    }

    #[tokio::test]
    async fn test_search_with_quick_answer() {
        let service = service().await;
        let outcome = service.search(SearchRequest {
            query: "bone".to_string(),
            limit: 10,
            ..Default::default()
        });

        assert!(!outcome.items.is_empty());
        let answer = outcome.quick_answer.unwrap();
        assert!(!answer.support.is_empty() && answer.support.len() <= 3);
        assert_eq!(cited_chunk_ids(&answer.text).len(), answer.support.len());
        assert_eq!(outcome.corpus_version, 1);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let service = service().await;
        let outcome = service.search(SearchRequest {
            query: "zebrafish".to_string(),
            ..Default::default()
        });
        assert!(outcome.items.is_empty());
        assert!(outcome.quick_answer.is_none());
    }

    #[tokio::test]
    async fn test_limit_defaults_and_clamps() {
        let service = service().await;
        assert_eq!(service.effective_limit(0), 20);
        assert_eq!(service.effective_limit(5), 5);
        assert_eq!(service.effective_limit(10_000), 100);
    }

    #[tokio::test]
    async fn test_get_document() {
        let service = service().await;
        let first = sample_documents().remove(0);

        assert_eq!(service.get_document(&first.id).unwrap(), first);
        let err = service.get_document("nope").unwrap_err();
        assert!(matches!(err, AppError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_build_graph_full_and_scoped() {
        let service = service().await;

        let full = service.build_graph(None, None).unwrap();
        let hood = service
            .build_graph(Some(&entity_node_id("microgravity")), None)
            .unwrap();
        assert!(hood.nodes.len() < full.nodes.len());
        assert!(hood.contains_node("entity:microgravity"));

        let err = service.build_graph(Some("entity:unknown"), Some(2)).unwrap_err();
        assert!(matches!(err, AppError::NodeNotFound { .. }));
    }

    #[tokio::test]
    async fn test_compare_and_counts() {
        let service = service().await;
        let docs = sample_documents();

        let result = service
            .compare(&[docs[0].id.clone(), docs[1].id.clone()])
            .unwrap();
        assert_eq!(result.supports.len(), 2);

        let err = service.compare(&[docs[0].id.clone()]).unwrap_err();
        assert!(matches!(err, AppError::InsufficientItems { resolved: 1 }));

        let counts = service.counts();
        assert_eq!(counts.values().sum::<usize>(), docs.len());
    }

    #[tokio::test]
    async fn test_reseed_requires_authorization() {
        let service = service().await;
        let err = service.reseed(false).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert_eq!(service.snapshot().version(), 1);
    }

    #[tokio::test]
    async fn test_reseed_swaps_and_survives_bad_corpus() {
        let source = Arc::new(Flaky {
            calls: AtomicUsize::new(0),
        });
        let service = ResearchService::bootstrap(source, SearchConfig::default())
            .await
            .unwrap();

        let pinned = service.snapshot();
        assert_eq!(service.reseed(true).await.unwrap(), 2);
        assert_eq!(pinned.len(), 1);
        assert_eq!(service.snapshot().version(), 2);

        let err = service.reseed(true).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCorpus { .. }));
        assert_eq!(service.snapshot().version(), 2);
        assert_eq!(service.counts().values().sum::<usize>(), 2);
    }

    #[test]
    fn test_bootstrap_blocking() {
        let service = tokio_test::block_on(ResearchService::bootstrap(
            Arc::new(StaticSource::new(vec![])),
            SearchConfig::default(),
        ))
        .unwrap();
        assert!(service.snapshot().is_empty());
        assert!(service.build_graph(None, None).unwrap().nodes.is_empty());
    }
}
