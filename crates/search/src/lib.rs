//! Biospace Search Engine
//!
//! Retrieval and provenance engine over an immutable corpus snapshot:
//! - Query filtering and ranking with a replaceable relevance scorer
//! - Provenance graph of documents, missions and entities
//! - Cited quick answers and cross-document comparisons
//! - `ResearchService`, the facade used by the gateway

pub mod graph;
pub mod retrieval;
pub mod service;
pub mod synthesis;

#[cfg(test)]
mod testutil;

pub use graph::{GraphBuilder, KnowledgeGraph};
pub use retrieval::{DocumentScorer, FacetFilters, QueryEngine, ScoredDocument, SearchRequest};
pub use service::{ResearchService, SearchOutcome};
pub use synthesis::{AnswerSynthesizer, ComparisonSynthesizer, Summarizer, NO_EVIDENCE};
