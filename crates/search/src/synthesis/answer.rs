//! Answer synthesis from ranked documents

use super::{cited_chunk_ids, mean_confidence, neutralize_markers, ref_marker, retain_markers, snippet_chunk_id};
use crate::retrieval::ScoredDocument;
use biospace_common::{Answer, EvidenceSpan};
use std::sync::Arc;

/// Literal answer text when no support carries any text
pub const NO_EVIDENCE: &str = "No evidence found in provided passages.";

/// Default number of ranked documents cited by an answer
pub const DEFAULT_SUPPORTS: usize = 3;

/// Turns supports into prose.
///
/// Implementations should cite each support with `[REF:<chunk id>]` and only
/// restate what the supports' text says. `AnswerSynthesizer` strips markers
/// for chunks outside the supports and restores any it leaves out.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, query: &str, supports: &[EvidenceSpan]) -> String;
}

/// Deterministic template quoting each support verbatim.
///
/// The query is not echoed: it is caller text, not evidence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSummarizer;

impl Summarizer for TemplateSummarizer {
    fn summarize(&self, _query: &str, supports: &[EvidenceSpan]) -> String {
        if supports.iter().all(|s| s.text.trim().is_empty()) {
            return NO_EVIDENCE.to_string();
        }

        let mut text = if supports.len() == 1 {
            "1 retrieved passage addresses the query.".to_string()
        } else {
            format!("{} retrieved passages address the query.", supports.len())
        };

        for support in supports {
            let body = support.text.trim();
            if body.is_empty() {
                text.push_str(&format!(
                    " {} lists a related record without an excerpt {}.",
                    neutralize_markers(&support.source),
                    ref_marker(&support.chunk_id)
                ));
            } else {
                text.push_str(&format!(
                    " {} reports: \"{}\" {}",
                    neutralize_markers(&support.source),
                    neutralize_markers(body),
                    ref_marker(&support.chunk_id)
                ));
            }
        }

        text
    }
}

/// Builds cited answers from ranked search results
#[derive(Clone)]
pub struct AnswerSynthesizer {
    summarizer: Arc<dyn Summarizer>,
    max_supports: usize,
}

impl AnswerSynthesizer {
    pub fn new(summarizer: Arc<dyn Summarizer>, max_supports: usize) -> Self {
        Self {
            summarizer,
            max_supports: max_supports.max(1),
        }
    }

    /// Answer for `query` from the top ranked documents; `None` when there are none.
    pub fn synthesize(&self, query: &str, ranked: &[ScoredDocument]) -> Option<Answer> {
        if ranked.is_empty() {
            return None;
        }

        let support: Vec<EvidenceSpan> = ranked
            .iter()
            .take(self.max_supports)
            .map(|item| EvidenceSpan {
                chunk_id: snippet_chunk_id(&item.document.id),
                document_id: item.document.id.clone(),
                source: item.document.source.clone(),
                text: item.document.snippet.trim().to_string(),
                url: item.document.url.clone(),
                score: item.score,
            })
            .collect();

        let scores: Vec<f32> = support.iter().map(|s| s.score).collect();
        let confidence = mean_confidence(&scores);

        let text = if support.iter().all(|s| s.text.is_empty()) {
            NO_EVIDENCE.to_string()
        } else {
            enforce_citations(self.summarizer.summarize(query, &support), &support)
        };

        Some(Answer {
            text,
            confidence,
            support,
        })
    }
}

impl Default for AnswerSynthesizer {
    fn default() -> Self {
        Self::new(Arc::new(TemplateSummarizer), DEFAULT_SUPPORTS)
    }
}

/// Strip markers citing chunks outside `support`, then append a marker for
/// every support the prose failed to cite
fn enforce_citations(text: String, support: &[EvidenceSpan]) -> String {
    let is_support = |id: &str| support.iter().any(|s| s.chunk_id == id);

    let stray = cited_chunk_ids(&text)
        .iter()
        .filter(|id| !is_support(id.as_str()))
        .count();
    let mut text = if stray > 0 {
        tracing::warn!(stray, "Summarizer cited chunks outside the supports, removing markers");
        retain_markers(&text, is_support)
    } else {
        text
    };

    let cited = cited_chunk_ids(&text);
    let missing: Vec<&EvidenceSpan> = support
        .iter()
        .filter(|s| !cited.contains(&s.chunk_id))
        .collect();

    if !missing.is_empty() {
        tracing::warn!(missing = missing.len(), "Summarizer omitted citations, appending markers");
        text.push_str(" Additional support:");
        for span in missing {
            text.push(' ');
            text.push_str(&ref_marker(&span.chunk_id));
        }
    }

    text
}
