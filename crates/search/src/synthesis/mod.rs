//! Cited synthesis over retrieved evidence
//!
//! Provides:
//! - Short answers with `[REF:<chunk id>]` markers and aggregate confidence
//! - Cross-document comparisons naming shared context
//! - Citation marker extraction
//!
//! Everything here is pure: no I/O, no shared state.

mod answer;
mod comparison;

pub use answer::{AnswerSynthesizer, Summarizer, TemplateSummarizer, NO_EVIDENCE};
pub use comparison::ComparisonSynthesizer;

use regex_lite::Regex;
use std::sync::OnceLock;

/// Chunk id of a document's snippet
pub fn snippet_chunk_id(document_id: &str) -> String {
    format!("{}#c0", document_id)
}

/// Chunk id of a document's `index`-th evidence passage
pub fn evidence_chunk_id(document_id: &str, index: usize) -> String {
    format!("{}#c{}", document_id, index + 1)
}

/// Inline citation marker for a chunk
pub fn ref_marker(chunk_id: &str) -> String {
    format!("[REF:{}]", chunk_id)
}

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[REF:([^\]\s]+)\]").expect("citation pattern is valid"))
}

/// Chunk ids cited in `text`, in order of appearance, without repeats
pub fn cited_chunk_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for cap in citation_pattern().captures_iter(text) {
        if let Some(m) = cap.get(1) {
            if !ids.iter().any(|id| id == m.as_str()) {
                ids.push(m.as_str().to_string());
            }
        }
    }
    ids
}

/// Quoted corpus text with any marker syntax defused, so it cannot cite
pub fn neutralize_markers(text: &str) -> String {
    text.replace("[REF:", "(REF:")
}

/// Drop markers whose chunk id fails `keep`
pub fn retain_markers(text: &str, keep: impl Fn(&str) -> bool) -> String {
    citation_pattern()
        .replace_all(text, |cap: &regex_lite::Captures<'_>| match cap.get(1) {
            Some(id) if keep(id.as_str()) => cap[0].to_string(),
            _ => String::new(),
        })
        .into_owned()
}

/// Arithmetic mean rounded to 2 decimals; 0.0 for no scores
pub fn mean_confidence(scores: &[f32]) -> f32 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f32>() / scores.len() as f32;
    (mean * 100.0).round() / 100.0
}
