//! Cross-document comparison

use super::{evidence_chunk_id, mean_confidence, neutralize_markers, ref_marker, snippet_chunk_id};
use crate::graph::normalize_label;
use crate::retrieval::DocumentScorer;
use biospace_common::errors::{AppError, Result};
use biospace_common::{ComparisonResult, CorpusSnapshot, Document, EvidenceSpan};
use std::collections::HashSet;
use std::sync::Arc;

/// Compares two or more documents of one snapshot
#[derive(Clone)]
pub struct ComparisonSynthesizer {
    scorer: Arc<dyn DocumentScorer>,
}

impl ComparisonSynthesizer {
    pub fn new(scorer: Arc<dyn DocumentScorer>) -> Self {
        Self { scorer }
    }

    /// Compare the documents behind `ids`.
    ///
    /// Unknown and repeated ids are skipped; fewer than 2 resolved documents
    /// fails with `InsufficientItems`.
    pub fn compare(&self, snapshot: &CorpusSnapshot, ids: &[String]) -> Result<ComparisonResult> {
        let mut seen = HashSet::new();
        let documents: Vec<&Document> = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| seen.insert(*id))
            .filter_map(|id| snapshot.get(id))
            .collect();

        if documents.len() < 2 {
            return Err(AppError::InsufficientItems {
                resolved: documents.len(),
            });
        }

        let organisms = distinct(documents.iter().map(|d| d.organism.as_str()));
        let missions = distinct(documents.iter().map(|d| d.mission.as_str()));
        let assay_types = distinct(documents.iter().map(|d| d.assay_type.as_str()));

        let supports: Vec<EvidenceSpan> = documents.iter().map(|d| self.evidence_span(d)).collect();

        let scores: Vec<f32> = supports.iter().map(|s| s.score).collect();
        let confidence = mean_confidence(&scores);

        let synthesis = compose(&documents, &supports, &organisms, &missions, &assay_types);

        Ok(ComparisonResult {
            synthesis,
            confidence,
            supports,
            organisms,
            missions,
            assay_types,
        })
    }

    /// First evidence passage, falling back to the snippet
    fn evidence_span(&self, document: &Document) -> EvidenceSpan {
        let (chunk_id, text) = match document
            .evidence
            .iter()
            .enumerate()
            .find(|(_, e)| !e.trim().is_empty())
        {
            Some((idx, passage)) => (evidence_chunk_id(&document.id, idx), passage.trim()),
            None => (snippet_chunk_id(&document.id), document.snippet.trim()),
        };

        EvidenceSpan {
            chunk_id,
            document_id: document.id.clone(),
            source: document.source.clone(),
            text: text.to_string(),
            url: document.url.clone(),
            // A comparison has no query text
            score: self.scorer.document_score("", document),
        }
    }
}

/// Non-blank values, deduplicated by normalized label, first spelling kept
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut keys = HashSet::new();
    values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| keys.insert(normalize_label(v)))
        .map(str::to_string)
        .collect()
}

fn compose(
    documents: &[&Document],
    supports: &[EvidenceSpan],
    organisms: &[String],
    missions: &[String],
    assay_types: &[String],
) -> String {
    let cited: Vec<String> = documents
        .iter()
        .zip(supports)
        .map(|(doc, span)| {
            format!(
                "\"{}\" {}",
                neutralize_markers(doc.title.trim()),
                ref_marker(&span.chunk_id)
            )
        })
        .collect();

    let mut text = format!("Comparing {} documents: {}.", documents.len(), cited.join("; "));

    text.push(' ');
    text.push_str(&facet_sentence(
        missions,
        "All belong to mission",
        "They span missions",
        "No mission is recorded.",
    ));
    text.push(' ');
    text.push_str(&facet_sentence(
        organisms,
        "Every study uses",
        "Organisms differ:",
        "No organism is recorded.",
    ));
    text.push(' ');
    text.push_str(&facet_sentence(
        assay_types,
        "They share the methodology",
        "Methodologies differ:",
        "No assay type is recorded.",
    ));

    text
}

fn facet_sentence(values: &[String], shared: &str, differing: &str, none: &str) -> String {
    match values {
        [] => none.to_string(),
        [only] => format!("{} {}.", shared, neutralize_markers(only)),
        many => format!("{} {}.", differing, neutralize_markers(&many.join(", "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::PlaceholderScorer;
    use crate::synthesis::cited_chunk_ids;
    use crate::testutil::doc;

    fn synthesizer() -> ComparisonSynthesizer {
        ComparisonSynthesizer::new(Arc::new(PlaceholderScorer))
    }

    fn snapshot() -> CorpusSnapshot {
        let mut a = doc("a", "RR-1", &[]);
        a.evidence = vec!["".into(), "Femur density fell 6%.".into()];
        let mut b = doc("b", "rr-1", &[]);
        b.snippet = "Muscle atrophy was measured.".into();
        let mut c = doc("c", "BRIC-19", &[]);
        c.organism = "Arabidopsis thaliana".into();
        c.assay_type = "Microarray".into();
        CorpusSnapshot::new(1, vec![a, b, c]).unwrap()
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fewer_than_two_fails() {
        let snap = snapshot();
        let s = synthesizer();

        for request in [ids(&[]), ids(&["a"]), ids(&["a", "a"]), ids(&["a", "missing"])] {
            let err = s.compare(&snap, &request).unwrap_err();
            assert!(matches!(err, AppError::InsufficientItems { .. }), "{:?}", request);
        }
    }

    #[test]
    fn test_pair_has_one_support_each() {
        let result = synthesizer().compare(&snapshot(), &ids(&["a", "b"])).unwrap();

        assert_eq!(result.supports.len(), 2);
        assert_eq!(result.supports[0].document_id, "a");
        assert_eq!(result.supports[1].document_id, "b");
        // a cites its first non-blank evidence passage, b its snippet
        assert_eq!(result.supports[0].chunk_id, "a#c2");
        assert_eq!(result.supports[0].text, "Femur density fell 6%.");
        assert_eq!(result.supports[1].chunk_id, "b#c0");

        assert_eq!(cited_chunk_ids(&result.synthesis), vec!["a#c2", "b#c0"]);
        assert_eq!(result.missions, vec!["RR-1"]);
        assert!(result.synthesis.contains("All belong to mission RR-1."));
        assert!(result.synthesis.contains("They share the methodology RNA-Seq."));
    }

    #[test]
    fn test_differences_listed() {
        let result = synthesizer().compare(&snapshot(), &ids(&["a", "c", "missing"])).unwrap();

        assert_eq!(result.supports.len(), 2);
        assert_eq!(result.organisms, vec!["Mus musculus", "Arabidopsis thaliana"]);
        assert_eq!(result.assay_types, vec!["RNA-Seq", "Microarray"]);
        assert!(result.synthesis.contains("Organisms differ: Mus musculus, Arabidopsis thaliana."));
    }

    #[test]
    fn test_confidence_is_mean_of_span_scores() {
        let result = synthesizer().compare(&snapshot(), &ids(&["a", "b", "c"])).unwrap();
        let scores: Vec<f32> = result.supports.iter().map(|s| s.score).collect();

        assert_eq!(result.confidence, mean_confidence(&scores));
        assert!((0.5..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_synthesis_cites_only_supports() {
        let mut a = doc("a", "RR-1 [REF:x#c9]", &[]);
        a.title = "Femur [REF:ghost#c1] study".into();
        let mut b = doc("b", "RR-1", &[]);
        b.organism = "[REF:y#c2]".into();
        let snap = CorpusSnapshot::new(1, vec![a, b]).unwrap();

        let result = synthesizer().compare(&snap, &ids(&["a", "b"])).unwrap();
        let support_ids: Vec<String> = result.supports.iter().map(|s| s.chunk_id.clone()).collect();

        assert_eq!(cited_chunk_ids(&result.synthesis), support_ids);
        assert!(result.synthesis.contains("Femur (REF:ghost#c1] study"));
    }
}
