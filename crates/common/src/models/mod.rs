//! Core data model shared by the engine and the gateway
//!
//! Documents are the only loaded records; nodes, edges, answers and
//! comparisons are derived from a corpus snapshot on demand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A retrievable record: paper, dataset or bibliographic entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: String,

    pub title: String,

    /// Source label, e.g. "OSDR" or "PubMed Central"
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default)]
    pub organism: String,

    #[serde(default)]
    pub mission: String,

    #[serde(default)]
    pub assay_type: String,

    #[serde(default)]
    pub sample_size: Option<u32>,

    /// Short abstract-like passage quoted by answers
    #[serde(default)]
    pub snippet: String,

    /// Curated entity labels mentioned by the document
    #[serde(default)]
    pub entities: Vec<String>,

    #[serde(default)]
    pub url: String,

    /// Verbatim passages usable as comparison evidence
    #[serde(default)]
    pub evidence: Vec<String>,

    #[serde(default)]
    pub doi: Option<String>,
}

/// Kind of graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Document,
    Entity,
    Mission,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::Entity => "entity",
            NodeType::Mission => "mission",
        }
    }
}

/// Node of the provenance graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Display label with the first-seen casing
    pub label: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Typed relation carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Mentions,
    PartOfMission,
}

/// Back-reference to the document justifying an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub document_id: String,
    pub confidence: f32,
}

/// Directed, citation-bearing edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
    pub provenance: Provenance,
}

/// Fragment of document text cited to justify a synthesized claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    pub chunk_id: String,
    pub document_id: String,
    pub source: String,
    pub text: String,
    pub url: String,
    /// Relevance of the span (0.0 - 1.0)
    pub score: f32,
}

/// Short cited answer to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Mean support score rounded to 2 decimals
    pub confidence: f32,
    pub support: Vec<EvidenceSpan>,
}

/// Cross-document synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub synthesis: String,
    pub confidence: f32,
    /// One span per resolved document
    pub supports: Vec<EvidenceSpan>,
    pub organisms: Vec<String>,
    pub missions: Vec<String>,
    pub assay_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_optional_fields_default() {
        let doc: Document = serde_json::from_str(
            r#"{"id": "b1", "title": "Bibliographic entry", "source": "NASA Technical Reports"}"#,
        )
        .unwrap();
        assert!(doc.entities.is_empty());
        assert!(doc.evidence.is_empty());
        assert_eq!(doc.doi, None);
        assert_eq!(doc.year, None);
    }

    #[test]
    fn test_node_and_relation_wire_names() {
        let node = Node {
            id: "mission:rr-1".into(),
            node_type: NodeType::Mission,
            label: "RR-1".into(),
            metadata: BTreeMap::new(),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "mission");

        let relation = serde_json::to_value(Relation::PartOfMission).unwrap();
        assert_eq!(relation, "part_of_mission");
    }
}
