//! Graph construction from a document set

use super::{document_node_id, entity_node_id, mission_node_id, normalize_label, KnowledgeGraph};
use biospace_common::{Document, Edge, Node, NodeType, Relation};
use biospace_common::models::Provenance;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Confidence of a `part_of_mission` edge (declared document metadata)
pub const MISSION_CONFIDENCE: f32 = 1.0;

/// Confidence of a `mentions` edge (curated entity label)
pub const MENTION_CONFIDENCE: f32 = 0.9;

/// Derives the provenance graph
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<String, usize>,
    /// In-degree per mission/entity node position
    in_degree: HashMap<usize, u64>,
}

impl GraphBuilder {
    /// Build the full graph for `documents`.
    ///
    /// Node identities and counts depend only on the documents; the same
    /// corpus always yields the same nodes and the same edge set.
    pub fn build(documents: &[Document]) -> KnowledgeGraph {
        let mut builder = Self {
            nodes: Vec::with_capacity(documents.len() * 2),
            edges: Vec::new(),
            index: HashMap::new(),
            in_degree: HashMap::new(),
        };

        for doc in documents {
            builder.add_document(doc);
        }

        builder.finish()
    }

    fn add_document(&mut self, doc: &Document) {
        let doc_node = document_node_id(&doc.id);
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), json!(doc.source));
        metadata.insert("year".to_string(), json!(doc.year));
        metadata.insert("organism".to_string(), json!(doc.organism));
        self.upsert(&doc_node, NodeType::Document, doc.title.trim(), metadata);

        if !normalize_label(&doc.mission).is_empty() {
            let mission_node = mission_node_id(&doc.mission);
            let pos = self.upsert(&mission_node, NodeType::Mission, doc.mission.trim(), BTreeMap::new());
            self.link(&doc_node, mission_node, pos, Relation::PartOfMission, &doc.id, MISSION_CONFIDENCE);
        }

        // One mentions edge per (document, entity) pair
        let mut seen = HashSet::new();
        for label in &doc.entities {
            let key = normalize_label(label);
            if key.is_empty() || !seen.insert(key) {
                continue;
            }
            let entity_node = entity_node_id(label);
            let pos = self.upsert(&entity_node, NodeType::Entity, label.trim(), BTreeMap::new());
            self.link(&doc_node, entity_node, pos, Relation::Mentions, &doc.id, MENTION_CONFIDENCE);
        }
    }

    /// Insert a node unless its id exists; first-seen label wins. Returns its position.
    fn upsert(
        &mut self,
        id: &str,
        node_type: NodeType,
        label: &str,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> usize {
        if let Some(&pos) = self.index.get(id) {
            return pos;
        }
        let pos = self.nodes.len();
        self.nodes.push(Node {
            id: id.to_string(),
            node_type,
            label: label.to_string(),
            metadata,
        });
        self.index.insert(id.to_string(), pos);
        pos
    }

    fn link(
        &mut self,
        source: &str,
        target: String,
        target_pos: usize,
        relation: Relation,
        document_id: &str,
        confidence: f32,
    ) {
        *self.in_degree.entry(target_pos).or_insert(0) += 1;
        self.edges.push(Edge {
            source: source.to_string(),
            target,
            relation,
            provenance: Provenance {
                document_id: document_id.to_string(),
                confidence,
            },
        });
    }

    fn finish(mut self) -> KnowledgeGraph {
        for (pos, count) in self.in_degree {
            let node = &mut self.nodes[pos];
            let key = match node.node_type {
                NodeType::Entity => "mentions",
                NodeType::Mission => "documents",
                NodeType::Document => continue,
            };
            node.metadata.insert(key.to_string(), json!(count));
        }

        KnowledgeGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
