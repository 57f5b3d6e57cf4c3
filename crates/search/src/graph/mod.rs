//! Provenance knowledge graph
//!
//! Documents, missions and entities become nodes; `part_of_mission` and
//! `mentions` edges each carry the id of the document that justifies them.
//! Graphs are derived from a snapshot on demand and never stored.

mod builder;
mod neighborhood;

pub use builder::{GraphBuilder, MENTION_CONFIDENCE, MISSION_CONFIDENCE};

use biospace_common::{Edge, Node};
use serde::{Deserialize, Serialize};

/// Node and edge lists of a (sub)graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }
}

/// Canonical key for entity and mission labels: lowercase, trimmed,
/// internal whitespace collapsed to single spaces.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

const DOCUMENT_PREFIX: &str = "doc:";
const MISSION_PREFIX: &str = "mission:";
const ENTITY_PREFIX: &str = "entity:";

pub fn document_node_id(document_id: &str) -> String {
    format!("{}{}", DOCUMENT_PREFIX, document_id)
}

pub fn mission_node_id(mission: &str) -> String {
    format!("{}{}", MISSION_PREFIX, normalize_label(mission))
}

pub fn entity_node_id(label: &str) -> String {
    format!("{}{}", ENTITY_PREFIX, normalize_label(label))
}

/// Document id behind a document node id
pub fn document_id_from_node(node_id: &str) -> Option<&str> {
    node_id.strip_prefix(DOCUMENT_PREFIX)
}
