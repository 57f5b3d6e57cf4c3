//! Neighborhood extraction around a focus node

use super::KnowledgeGraph;
use std::collections::{HashMap, HashSet, VecDeque};

impl KnowledgeGraph {
    /// Focus node plus every node one edge away, in either direction.
    ///
    /// Returns `None` for an unknown focus node.
    pub fn neighborhood(&self, node_id: &str) -> Option<KnowledgeGraph> {
        self.neighborhood_within(node_id, 1)
    }

    /// Nodes within `depth` hops of the focus (edges followed both ways),
    /// and only the edges whose endpoints both lie in that set.
    pub fn neighborhood_within(&self, node_id: &str, depth: usize) -> Option<KnowledgeGraph> {
        if !self.contains_node(node_id) {
            return None;
        }

        let adjacency = self.undirected_adjacency();

        let mut reached: HashSet<&str> = HashSet::new();
        reached.insert(node_id);
        let mut queue = VecDeque::from([(node_id, 0usize)]);

        while let Some((current, hops)) = queue.pop_front() {
            if hops == depth {
                continue;
            }
            for &next in adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]) {
                if reached.insert(next) {
                    queue.push_back((next, hops + 1));
                }
            }
        }

        let nodes = self
            .nodes
            .iter()
            .filter(|n| reached.contains(n.id.as_str()))
            .cloned()
            .collect();

        let edges = self
            .edges
            .iter()
            .filter(|e| reached.contains(e.source.as_str()) && reached.contains(e.target.as_str()))
            .cloned()
            .collect();

        Some(KnowledgeGraph { nodes, edges })
    }

    fn undirected_adjacency(&self) -> HashMap<&str, Vec<&str>> {
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &self.edges {
            adjacency.entry(edge.source.as_str()).or_default().push(edge.target.as_str());
            adjacency.entry(edge.target.as_str()).or_default().push(edge.source.as_str());
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{entity_node_id, GraphBuilder, KnowledgeGraph};
    use crate::testutil::doc;
    use std::collections::HashSet;

    fn ids(graph: &KnowledgeGraph) -> HashSet<String> {
        graph.nodes.iter().map(|n| n.id.clone()).collect()
    }

    fn corpus_graph() -> KnowledgeGraph {
        GraphBuilder::build(&[
            doc("d1", "M1", &["bone loss", "microgravity"]),
            doc("d2", "M1", &["microgravity"]),
            doc("d3", "M2", &["radiation"]),
        ])
    }

    #[test]
    fn test_entity_neighborhood_is_one_hop() {
        let graph = corpus_graph();
        let hood = graph.neighborhood(&entity_node_id("microgravity")).unwrap();

        let expected: HashSet<String> = ["entity:microgravity", "doc:d1", "doc:d2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // M1 and bone loss are two hops away
        assert_eq!(ids(&hood), expected);
        assert_eq!(hood.edges.len(), 2);
    }

    #[test]
    fn test_document_neighborhood() {
        let graph = corpus_graph();
        let hood = graph.neighborhood("doc:d1").unwrap();

        let expected: HashSet<String> =
            ["doc:d1", "mission:m1", "entity:bone loss", "entity:microgravity"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        assert_eq!(ids(&hood), expected);
        assert_eq!(hood.edges.len(), 3);
        for edge in &hood.edges {
            assert!(hood.contains_node(&edge.source) && hood.contains_node(&edge.target));
        }
    }

    #[test]
    fn test_isolated_and_unknown_nodes() {
        let graph = GraphBuilder::build(&[doc("solo", "", &[])]);
        let hood = graph.neighborhood("doc:solo").unwrap();
        assert_eq!(hood.nodes.len(), 1);
        assert!(hood.edges.is_empty());

        assert!(graph.neighborhood("doc:missing").is_none());
    }

    #[test]
    fn test_depth_two_reaches_shared_mission_peers() {
        let graph = corpus_graph();
        let hood = graph.neighborhood_within("doc:d2", 2).unwrap();

        let found = ids(&hood);
        assert!(found.contains("doc:d1"));
        assert!(!found.contains("doc:d3"));
        assert!(!found.contains("entity:bone loss"));

        let zero = graph.neighborhood_within("doc:d2", 0).unwrap();
        assert_eq!(zero.nodes.len(), 1);
    }
}
