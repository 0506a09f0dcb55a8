use std::collections::{BTreeMap, BTreeSet};

use mapwright_parser::LinkDecl;
use serde::{Deserialize, Serialize};

/// One node of the dependency graph. `descendants` is the transitive
/// closure, not just direct successors; `link_ids` unions the labels of
/// every link whose start is this node or any of its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub name: String,
    pub descendants: BTreeSet<String>,
    pub link_ids: BTreeSet<String>,
}

/// Directed graph over link endpoints.
///
/// Cycles are expected input, not an error: traversal carries a visited
/// set, so construction always terminates and a node never lists itself
/// as its own descendant. Members of a cycle do list each other, which
/// mirrors how the highlighting UI treats anything downstream of a cycle
/// as reachable from every member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, DependencyNode>,
}

fn link_id(start: &str, end: &str) -> String {
    format!("{}->{}", start, end)
}

impl DependencyGraph {
    /// Build the graph from parsed links, computing transitive closures
    /// up front so queries are lookups.
    pub fn build(links: &[LinkDecl]) -> Self {
        let mut edges: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for link in links {
            edges.entry(&link.start).or_default().insert(&link.end);
            edges.entry(&link.end).or_default();
        }

        let mut nodes = BTreeMap::new();
        for name in edges.keys().copied() {
            let descendants = collect_descendants(name, &edges);

            let mut link_ids = BTreeSet::new();
            for link in links {
                if link.start == name || descendants.contains(link.start.as_str()) {
                    link_ids.insert(link_id(&link.start, &link.end));
                }
            }

            nodes.insert(
                name.to_string(),
                DependencyNode {
                    name: name.to_string(),
                    descendants: descendants.into_iter().map(|s| s.to_string()).collect(),
                    link_ids,
                },
            );
        }

        Self { nodes }
    }

    pub fn node(&self, name: &str) -> Option<&DependencyNode> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Transitive descendants of `name`; empty for unknown names.
    pub fn get_descendants(&self, name: &str) -> BTreeSet<String> {
        self.nodes
            .get(name)
            .map(|node| node.descendants.clone())
            .unwrap_or_default()
    }

    /// Labels of every link reachable from `name`; empty for unknown
    /// names.
    pub fn get_descendant_links(&self, name: &str) -> BTreeSet<String> {
        self.nodes
            .get(name)
            .map(|node| node.link_ids.clone())
            .unwrap_or_default()
    }

    pub fn has_descendants(&self, name: &str) -> bool {
        self.nodes
            .get(name)
            .is_some_and(|node| !node.descendants.is_empty())
    }
}

/// Depth-first reachability with a visited set seeded with the origin:
/// the seed is both the cycle guard and what keeps a node out of its own
/// descendant set.
fn collect_descendants<'a>(
    origin: &'a str,
    edges: &BTreeMap<&'a str, BTreeSet<&'a str>>,
) -> BTreeSet<&'a str> {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    visited.insert(origin);
    let mut result = BTreeSet::new();
    let mut stack: Vec<&str> = edges
        .get(origin)
        .map(|successors| successors.iter().copied().collect())
        .unwrap_or_default();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        result.insert(current);
        if let Some(successors) = edges.get(current) {
            stack.extend(successors.iter().copied());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapwright_parser::{LinkKind, Span};

    fn link(start: &str, end: &str) -> LinkDecl {
        LinkDecl {
            start: start.to_string(),
            start_span: Span::new(0, start.len()),
            end: end.to_string(),
            end_span: Span::new(start.len() + 2, start.len() + 2 + end.len()),
            kind: LinkKind::Dependency,
            context: None,
            line: 1,
        }
    }

    #[test]
    fn chain_produces_transitive_descendants() {
        let graph = DependencyGraph::build(&[link("A", "B"), link("B", "C"), link("C", "D")]);

        let descendants = graph.get_descendants("A");
        assert_eq!(
            descendants,
            ["B", "C", "D"].iter().map(|s| s.to_string()).collect()
        );
        assert!(graph.has_descendants("A"));
        assert!(!graph.has_descendants("D"));
    }

    #[test]
    fn descendant_links_include_downstream_edges() {
        let graph = DependencyGraph::build(&[link("A", "B"), link("B", "C")]);

        let links = graph.get_descendant_links("A");
        assert!(links.contains("A->B"));
        assert!(links.contains("B->C"));

        let links = graph.get_descendant_links("B");
        assert_eq!(links.len(), 1);
        assert!(links.contains("B->C"));
    }

    #[test]
    fn three_node_cycle_terminates_and_stays_finite() {
        let graph = DependencyGraph::build(&[link("A", "B"), link("B", "C"), link("C", "A")]);

        for name in ["A", "B", "C"] {
            let descendants = graph.get_descendants(name);
            assert!(!descendants.is_empty());
            assert_eq!(descendants.len(), 2);
            // A node never lists itself, even inside a cycle.
            assert!(!descendants.contains(name));
        }

        // Cycle members do list each other; preserved behavior.
        assert!(graph.get_descendants("A").contains("B"));
        assert!(graph.get_descendants("B").contains("A"));
    }

    #[test]
    fn self_link_does_not_self_list() {
        let graph = DependencyGraph::build(&[link("A", "A"), link("A", "B")]);
        let descendants = graph.get_descendants("A");
        assert!(!descendants.contains("A"));
        assert!(descendants.contains("B"));
    }

    #[test]
    fn unknown_names_answer_empty() {
        let graph = DependencyGraph::build(&[link("A", "B")]);
        assert!(graph.get_descendants("Zed").is_empty());
        assert!(graph.get_descendant_links("Zed").is_empty());
        assert!(!graph.has_descendants("Zed"));
    }

    #[test]
    fn endpoints_become_nodes_even_without_outgoing_links() {
        let graph = DependencyGraph::build(&[link("A", "B")]);
        assert_eq!(graph.len(), 2);
        assert!(graph.node("B").is_some());
        assert!(graph.get_descendants("B").is_empty());
    }
}
