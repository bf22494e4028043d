//! Citation graph assembly
//!
//! Links become directed edges `source → target`; node rows become string
//! attributes. Node and edge iteration follow insertion order.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use pubnet_pubmed::Pmid;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::table::{LinkTable, NodeTable};

/// Ordered `(column, value)` pairs attached to a node
pub type NodeAttributes = Vec<(String, String)>;

/// Assembly switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Keep only the largest weakly-connected component
    pub connected: bool,
    /// Keep links whose target has no node row
    pub keep_unknown_nodes: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            connected: true,
            keep_unknown_nodes: false,
        }
    }
}

/// Directed citation graph keyed by pmid.
///
/// No self-loops, at most one edge per ordered pair.
#[derive(Debug, Clone, Default)]
pub struct CitationGraph {
    graph: DiGraphMap<Pmid, ()>,
    attributes: FxHashMap<Pmid, NodeAttributes>,
}

impl CitationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, pmid: Pmid) {
        self.graph.add_node(pmid);
    }

    /// Add `source → target`. Self-loops and repeated pairs are ignored;
    /// returns whether a new edge was added.
    pub fn add_edge(&mut self, source: Pmid, target: Pmid) -> bool {
        if source == target || self.graph.contains_edge(source, target) {
            return false;
        }
        self.graph.add_edge(source, target, ());
        true
    }

    /// Replace the attributes of an existing node; unknown pmids are ignored
    pub fn set_attributes(&mut self, pmid: Pmid, attributes: NodeAttributes) {
        if self.graph.contains_node(pmid) {
            self.attributes.insert(pmid, attributes);
        }
    }

    /// Attributes of `pmid`, empty when nothing is known about it
    pub fn attributes(&self, pmid: Pmid) -> &[(String, String)] {
        self.attributes.get(&pmid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn attribute(&self, pmid: Pmid, key: &str) -> Option<&str> {
        self.attributes(pmid)
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_node(&self, pmid: Pmid) -> bool {
        self.graph.contains_node(pmid)
    }

    pub fn contains_edge(&self, source: Pmid, target: Pmid) -> bool {
        self.graph.contains_edge(source, target)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = Pmid> + '_ {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = (Pmid, Pmid)> + '_ {
        self.graph.all_edges().map(|(s, t, _)| (s, t))
    }

    /// Nodes reachable from `pmid` ignoring edge direction
    fn undirected_neighbors(&self, pmid: Pmid) -> impl Iterator<Item = Pmid> + '_ {
        self.graph
            .neighbors_directed(pmid, Direction::Outgoing)
            .chain(self.graph.neighbors_directed(pmid, Direction::Incoming))
    }

    /// Subgraph on `keep`, preserving node and edge order and attributes
    pub fn induced_subgraph(&self, keep: &FxHashSet<Pmid>) -> CitationGraph {
        let mut sub = CitationGraph::new();
        for pmid in self.nodes().filter(|p| keep.contains(p)) {
            sub.add_node(pmid);
        }
        for (source, target) in self.edges() {
            if keep.contains(&source) && keep.contains(&target) {
                sub.add_edge(source, target);
            }
        }
        for (pmid, attributes) in &self.attributes {
            if keep.contains(pmid) {
                sub.attributes.insert(*pmid, attributes.clone());
            }
        }
        sub
    }
}

/// Weakly-connected components; components and their members follow node
/// insertion order of the first member reached
pub fn weakly_connected_components(graph: &CitationGraph) -> Vec<Vec<Pmid>> {
    let mut seen = FxHashSet::default();
    let mut components = Vec::new();

    for start in graph.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(pmid) = queue.pop_front() {
            for next in graph.undirected_neighbors(pmid) {
                if seen.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Induced subgraph of the largest weakly-connected component.
///
/// Ties go to the component reached first.
pub fn largest_component(graph: &CitationGraph) -> CitationGraph {
    let mut largest: Option<Vec<Pmid>> = None;
    for component in weakly_connected_components(graph) {
        if largest.as_ref().is_none_or(|l| component.len() > l.len()) {
            largest = Some(component);
        }
    }

    let keep: FxHashSet<Pmid> = largest.unwrap_or_default().into_iter().collect();
    graph.induced_subgraph(&keep)
}

/// Whether the graph is non-empty and has exactly one weak component
pub fn is_weakly_connected(graph: &CitationGraph) -> bool {
    !graph.is_empty() && weakly_connected_components(graph).len() == 1
}

/// Build the citation graph from link and node tables
pub fn assemble(links: &LinkTable, nodes: &NodeTable, options: GraphOptions) -> CitationGraph {
    let known = nodes.pmids();
    let mut graph = CitationGraph::new();
    let mut dropped = 0usize;

    for link in &links.rows {
        // only targets are checked: uncited sources stay
        if !options.keep_unknown_nodes && !known.contains(&link.target) {
            dropped += 1;
            continue;
        }
        // a self-citation keeps its node but not the edge
        graph.add_node(link.source);
        graph.add_node(link.target);
        graph.add_edge(link.source, link.target);
    }
    if dropped > 0 {
        log::debug!("Dropped {dropped} links to unknown targets");
    }

    if options.connected {
        let before = graph.node_count();
        graph = largest_component(&graph);
        log::debug!(
            "Largest component keeps {} of {before} nodes",
            graph.node_count()
        );
    }

    let columns = nodes.columns();
    for row in nodes.rows() {
        if !graph.contains_node(row.pmid) {
            continue;
        }
        let attributes = columns[1..]
            .iter()
            .zip(&row.fields)
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();
        graph.set_attributes(row.pmid, attributes);
    }

    log::info!(
        "Citation graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubnet_pubmed::{Information, InformationSet};

    fn links(pairs: &[(Pmid, Pmid)]) -> LinkTable {
        pairs.iter().copied().collect()
    }

    fn nodes(pmids: &[Pmid]) -> NodeTable {
        let mut table = NodeTable::new(InformationSet::from(Information::Title));
        for pmid in pmids {
            table.push(*pmid, vec![format!("title {pmid}"), String::new()]);
        }
        table
    }

    #[test]
    fn duplicates_and_self_loops_removed() {
        let graph = assemble(
            &links(&[(1, 2), (1, 2), (2, 2), (2, 3)]),
            &nodes(&[1, 2, 3]),
            GraphOptions::default(),
        );
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
        assert!(!graph.contains_edge(2, 2));
    }

    #[test]
    fn self_citation_keeps_isolated_node() {
        let options = GraphOptions {
            connected: false,
            keep_unknown_nodes: false,
        };
        let graph = assemble(&links(&[(1, 2), (3, 3)]), &nodes(&[1, 2, 3]), options);
        assert!(graph.contains_node(3));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_targets_dropped_but_not_sources() {
        let options = GraphOptions {
            connected: false,
            keep_unknown_nodes: false,
        };
        let graph = assemble(&links(&[(9, 1), (1, 8), (1, 2)]), &nodes(&[1, 2]), options);

        assert!(graph.contains_edge(9, 1));
        assert!(!graph.contains_node(8));
        assert!(graph.edges().all(|(_, t)| graph.contains_node(t) && t != 8));
        assert!(graph.attributes(9).is_empty());
        assert_eq!(graph.attribute(1, "title"), Some("title 1"));
    }

    #[test]
    fn unknown_targets_kept_on_request() {
        let options = GraphOptions {
            connected: false,
            keep_unknown_nodes: true,
        };
        let graph = assemble(&links(&[(1, 8), (1, 2)]), &nodes(&[1, 2]), options);
        assert!(graph.contains_edge(1, 8));
        assert!(graph.attributes(8).is_empty());
    }

    #[test]
    fn connected_keeps_largest_component() {
        let table = links(&[(1, 2), (3, 4), (4, 5), (6, 6)]);
        let known = nodes(&[1, 2, 3, 4, 5, 6]);

        let all = assemble(
            &table,
            &known,
            GraphOptions {
                connected: false,
                keep_unknown_nodes: false,
            },
        );
        let connected = assemble(&table, &known, GraphOptions::default());

        assert!(is_weakly_connected(&connected));
        assert!(!is_weakly_connected(&all));
        assert!(connected.node_count() <= all.node_count());
        assert_eq!(connected.nodes().collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn component_tie_goes_to_first() {
        let graph = assemble(
            &links(&[(5, 6), (1, 2)]),
            &nodes(&[1, 2, 5, 6]),
            GraphOptions::default(),
        );
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn components_ignore_direction() {
        let mut graph = CitationGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(3, 2);
        graph.add_edge(4, 5);
        assert_eq!(
            weakly_connected_components(&graph),
            vec![vec![1, 2, 3], vec![4, 5]]
        );
    }

    #[test]
    fn empty_links_give_empty_graph() {
        let graph = assemble(&LinkTable::default(), &nodes(&[1]), GraphOptions::default());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert!(!is_weakly_connected(&graph));
    }

    #[test]
    fn attributes_only_for_known_nodes() {
        let mut graph = CitationGraph::new();
        graph.add_node(1);
        graph.set_attributes(2, vec![("title".into(), "x".into())]);
        assert!(!graph.contains_node(2));
        assert!(graph.attributes(2).is_empty());
    }
}
