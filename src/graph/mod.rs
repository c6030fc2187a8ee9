//! Crawl graph accumulation and export
//!
//! `CrawlGraph` records which in-scope pages link to which. It is owned by the
//! crawl loop, returned in the crawl outcome, and read once at the end by the
//! renderer.

mod layout;
mod render;

pub use layout::{force_directed_layout, Position};
pub use render::{export_dot, render_graph, RenderSummary};

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Errors that can occur while exporting the graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Graph has no edges to draw")]
    Empty,

    #[error("Failed to draw graph: {0}")]
    Draw(String),

    #[error("Failed to load label font {path}: {reason}")]
    Font { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Directed page-to-page link relation
///
/// Each source maps to a set of destinations, so recording the same edge
/// twice is a no-op. Edges are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl CrawlGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `source -> d` for every `d` in `destinations`
    ///
    /// # Example
    ///
    /// ```
    /// use sitegraph::graph::CrawlGraph;
    ///
    /// let mut graph = CrawlGraph::new();
    /// graph.record_edges("https://ex.com/", ["https://ex.com/a", "https://ex.com/a"]);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn record_edges<I, T>(&mut self, source: &str, destinations: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut destinations = destinations.into_iter().peekable();
        if destinations.peek().is_none() {
            return;
        }

        self.edges
            .entry(source.to_string())
            .or_default()
            .extend(destinations.map(Into::into));
    }

    pub fn contains_edge(&self, source: &str, destination: &str) -> bool {
        self.edges
            .get(source)
            .is_some_and(|destinations| destinations.contains(destination))
    }

    /// Destinations recorded for `source`
    pub fn destinations(&self, source: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(source)
    }

    /// Iterates over every edge, sources in sorted order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().flat_map(|(source, destinations)| {
            destinations
                .iter()
                .map(move |destination| (source.as_str(), destination.as_str()))
        })
    }

    /// Every URL appearing as a source or destination
    pub fn nodes(&self) -> BTreeSet<&str> {
        self.edges()
            .flat_map(|(source, destination)| [source, destination])
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total degree (in + out) of every node
    ///
    /// A self-loop counts twice, once in each direction.
    pub fn degrees(&self) -> HashMap<&str, usize> {
        let mut degrees: HashMap<&str, usize> = HashMap::new();
        for (source, destination) in self.edges() {
            *degrees.entry(source).or_insert(0) += 1;
            *degrees.entry(destination).or_insert(0) += 1;
        }
        degrees
    }

    /// The `k` nodes with the highest total degree, ties broken by URL
    pub fn top_by_degree(&self, k: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self.degrees().into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Converts to a petgraph graph with URL node weights
    ///
    /// Nodes are inserted in sorted URL order, so indices are stable for a
    /// given edge set.
    pub fn to_petgraph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for node in self.nodes() {
            indices.insert(node, graph.add_node(node.to_string()));
        }
        for (source, destination) in self.edges() {
            graph.add_edge(indices[source], indices[destination], ());
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_edges() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("https://ex.com/", ["https://ex.com/a", "https://ex.com/b"]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 3);
        assert!(graph.contains_edge("https://ex.com/", "https://ex.com/a"));
        assert!(!graph.contains_edge("https://ex.com/a", "https://ex.com/"));
    }

    #[test]
    fn test_recording_same_edge_twice_is_idempotent() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("https://ex.com/", ["https://ex.com/a"]);
        graph.record_edges("https://ex.com/", ["https://ex.com/a"]);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.destinations("https://ex.com/").unwrap().len(), 1);
    }

    #[test]
    fn test_empty_destinations_add_nothing() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("https://ex.com/", Vec::<String>::new());

        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert!(graph.destinations("https://ex.com/").is_none());
    }

    #[test]
    fn test_edges_accumulate_across_calls() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("https://ex.com/", ["https://ex.com/a"]);
        graph.record_edges("https://ex.com/", ["https://ex.com/b"]);
        graph.record_edges("https://ex.com/a", ["https://ex.com/"]);

        let edges: Vec<(&str, &str)> = graph.edges().collect();
        assert_eq!(
            edges,
            vec![
                ("https://ex.com/", "https://ex.com/a"),
                ("https://ex.com/", "https://ex.com/b"),
                ("https://ex.com/a", "https://ex.com/"),
            ]
        );
    }

    #[test]
    fn test_degrees_count_both_directions() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("a", ["b", "c"]);
        graph.record_edges("b", ["c"]);
        graph.record_edges("c", ["c"]);

        let degrees = graph.degrees();
        assert_eq!(degrees["a"], 2);
        assert_eq!(degrees["b"], 2);
        assert_eq!(degrees["c"], 4);
    }

    #[test]
    fn test_top_by_degree() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("hub", ["a", "b", "c"]);
        graph.record_edges("a", ["b"]);

        let top = graph.top_by_degree(2);
        assert_eq!(top, vec![("hub", 3), ("a", 2)]);
        assert_eq!(graph.top_by_degree(100).len(), 4);
    }

    #[test]
    fn test_to_petgraph() {
        let mut graph = CrawlGraph::new();
        graph.record_edges("a", ["b", "c"]);
        graph.record_edges("b", ["a"]);

        let converted = graph.to_petgraph();
        assert_eq!(converted.node_count(), 3);
        assert_eq!(converted.edge_count(), 3);
        assert_eq!(converted[NodeIndex::new(0)], "a");
    }
}
