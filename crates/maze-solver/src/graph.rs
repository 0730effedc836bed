//! Append-only weighted graph used by the search engine.
//!
//! Nodes are kept in insertion order so that anything iterating the graph
//! (renderers, tests) sees a stable ordering. Adjacency lists keep edges in
//! the order they were added, which is what DFS relies on.

use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;

/// Default cost of an edge added without an explicit weight
pub const DEFAULT_COST: u32 = 1;

/// A directed edge to `to`, as stored in its source's adjacency list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    pub to: N,
    pub cost: u32,
}

/// Grid cells have at most four neighbours, so most lists stay inline.
type Adjacency<N> = SmallVec<[Edge<N>; 4]>;

/// Layout coordinate for rendering. Never read by search.
pub type Layout = (f64, f64);

#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    adjacency: Vec<Adjacency<N>>,
    positions: HashMap<N, Layout>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> Graph<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node without edges. Returns its insertion index.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(node.clone());
        self.index.insert(node, idx);
        self.adjacency.push(Adjacency::new());
        idx
    }

    /// Add a directed edge `from -> to` with the default cost.
    pub fn add_edge(&mut self, from: N, to: N) {
        self.add_edge_with_cost(from, to, DEFAULT_COST);
    }

    /// Add a directed edge `from -> to`.
    ///
    /// Both endpoints join the node set. Parallel edges are kept.
    pub fn add_edge_with_cost(&mut self, from: N, to: N, cost: u32) {
        let src = self.add_node(from);
        self.add_node(to.clone());
        self.adjacency[src].push(Edge { to, cost });
    }

    /// Outgoing edges of `node` in insertion order, empty if it has none.
    pub fn neighbors(&self, node: &N) -> &[Edge<N>] {
        match self.index.get(node) {
            Some(&idx) => self.adjacency[idx].as_slice(),
            None => &[],
        }
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        self.neighbors(from).iter().any(|e| &e.to == to)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|adj| adj.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// All edges as `(from, edge)` pairs, grouped by source in node order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &Edge<N>)> {
        self.nodes
            .iter()
            .zip(self.adjacency.iter())
            .flat_map(|(from, adj)| adj.iter().map(move |e| (from, e)))
    }

    pub fn set_positions(&mut self, positions: HashMap<N, Layout>) {
        self.positions = positions;
    }

    pub fn set_position(&mut self, node: N, layout: Layout) {
        self.positions.insert(node, layout);
    }

    pub fn position(&self, node: &N) -> Option<Layout> {
        self.positions.get(node).copied()
    }

    /// Total cost of walking `path`, taking the cheapest of any parallel edges.
    ///
    /// Returns `None` if a consecutive pair is not connected. A single-node
    /// path costs 0; an empty path has no cost.
    pub fn path_cost(&self, path: &[N]) -> Option<u64> {
        if path.is_empty() {
            return None;
        }
        let mut total: u64 = 0;
        for pair in path.windows(2) {
            let cheapest = self
                .neighbors(&pair[0])
                .iter()
                .filter(|e| e.to == pair[1])
                .map(|e| e.cost)
                .min()?;
            total += u64::from(cheapest);
        }
        Some(total)
    }
}
