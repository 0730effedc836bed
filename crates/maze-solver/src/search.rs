//! BFS, DFS and A* over a `Graph`.
//!
//! All three strategies share one traversal loop. They differ only in how
//! the frontier orders pending `(node, path)` entries:
//!
//! - BFS: FIFO queue, first path found has the fewest edges.
//! - DFS: LIFO stack; neighbours are pushed in reverse so the first
//!   adjacency entry is explored first.
//! - A*: min-heap on `f = g + h` where `g` is the edge count so far and `h`
//!   is `SearchNode::estimate`. Ties on `f` go to the smaller node, then to
//!   the entry pushed first.
//!
//! The goal test happens when an entry is popped, before the visited check.
//! An unreachable goal yields an empty path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, Graph};
use crate::grid::Position;

/// Node identifiers the engine can search over.
pub trait SearchNode: Clone + Eq + Hash + Ord + fmt::Debug {
    /// Lower bound on the number of edges from `self` to `goal`.
    ///
    /// Must never overestimate or A* loses its shortest-path guarantee.
    fn estimate(&self, _goal: &Self) -> u64 {
        0
    }
}

impl SearchNode for Position {
    fn estimate(&self, goal: &Self) -> u64 {
        self.manhattan(goal)
    }
}

macro_rules! opaque_search_node {
    ($($ty:ty),* $(,)?) => {
        $(impl SearchNode for $ty {})*
    };
}

opaque_search_node!(u8, u16, u32, u64, usize, i32, i64, char, String, &str);

/// Frontier ordering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    BreadthFirst,
    DepthFirst,
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::BreadthFirst, Strategy::DepthFirst, Strategy::AStar];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "BFS",
            Strategy::DepthFirst => "DFS",
            Strategy::AStar => "A*",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one search call
#[derive(Debug, Clone)]
pub struct SearchResult<N> {
    pub strategy: Strategy,
    /// Start to goal inclusive; empty when the goal is unreachable
    pub path: Vec<N>,
    /// Nodes whose neighbours were expanded
    pub visited_count: usize,
    pub elapsed: Duration,
}

impl<N> SearchResult<N> {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of nodes on the path
    pub fn path_length(&self) -> usize {
        self.path.len()
    }

    /// Number of edges walked, or `None` when no path was found
    pub fn steps(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

/// Heap entry for A*. Ordered so that `BinaryHeap` pops the lowest `f`.
struct Ranked<N> {
    f: u64,
    node: N,
    seq: u64,
    path: Vec<N>,
}

impl<N: Ord> Ord for Ranked<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<N: Ord> PartialOrd for Ranked<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord> PartialEq for Ranked<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Ord> Eq for Ranked<N> {}

enum Frontier<N> {
    Queue(VecDeque<(N, Vec<N>)>),
    Stack(Vec<(N, Vec<N>)>),
    Heap {
        heap: BinaryHeap<Ranked<N>>,
        next_seq: u64,
    },
}

impl<N: SearchNode> Frontier<N> {
    fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BreadthFirst => Frontier::Queue(VecDeque::new()),
            Strategy::DepthFirst => Frontier::Stack(Vec::new()),
            Strategy::AStar => Frontier::Heap {
                heap: BinaryHeap::new(),
                next_seq: 0,
            },
        }
    }

    fn push(&mut self, node: N, path: Vec<N>, goal: &N) {
        match self {
            Frontier::Queue(queue) => queue.push_back((node, path)),
            Frontier::Stack(stack) => stack.push((node, path)),
            Frontier::Heap { heap, next_seq } => {
                let g = path.len().saturating_sub(1) as u64;
                let f = g.saturating_add(node.estimate(goal));
                heap.push(Ranked {
                    f,
                    node,
                    seq: *next_seq,
                    path,
                });
                *next_seq += 1;
            }
        }
    }

    fn pop(&mut self) -> Option<(N, Vec<N>)> {
        match self {
            Frontier::Queue(queue) => queue.pop_front(),
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Heap { heap, .. } => heap.pop().map(|r| (r.node, r.path)),
        }
    }

    /// Schedule every neighbour of the node at the end of `path`.
    fn expand(&mut self, path: &[N], edges: &[Edge<N>], goal: &N) {
        let extend = |to: &N| {
            let mut next = Vec::with_capacity(path.len() + 1);
            next.extend_from_slice(path);
            next.push(to.clone());
            next
        };
        if let Frontier::Stack(_) = self {
            for edge in edges.iter().rev() {
                self.push(edge.to.clone(), extend(&edge.to), goal);
            }
        } else {
            for edge in edges {
                self.push(edge.to.clone(), extend(&edge.to), goal);
            }
        }
    }
}

/// Search `graph` for a path from `start` to `goal`.
///
/// `start == goal` returns `[start]` even if `start` is not in the graph.
pub fn search<N: SearchNode>(
    graph: &Graph<N>,
    start: &N,
    goal: &N,
    strategy: Strategy,
) -> SearchResult<N> {
    let started = Instant::now();
    let mut frontier = Frontier::new(strategy);
    let mut visited: HashSet<N> = HashSet::new();
    let mut path = Vec::new();

    frontier.push(start.clone(), vec![start.clone()], goal);

    while let Some((node, node_path)) = frontier.pop() {
        if &node == goal {
            path = node_path;
            break;
        }
        if visited.insert(node.clone()) {
            frontier.expand(&node_path, graph.neighbors(&node), goal);
        }
    }

    let result = SearchResult {
        strategy,
        path,
        visited_count: visited.len(),
        elapsed: started.elapsed(),
    };
    tracing::debug!(
        strategy = %strategy,
        start = ?start,
        goal = ?goal,
        found = result.found(),
        path_length = result.path_length(),
        visited = result.visited_count,
        "search finished"
    );
    result
}

pub fn bfs<N: SearchNode>(graph: &Graph<N>, start: &N, goal: &N) -> SearchResult<N> {
    search(graph, start, goal, Strategy::BreadthFirst)
}

pub fn dfs<N: SearchNode>(graph: &Graph<N>, start: &N, goal: &N) -> SearchResult<N> {
    search(graph, start, goal, Strategy::DepthFirst)
}

pub fn astar<N: SearchNode>(graph: &Graph<N>, start: &N, goal: &N) -> SearchResult<N> {
    search(graph, start, goal, Strategy::AStar)
}

/// Results of running every strategy on the same query
#[derive(Debug, Clone)]
pub struct Comparison<N> {
    pub results: Vec<SearchResult<N>>,
}

impl<N> Comparison<N> {
    pub fn get(&self, strategy: Strategy) -> Option<&SearchResult<N>> {
        self.results.iter().find(|r| r.strategy == strategy)
    }

    /// BFS steps as a percentage of DFS steps.
    ///
    /// 100 means DFS happened to find a shortest path. `None` when either
    /// search failed or DFS walked zero edges.
    pub fn accuracy(&self) -> Option<f64> {
        let bfs_steps = self.get(Strategy::BreadthFirst)?.steps()?;
        let dfs_steps = self.get(Strategy::DepthFirst)?.steps()?;
        if dfs_steps == 0 {
            return None;
        }
        Some(bfs_steps as f64 / dfs_steps as f64 * 100.0)
    }
}

/// Run BFS, DFS and A* in that order.
pub fn compare<N: SearchNode>(graph: &Graph<N>, start: &N, goal: &N) -> Comparison<N> {
    Comparison {
        results: Strategy::ALL
            .iter()
            .map(|&strategy| search(graph, start, goal, strategy))
            .collect(),
    }
}
