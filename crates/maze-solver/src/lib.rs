//! Search and backtracking core for maze and puzzle visualizers.
//!
//! Two independent pieces live here:
//!
//! - a grid/graph model with BFS, DFS and A* path search, plus random maze
//!   generators that feed it;
//! - an N-Queens backtracker that enumerates every solution.
//!
//! Front ends (renderers, plotters) call in and receive plain data: paths,
//! visited counts, timings and solution boards.

pub mod error;
pub mod graph;
pub mod grid;
pub mod queens;
pub mod search;

// Re-export main types
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Layout};
pub use grid::{generate_maze, Cell, Grid, MazeConfig, Position};
pub use queens::{count_solutions, parse_board_size, solve, Board, QueenGuard, Solution};
pub use search::{
    astar, bfs, compare, dfs, search, Comparison, SearchNode, SearchResult, Strategy,
};
