//! Grid coordinates and the two maze generators.
//!
//! `generate_maze` builds the directed maze used for the BFS/DFS/A*
//! comparison: an open cell only links to its right and bottom neighbours,
//! so every generated maze is a DAG that can only be walked down or right.
//! Goals above or to the left of the start are never reachable. This is
//! kept on purpose so results match the mazes people already compare against.
//!
//! `Grid` is the plain obstacle grid: open cells connect to every open
//! 4-neighbour in both directions.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Graph, Layout};

/// A cell coordinate. Ordered by row, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Taxicab distance. Widened to `u64` so opposite corners of the `i32`
    /// plane do not overflow.
    pub fn manhattan(&self, other: &Position) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.col.abs_diff(other.col))
    }

    pub fn offset(self, (dr, dc): (i32, i32)) -> Position {
        Position::new(self.row + dr, self.col + dc)
    }

    /// Renderer layout: columns left to right, rows growing downward.
    pub fn layout(&self) -> Layout {
        (f64::from(self.col), -f64::from(self.row))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Move order for the undirected grid: right, left, down, up.
pub const GRID_MOVES: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Move order for the directed maze: right, then down.
pub const MAZE_MOVES: [(i32, i32); 2] = [(0, 1), (1, 0)];

/// Parameters for random maze generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Probability that a cell is an obstacle
    pub obstacle_prob: f64,
    /// Fixed seed for reproducible mazes; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            obstacle_prob: 0.3,
            seed: None,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.obstacle_prob) {
            return Err(Error::invalid(format!(
                "obstacle probability must be within [0, 1], got {}",
                self.obstacle_prob
            )));
        }
        if self.rows > i32::MAX as usize || self.cols > i32::MAX as usize {
            return Err(Error::invalid(format!(
                "maze dimensions {}x{} are too large",
                self.rows, self.cols
            )));
        }
        Ok(())
    }

    /// Bottom-right corner, the default goal.
    pub fn far_corner(&self) -> Position {
        Position::new(
            self.rows.saturating_sub(1) as i32,
            self.cols.saturating_sub(1) as i32,
        )
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Generate the directed down/right maze.
///
/// Each cell is open with probability `1 - obstacle_prob`; an open cell gets
/// an edge to its right and bottom neighbours when they are in bounds,
/// whether or not those neighbours are open themselves.
pub fn generate_maze(config: &MazeConfig) -> Result<Graph<Position>> {
    config.validate()?;
    let mut rng = config.rng();
    let mut maze = Graph::new();

    for r in 0..config.rows as i32 {
        for c in 0..config.cols as i32 {
            let cell = Position::new(r, c);
            if rng.gen::<f64>() > config.obstacle_prob {
                for delta in MAZE_MOVES {
                    let next = cell.offset(delta);
                    if config.in_bounds(next) {
                        maze.add_edge(cell, next);
                    }
                }
            }
        }
    }

    let positions: HashMap<Position, Layout> = (0..config.rows as i32)
        .flat_map(|r| (0..config.cols as i32).map(move |c| Position::new(r, c)))
        .map(|p| (p, p.layout()))
        .collect();
    maze.set_positions(positions);

    tracing::debug!(
        rows = config.rows,
        cols = config.cols,
        nodes = maze.node_count(),
        edges = maze.edge_count(),
        "generated directed maze"
    );
    Ok(maze)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Open,
    Wall,
}

/// Undirected 4-connected obstacle grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with no walls
    pub fn open(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Open; rows * cols],
        }
    }

    /// Parse a grid from text rows: `.` is open, `#` is a wall.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(Error::invalid(format!(
                    "grid row {} has {} cells, expected {}",
                    r,
                    line.chars().count(),
                    cols
                )));
            }
            for ch in line.chars() {
                cells.push(match ch {
                    '.' => Cell::Open,
                    '#' => Cell::Wall,
                    other => {
                        return Err(Error::invalid(format!(
                            "unexpected grid character {:?} in row {}",
                            other, r
                        )))
                    }
                });
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// Random obstacle grid. `start` and `goal` are always left open.
    pub fn generate(config: &MazeConfig, start: Position, goal: Position) -> Result<Self> {
        config.validate()?;
        for (name, pos) in [("start", start), ("goal", goal)] {
            if !config.in_bounds(pos) {
                return Err(Error::invalid(format!(
                    "{} {} is outside the {}x{} grid",
                    name, pos, config.rows, config.cols
                )));
            }
        }

        let mut rng = config.rng();
        let cells = (0..config.rows * config.cols)
            .map(|_| {
                if rng.gen::<f64>() > config.obstacle_prob {
                    Cell::Open
                } else {
                    Cell::Wall
                }
            })
            .collect();
        let mut grid = Self {
            rows: config.rows,
            cols: config.cols,
            cells,
        };
        grid.set(start, Cell::Open);
        grid.set(goal, Cell::Open);
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        (r < self.rows && c < self.cols).then(|| r * self.cols + c)
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Open)
    }

    /// Set a cell; out-of-bounds positions are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    pub fn set_wall(&mut self, pos: Position) {
        self.set(pos, Cell::Wall);
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows as i32)
            .flat_map(move |r| (0..self.cols as i32).map(move |c| Position::new(r, c)))
            .filter(move |&p| self.is_open(p))
    }

    /// Build the search graph: every open cell is a node, linked to each
    /// open neighbour in `GRID_MOVES` order.
    pub fn to_graph(&self) -> Graph<Position> {
        let mut graph = Graph::new();
        for cell in self.open_cells() {
            graph.add_node(cell);
            graph.set_position(cell, cell.layout());
            for delta in GRID_MOVES {
                let next = cell.offset(delta);
                if self.is_open(next) {
                    graph.add_edge(cell, next);
                }
            }
        }
        graph
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows as i32 {
            for c in 0..self.cols as i32 {
                let ch = match self.cell(Position::new(r, c)) {
                    Some(Cell::Wall) => '#',
                    _ => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(rows: usize, cols: usize, obstacle_prob: f64, seed: u64) -> MazeConfig {
        MazeConfig {
            rows,
            cols,
            obstacle_prob,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_manhattan() {
        let a = Position::new(0, 0);
        let b = Position::new(3, -2);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(b.manhattan(&a), 5);
        assert_eq!(a.manhattan(&a), 0);
    }

    #[test]
    fn test_manhattan_at_extreme_coordinates() {
        let low = Position::new(i32::MIN, i32::MIN);
        let high = Position::new(i32::MAX, i32::MAX);
        assert_eq!(low.manhattan(&high), 2 * u64::from(u32::MAX));
        assert_eq!(high.manhattan(&low), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_maze_edges_only_go_down_or_right() {
        let maze = generate_maze(&seeded(8, 8, 0.3, 7)).unwrap();
        for (from, edge) in maze.edges() {
            let delta = (edge.to.row - from.row, edge.to.col - from.col);
            assert!(MAZE_MOVES.contains(&delta), "unexpected edge {from} -> {}", edge.to);
            assert!(edge.to.row < 8 && edge.to.col < 8);
        }
    }

    #[test]
    fn test_maze_without_obstacles_is_full_dag() {
        let maze = generate_maze(&seeded(3, 4, 0.0, 1)).unwrap();
        // 3 rows x 3 horizontal links + 2 x 4 vertical links
        assert_eq!(maze.edge_count(), 9 + 8);
        assert_eq!(maze.node_count(), 12);
        assert_eq!(maze.position(&Position::new(2, 1)), Some((1.0, -2.0)));
    }

    #[test]
    fn test_maze_all_obstacles_has_no_edges() {
        let maze = generate_maze(&seeded(5, 5, 1.0, 3)).unwrap();
        assert_eq!(maze.edge_count(), 0);
        assert!(maze.is_empty());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = seeded(10, 10, 0.3, 42);
        let a: Vec<_> = generate_maze(&config).unwrap().edges().map(|(f, e)| (*f, e.to)).collect();
        let b: Vec<_> = generate_maze(&config).unwrap().edges().map(|(f, e)| (*f, e.to)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let config = seeded(4, 4, 1.5, 0);
        assert!(matches!(generate_maze(&config), Err(Error::InvalidInput(_))));
        let config = seeded(4, 4, f64::NAN, 0);
        assert!(matches!(generate_maze(&config), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_grid_generate_keeps_endpoints_open() {
        let config = seeded(6, 6, 1.0, 9);
        let start = Position::new(0, 0);
        let goal = Position::new(5, 5);
        let grid = Grid::generate(&config, start, goal).unwrap();
        assert!(grid.is_open(start));
        assert!(grid.is_open(goal));
        assert_eq!(grid.open_cells().count(), 2);
    }

    #[test]
    fn test_grid_generate_rejects_out_of_bounds_endpoint() {
        let config = seeded(3, 3, 0.3, 9);
        let result = Grid::generate(&config, Position::new(0, 0), Position::new(3, 0));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_grid_to_graph_is_symmetric() {
        let grid = Grid::from_rows(&["..#", ".#.", "..."]).unwrap();
        let graph = grid.to_graph();

        assert_eq!(graph.node_count(), 7);
        for (from, edge) in graph.edges() {
            assert!(graph.contains_edge(&edge.to, from));
            assert!(grid.is_open(edge.to));
        }
        // (1, 2) only touches (2, 2)
        let isolated: Vec<_> = graph.neighbors(&Position::new(1, 2)).iter().map(|e| e.to).collect();
        assert_eq!(isolated, vec![Position::new(2, 2)]);
    }

    #[test]
    fn test_grid_neighbor_order_is_right_left_down_up() {
        let graph = Grid::open(3, 3).to_graph();
        let order: Vec<_> = graph.neighbors(&Position::new(1, 1)).iter().map(|e| e.to).collect();
        assert_eq!(
            order,
            vec![
                Position::new(1, 2),
                Position::new(1, 0),
                Position::new(2, 1),
                Position::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_grid_from_rows_rejects_bad_input() {
        assert!(Grid::from_rows(&["..", "."]).is_err());
        assert!(Grid::from_rows(&[".x"]).is_err());
    }

    #[test]
    fn test_grid_display_round_trips_text() {
        let rows = [".#.", "..#"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_string(), ".#.\n..#\n");
    }
}
