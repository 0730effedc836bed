//! CLI entry point for the maze solver.
//!
//! Usage:
//!   maze-solver queens [N] [--json]
//!   maze-solver search --algorithm <bfs|dfs|astar> [maze options]
//!   maze-solver compare [maze options]
//!
//! Maze options:
//!   --kind <directed|grid>  Down/right maze or undirected obstacle grid (default: directed)
//!   --rows <n>              Rows (default: 10)
//!   --cols <n>              Columns (default: 10)
//!   --obstacle-prob <p>     Obstacle probability (default: 0.3)
//!   --seed <n>              Seed for a reproducible maze
//!   --start <row,col>       Start cell (default: 0,0)
//!   --goal <row,col>        Goal cell (default: bottom-right corner)
//!
//! Logs go to stderr; set RUST_LOG or pass -v/-vv/-vvv.

use std::io::{self, BufRead, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maze_solver::{
    compare, generate_maze, parse_board_size, search, solve, Error, Graph, Grid, MazeConfig,
    Position, Result, SearchResult, Strategy,
};

#[derive(Parser)]
#[command(name = "maze-solver")]
#[command(about = "Grid pathfinding and N-Queens backtracking")]
#[command(version)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enumerate every N-Queens solution
    Queens {
        /// Board size; prompted for on stdin when omitted
        #[arg(value_name = "N")]
        n: Option<String>,

        /// Print solutions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a maze and search it with one algorithm
    Search {
        #[arg(long, value_enum, default_value = "bfs")]
        algorithm: Algorithm,

        #[command(flatten)]
        maze: MazeArgs,
    },
    /// Generate a maze and run BFS, DFS and A* on it
    Compare {
        #[command(flatten)]
        maze: MazeArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    Bfs,
    Dfs,
    Astar,
}

impl From<Algorithm> for Strategy {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Bfs => Strategy::BreadthFirst,
            Algorithm::Dfs => Strategy::DepthFirst,
            Algorithm::Astar => Strategy::AStar,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MazeKind {
    /// Edges only run right and down
    Directed,
    /// Undirected 4-connected obstacle grid
    Grid,
}

#[derive(Args)]
struct MazeArgs {
    #[arg(long, value_enum, default_value = "directed")]
    kind: MazeKind,

    #[arg(long, default_value = "10")]
    rows: usize,

    #[arg(long, default_value = "10")]
    cols: usize,

    /// Probability that a cell is an obstacle
    #[arg(long, default_value = "0.3")]
    obstacle_prob: f64,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_parser = parse_position, default_value = "0,0")]
    start: Position,

    /// Defaults to the bottom-right corner
    #[arg(long, value_parser = parse_position)]
    goal: Option<Position>,
}

impl MazeArgs {
    fn config(&self) -> MazeConfig {
        MazeConfig {
            rows: self.rows,
            cols: self.cols,
            obstacle_prob: self.obstacle_prob,
            seed: self.seed,
        }
    }

    fn build(&self) -> Result<(Graph<Position>, Position, Position)> {
        let config = self.config();
        let goal = self.goal.unwrap_or_else(|| config.far_corner());
        let graph = match self.kind {
            MazeKind::Directed => generate_maze(&config)?,
            MazeKind::Grid => Grid::generate(&config, self.start, goal)?.to_graph(),
        };
        Ok((graph, self.start, goal))
    }
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {:?}", s))?;
    let row = row.trim().parse().map_err(|e| format!("bad row {:?}: {}", row, e))?;
    let col = col.trim().parse().map_err(|e| format!("bad column {:?}: {}", col, e))?;
    Ok(Position::new(row, col))
}

/// Output format for one search
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    algorithm: String,
    found: bool,
    path: Vec<Position>,
    path_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<usize>,
    visited_count: usize,
    elapsed_ms: f64,
}

impl From<&SearchResult<Position>> for SearchOutput {
    fn from(result: &SearchResult<Position>) -> Self {
        Self {
            algorithm: result.strategy.name().to_string(),
            found: result.found(),
            path: result.path.clone(),
            path_length: result.path_length(),
            steps: result.steps(),
            visited_count: result.visited_count,
            elapsed_ms: result.elapsed.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareOutput {
    start: Position,
    goal: Position,
    results: Vec<SearchOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accuracy: Option<f64>,
}

#[derive(Debug, Serialize)]
struct QueensOutput {
    n: usize,
    count: usize,
    solutions: Vec<Vec<Vec<u8>>>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = run(
        cli.command,
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut io::stderr(),
    );
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Execute one command. Reports go to `out`; the board-size prompt goes to
/// `err` when `out` must stay valid JSON.
fn run<R: BufRead, W: Write, E: Write>(
    command: Commands,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> Result<()> {
    match command {
        Commands::Queens { n, json } => {
            let raw = match n {
                Some(n) => n,
                None if json => prompt_board_size(input, &mut *err)?,
                None => prompt_board_size(input, &mut *out)?,
            };
            let n = parse_board_size(&raw)?;
            let solutions = solve(n)?;

            if json {
                let output = QueensOutput {
                    n,
                    count: solutions.len(),
                    solutions: solutions.iter().map(|s| s.rows()).collect(),
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
            } else {
                writeln!(out, "\nTotal solutions found: {}\n", solutions.len())?;
                for (idx, solution) in solutions.iter().enumerate() {
                    writeln!(out, "Solution {}:", idx + 1)?;
                    writeln!(out, "{}", solution)?;
                }
            }
        }
        Commands::Search { algorithm, maze } => {
            let (graph, start, goal) = maze.build()?;
            let result = search(&graph, &start, &goal, algorithm.into());
            tracing::info!(
                algorithm = %result.strategy,
                found = result.found(),
                visited = result.visited_count,
                "search complete"
            );
            let output = SearchOutput::from(&result);
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        Commands::Compare { maze } => {
            let (graph, start, goal) = maze.build()?;
            let comparison = compare(&graph, &start, &goal);
            let output = CompareOutput {
                start,
                goal,
                results: comparison.results.iter().map(SearchOutput::from).collect(),
                accuracy: comparison.accuracy(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn prompt_board_size<R: BufRead, W: Write>(input: &mut R, prompt: &mut W) -> Result<String> {
    writeln!(prompt, "Enter the number of queens")?;
    prompt.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::invalid("no board size given on stdin"));
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_captured(command: Commands, stdin: &str) -> (Result<()>, String, String) {
        let mut input = stdin.as_bytes();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = run(command, &mut input, &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn grid_maze(seed: u64) -> MazeArgs {
        MazeArgs {
            kind: MazeKind::Grid,
            rows: 5,
            cols: 5,
            obstacle_prob: 0.0,
            seed: Some(seed),
            start: Position::new(0, 0),
            goal: None,
        }
    }

    #[test]
    fn test_queens_text_output_after_prompt() {
        let command = Commands::Queens {
            n: None,
            json: false,
        };
        let (result, out, err) = run_captured(command, "4\n");

        assert!(result.is_ok());
        assert!(err.is_empty());
        assert!(out.starts_with("Enter the number of queens\n"));
        assert!(out.contains("Total solutions found: 2"));
        let first = "Solution 1:\n[0, 1, 0, 0]\n[0, 0, 0, 1]\n[1, 0, 0, 0]\n[0, 0, 1, 0]\n";
        assert!(out.contains(first));
        assert!(out.contains("Solution 2:\n[0, 0, 1, 0]\n"));
    }

    #[test]
    fn test_queens_json_from_stdin_stays_parseable() {
        let command = Commands::Queens { n: None, json: true };
        let (result, out, err) = run_captured(command, "4\n");

        assert!(result.is_ok());
        assert_eq!(err, "Enter the number of queens\n");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["n"], 4);
        assert_eq!(value["count"], 2);
        assert_eq!(value["solutions"][0][0], serde_json::json!([0, 1, 0, 0]));
    }

    #[test]
    fn test_queens_argument_skips_prompt() {
        let command = Commands::Queens {
            n: Some("1".to_string()),
            json: false,
        };
        let (result, out, _) = run_captured(command, "");

        assert!(result.is_ok());
        assert!(!out.contains("Enter the number of queens"));
        assert!(out.contains("Total solutions found: 1"));
        assert!(out.contains("[1]"));
    }

    #[test]
    fn test_queens_rejects_bad_size() {
        let command = Commands::Queens { n: None, json: true };
        let (result, out, _) = run_captured(command, "-2\n");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(out.is_empty());

        let command = Commands::Queens { n: None, json: true };
        let (result, _, _) = run_captured(command, "");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_search_report_is_json() {
        let command = Commands::Search {
            algorithm: Algorithm::Astar,
            maze: grid_maze(3),
        };
        let (result, out, _) = run_captured(command, "");

        assert!(result.is_ok());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["algorithm"], "A*");
        assert_eq!(value["found"], true);
        assert_eq!(value["pathLength"], 9);
        assert_eq!(value["steps"], 8);
    }

    #[test]
    fn test_compare_report_lists_every_algorithm() {
        let (result, out, _) = run_captured(Commands::Compare { maze: grid_maze(11) }, "");

        assert!(result.is_ok());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let names: Vec<&str> = value["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["algorithm"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["BFS", "DFS", "A*"]);
        assert_eq!(value["goal"], serde_json::json!({ "row": 4, "col": 4 }));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("2, 3").unwrap(), Position::new(2, 3));
        assert!(parse_position("2").is_err());
        assert!(parse_position("a,1").is_err());
    }
}
