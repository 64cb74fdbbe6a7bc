//! CLI for maze generation

use clap::Parser;
use log::info;
use prim_maze::{ExecutionMode, Grid, MazeGenerator};

/// Perfect maze generator, prints the open walls
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = 32)]
    rows: usize,

    /// Number of columns
    #[arg(long, default_value_t = 32)]
    cols: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Generate one wall at a time, logging every step
    #[arg(long)]
    step: bool,
}

/// Generate maze, print one open wall per line
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut gen = MazeGenerator::new(args.seed);
    let mut grid = Grid::build(args.rows, args.cols)?;
    let mut generation = gen.run(&mut grid, ExecutionMode::from_step_flag(args.step));
    while !generation.state().is_finished() {
        generation.step();
        info!(
            "step {}: {} walls open, {} in frontier",
            generation.steps(),
            generation.grid().open_edge_count(),
            generation.frontier().len()
        );
    }

    for edge in grid.open_edges() {
        let (a, b) = grid.endpoints(edge);
        println!("{a} - {b}");
    }
    Ok(())
}
