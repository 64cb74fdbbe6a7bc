//! CLI for maze solving

use anyhow::{anyhow, Context};
use clap::Parser;
use itertools::Itertools;
use log::{debug, info, warn};
use prim_maze::{Cell, Direction, ExecutionMode, Grid, MazeGenerator, PathSearch, Walker};

/// Generate a perfect maze and find the shortest way through it
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
    step_generation: bool,

    /// Search one node at a time, logging every step
    #[arg(long)]
    step_search: bool,

    /// Entrance as `ROW,COL`. Random cell on the first column by default.
    #[arg(long, value_parser = parse_cell)]
    entrance: Option<Cell>,

    /// Exit as `ROW,COL`. Random cell on the last column by default.
    #[arg(long, value_parser = parse_cell)]
    exit: Option<Cell>,

    /// Walk from the entrance with these moves, e.g. `RRDLU`
    #[arg(short, long)]
    moves: Option<String>,
}

fn parse_cell(s: &str) -> anyhow::Result<Cell> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("Expected ROW,COL, got `{s}`"))?;
    Ok(Cell::new(row.trim().parse()?, col.trim().parse()?))
}

/// Generate the maze, search a path and optionally walk it
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut generator = MazeGenerator::new(args.seed);
    let mut grid = Grid::build(args.rows, args.cols)?;
    {
        let mut generation =
            generator.run(&mut grid, ExecutionMode::from_step_flag(args.step_generation));
        while !generation.state().is_finished() {
            generation.step();
            info!(
                "generation step {}: {} walls open, {} in frontier",
                generation.steps(),
                generation.grid().open_edge_count(),
                generation.frontier().len()
            );
        }
    }

    let (random_entrance, random_exit) = generator.pick_entrance_and_exit(&grid);
    let entrance = args.entrance.unwrap_or(random_entrance);
    let exit = args.exit.unwrap_or(random_exit);

    let mut search = PathSearch::start(
        &grid,
        entrance,
        exit,
        ExecutionMode::from_step_flag(args.step_search),
    )?;
    while !search.state().is_finished() {
        search.step();
        if let Some(best) = search.best_node() {
            info!(
                "search step {}: best {best}, {} open, {} closed",
                search.steps(),
                search.open_set().count(),
                search.closed_set().count()
            );
        }
    }
    let path = search
        .finish()
        .with_context(|| format!("Maze {}x{} has no path", grid.rows(), grid.cols()))?;

    println!(
        "Maze {}x{} with {} open walls.",
        grid.rows(),
        grid.cols(),
        grid.open_edge_count()
    );
    println!(
        "The shortest path from {entrance} to {exit} is {} steps.",
        path.len() - 1
    );
    println!("{}", path.iter().join(" "));

    if let Some(moves) = args.moves {
        let mut walker = Walker::new(&grid, entrance)?;
        for c in moves.chars().filter(|c| !c.is_whitespace()) {
            let direction = Direction::from_letter(c)
                .with_context(|| format!("Unknown move `{c}`, use U, D, L or R"))?;
            match walker.step(&grid, direction) {
                Ok(cell) => debug!("walker moved to {cell}"),
                Err(err) => warn!("{err}"),
            }
            if walker.is_at(exit) {
                break;
            }
        }
        if walker.is_at(exit) {
            println!("The walker reached the exit in {} steps.", walker.steps());
        } else {
            println!(
                "The walker stopped at {} after {} steps.",
                walker.position(),
                walker.steps()
            );
        }
    }
    Ok(())
}
