//! CLI for maze generation

use anyhow::Context;
use clap::Parser;
use prim_maze::{FinishPlacement, MazeGenerator};

/// Random maze carved with Prim's algorithm
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width, border included
    #[arg(long, default_value_t = 17)]
    width: usize,

    /// Maze height, border included
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Random seed. Without it, every run gives a different maze.
    #[arg(long)]
    seed: Option<u64>,

    /// Put the finish on the square furthest from start
    #[arg(long)]
    farthest_finish: bool,
}

/// Generate maze, print it
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let placement = if args.farthest_finish {
        FinishPlacement::Farthest
    } else {
        FinishPlacement::LastCarved
    };
    let maze = MazeGenerator::new(args.seed)
        .with_finish(placement)
        .generate_maze(args.width, args.height)
        .context("Cannot generate maze")?;
    print!("{}", maze.render());
    Ok(())
}
