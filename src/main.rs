//! CLI for maze solving

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use prim_maze::Maze;

/// The shortest way from start to finish
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Print the maze with the path marked by `.`
    #[arg(short, long)]
    show: bool,

    /// File, where to read the maze. Use `-` for stdin.
    file: PathBuf,
}

/// Read maze from file, print output
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let text = if args.file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("Cannot read {}", args.file.display()))?
    };
    let maze: Maze = text.trim_end().parse()?;
    let path = maze.solve()?;

    if args.show {
        print!("{}", maze.render_path(&path));
    }
    println!("The shortest path is {} steps.", path.len() - 1);
    Ok(())
}
