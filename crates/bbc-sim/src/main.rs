use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use serde::Serialize;

use commands::{
    distance::{self, DistanceArgs},
    search::{self, SearchArgs},
    summary::{self, SummaryArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bbc-sim", about = "Bivariate bicycle code search CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate polynomial pairs and store every code above the rate threshold.
    Search(SearchArgs),
    /// Compute exact distances for a stored search archive.
    Distance(DistanceArgs),
    /// Print aggregate statistics of an archive.
    Summary(SummaryArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::Search(args) => search::run(&args),
        Command::Distance(args) => distance::run(&args),
        Command::Summary(args) => summary::run(&args),
    }
}

pub(crate) fn write_json<T: Serialize>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}
