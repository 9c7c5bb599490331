use std::error::Error;
use std::path::PathBuf;

use bbc_store::{load_archive, summarize};
use clap::Args;

use crate::write_json;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Archive to summarise (`.json` or binary).
    #[arg(long)]
    pub input: PathBuf,
    /// Also write the summary as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

pub fn run(args: &SummaryArgs) -> Result<(), Box<dyn Error>> {
    let archive = load_archive(&args.input)?;
    let summary = summarize(&archive);

    println!(
        "{} records ({} distinct codes) from stage '{}'",
        summary.records, summary.distinct_codes, summary.stage
    );
    println!(
        "distances: {} exact, {} failed, {} pending",
        summary.distances_exact, summary.distances_failed, summary.distances_pending
    );
    for entry in &summary.parameters {
        let distance = entry
            .distance
            .map_or_else(|| "?".to_string(), |d| d.to_string());
        println!("[[{}, {}, {}]] x {}", entry.n, entry.k, distance, entry.count);
    }

    if let Some(path) = &args.json {
        write_json(path, &summary)?;
    }
    Ok(())
}
