use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use bbc_dist::{annotate_distances, DistanceOptions, SolveOptions};
use bbc_store::{load_archive, save_archive, DISTANCE_ARCHIVE, SEARCH_ARCHIVE};
use clap::Args;

#[derive(Args, Debug)]
pub struct DistanceArgs {
    /// Directory holding the search archive; the annotated archive is written next to it.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Archive to annotate instead of `<out>/codes_no_distance.bin`.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Worker threads (0 = one per core).
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
    /// Time budget per logical operator in seconds; 0 disables the limit.
    #[arg(long, default_value_t = 60)]
    pub time_limit_secs: u64,
    /// Node budget per logical operator.
    #[arg(long)]
    pub node_limit: Option<u64>,
    /// Recompute records that already carry an exact distance.
    #[arg(long)]
    pub recompute: bool,
}

pub fn run(args: &DistanceArgs) -> Result<(), Box<dyn Error>> {
    let input = args
        .input
        .clone()
        .unwrap_or_else(|| args.out.join(SEARCH_ARCHIVE));
    let mut archive = load_archive(&input)?;

    let options = DistanceOptions {
        solve: SolveOptions {
            time_limit: (args.time_limit_secs > 0)
                .then(|| Duration::from_secs(args.time_limit_secs)),
            node_limit: args.node_limit,
        },
        recompute: args.recompute,
        parallelism: args.threads,
    };
    let summary = annotate_distances(&mut archive.configs, &options)?;
    archive.stamp("distance")?;
    save_archive(&args.out.join(DISTANCE_ARCHIVE), &archive)?;

    println!(
        "distances: {} computed, {} failed, {} skipped",
        summary.computed, summary.failed, summary.skipped
    );
    Ok(())
}
