use std::error::Error;
use std::fs;
use std::path::PathBuf;

use bbc_search::{search as run_search, SearchPlan};
use bbc_store::{save_archive, stable_hash_string, ConfigArchive, SEARCH_ARCHIVE};
use clap::Args;
use log::info;
use serde_json::json;

use crate::write_json;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// YAML or JSON search plan; the reference 6x6 weight-6 plan when omitted.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Output directory for the archive and the search report.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Worker threads, overriding the plan scheduler (0 = one per core).
    #[arg(long)]
    pub threads: Option<usize>,
    /// Exclusive lower bound on the net encoding rate, overriding the plan.
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Log code parameters of every valid candidate at debug level.
    #[arg(long)]
    pub verbose: bool,
}

pub fn load_plan(args: &SearchArgs) -> Result<SearchPlan, Box<dyn Error>> {
    let mut plan = match &args.plan {
        Some(path) => SearchPlan::load(path)?,
        None => SearchPlan::default(),
    };
    if let Some(threads) = args.threads {
        plan.scheduler.parallelism = threads;
    }
    if let Some(threshold) = args.threshold {
        plan.rate_threshold = Some(threshold);
    }
    plan.verbose |= args.verbose;
    Ok(plan)
}

pub fn run(args: &SearchArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let plan = load_plan(args)?;
    let plan_hash = stable_hash_string(&plan)?;
    info!("search plan {plan_hash}");

    let report = run_search(&plan)?;
    let accepted = report.configs.len();
    let archive = ConfigArchive::new(report.configs, plan_hash.clone(), "search")?;
    save_archive(&args.out.join(SEARCH_ARCHIVE), &archive)?;

    let summary = json!({
        "plan": plan,
        "plan_hash": plan_hash,
        "configs_hash": archive.provenance.configs_hash,
        "counters": report.counters,
        "distinct_codes": report.distinct_codes,
        "skipped_pairs": report.skipped_pairs,
    });
    write_json(args.out.join("search_report.json"), &summary)?;

    println!(
        "examined {} candidates, accepted {} ({} distinct codes), {} failed",
        report.counters.examined, accepted, report.distinct_codes, report.counters.failed
    );
    Ok(())
}
