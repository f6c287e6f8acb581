//! Change stream apply command

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::Args;
use geodiff_core::InvalidActionsMode;
use geodiff_engine::{apply_changes, ApplyOptions, ChangeReader, RunSummary, WriterConfig};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[arg(long, default_value = ".geodiff/changes.db")]
    pub db: String,

    /// JSON-lines change stream; `-` reads stdin
    #[arg(long, default_value = "-")]
    pub input: String,

    /// TOML writer configuration
    #[arg(long)]
    pub config: Option<String>,

    /// ignore, log or break (overrides the config file)
    #[arg(long)]
    pub invalid_actions: Option<String>,

    #[arg(long)]
    pub cache_capacity: Option<usize>,

    /// Skip changes whose version is already stored
    #[arg(long)]
    pub skip_applied: bool,

    /// Record audit rows only, leave current entity state alone
    #[arg(long)]
    pub no_entity_state: bool,

    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(&args)?;
    let mut conn = geodiff_store::db::open_and_migrate(&args.db)?;

    let reader: Box<dyn BufRead> = if args.input == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(&args.input)?))
    };

    let summary = apply_changes(
        &mut conn,
        ChangeReader::new(reader),
        &config,
        ApplyOptions {
            dry_run: args.dry_run,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn resolve_config(args: &ApplyArgs) -> Result<WriterConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => WriterConfig::load(Path::new(path))?,
        None => WriterConfig::default(),
    };

    if let Some(mode) = &args.invalid_actions {
        config.invalid_actions = mode.parse::<InvalidActionsMode>()?;
    }
    if let Some(capacity) = args.cache_capacity {
        config.changeset_cache_capacity = capacity;
    }
    if args.skip_applied {
        config.skip_applied_versions = true;
    }
    if args.no_entity_state {
        config.apply_entity_state = false;
    }
    Ok(config)
}

fn print_summary(summary: &RunSummary) {
    let stats = summary.report.stats;
    let prefix = if summary.dry_run { "[dry-run] " } else { "" };
    println!(
        "{}Run {}: processed {}, skipped {}, invalid {}, changesets {}",
        prefix,
        summary.run_id(),
        stats.processed,
        stats.skipped,
        stats.invalid,
        summary.report.changesets.len()
    );
    for changeset_id in &summary.report.changesets {
        println!("  changeset {}", changeset_id);
    }
}
