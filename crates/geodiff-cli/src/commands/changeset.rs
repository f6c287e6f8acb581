//! Changeset inspection command

use clap::{Args, Subcommand};
use geodiff_engine::changeset_report;

#[derive(Debug, Args)]
pub struct ChangesetArgs {
    #[command(subcommand)]
    pub command: ChangesetCommand,
}

#[derive(Debug, Subcommand)]
pub enum ChangesetCommand {
    /// Show a changeset and its changes
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: i64,

    #[arg(long, default_value = ".geodiff/changes.db")]
    pub db: String,

    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ChangesetArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        ChangesetCommand::Show(show_args) => execute_show(show_args),
    }
}

fn execute_show(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = geodiff_store::db::open_and_migrate(&args.db)?;

    let report = changeset_report(&conn, args.id)?
        .ok_or_else(|| format!("Changeset {} not found", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let changeset = &report.changeset;
    println!("Changeset {}", changeset.changeset_id);
    println!("  user:       {}", changeset.user_id);
    println!("  created_at: {}", changeset.created_at.to_rfc3339());
    if let Some(closed_at) = changeset.closed_at {
        println!("  closed_at:  {}", closed_at.to_rfc3339());
    }
    println!("  changes:    {}", changeset.num_changes);
    for line in report.summary_lines() {
        println!("  {}", line);
    }
    Ok(())
}
