//! Database initialization command

use clap::Args;
use geodiff_store::migrations::applied_migrations;

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long, default_value = ".geodiff/changes.db")]
    pub db: String,
}

pub fn execute(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = std::path::Path::new(&args.db).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = geodiff_store::db::open_and_migrate(&args.db)?;
    let applied = applied_migrations(&conn)?;

    println!("Initialized {} ({} migrations applied)", args.db, applied.len());
    Ok(())
}
