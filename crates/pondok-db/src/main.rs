//! Brings the pondok database schema up to date.
//!
//! Reads `DATABASE_URL` (and `.env`), applies every pending migration, and
//! prints the status of each one.

use pondok::Config;
use pondok_store::MigrationRunner;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    pondok::logging::init();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = pondok_store::connect(&config.database_url, config.pool_size)?;
    let mut conn = pool.get().await?;
    let mut runner = MigrationRunner::new(conn.client_mut());

    let ran = runner.migrate().await?;
    for migration in &ran {
        info!(
            version = migration.version,
            name = migration.name,
            "applied"
        );
    }

    for status in runner.status().await? {
        let state = match status.applied_at {
            Some(at) => format!("applied {}", at.format("%Y-%m-%d %H:%M:%S")),
            None => "pending".to_owned(),
        };
        println!("{}  {:<24} {state}", status.version, status.name);
    }
    Ok(())
}
