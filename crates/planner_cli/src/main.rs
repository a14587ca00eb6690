//! `planner` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from file, environment and flags.
//! - Open the migrated database and hand one command to the core service.
//! - Print results as JSON on stdout.

mod cli;
mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::Cli;
use log::info;
use planner_core::db::open_db;
use planner_core::{core_version, init_logging, PlannerConfig, ScoringPolicy};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).map_err(|err| anyhow!(err))?;
    }
    info!(
        "event=cli_start module=cli status=ok core_version={} db={}",
        core_version(),
        config.database_path.display()
    );

    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    let output = commands::run(&cli.command, &config, &conn)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<PlannerConfig> {
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    }
    .with_process_env();

    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if cli.legacy_scoring {
        config.scoring = ScoringPolicy::legacy();
    }
    Ok(config)
}
