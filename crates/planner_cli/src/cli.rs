//! Command-line definitions.

use clap::{Parser, Subcommand};
use planner_core::TaskId;
use std::path::PathBuf;

/// Student deadline planner: score deadlines and list them by priority.
#[derive(Parser, Debug)]
#[command(name = "planner", version, about, long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and PLANNER_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Score like the historical service: no range checks, errors become 0
    #[arg(long, global = true)]
    pub legacy_scoring: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a deadline and store its priority score
    Create {
        #[arg(long)]
        student: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        title: String,
        /// Due time as `YYYY-MM-DD HH:MM:SS`
        #[arg(long)]
        due: String,
        /// Importance 1-5
        #[arg(long)]
        importance: i64,
    },

    /// List a student's deadlines, highest priority first
    Schedule {
        #[arg(long)]
        student: String,
    },

    /// Show one stored deadline
    Show { id: TaskId },

    /// Delete one deadline
    Delete { id: TaskId },

    /// Register a subject or change its difficulty
    Subject {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Difficulty 1.0-5.0
        #[arg(long)]
        difficulty: f64,
    },

    /// List known subjects
    Subjects,

    /// Compute a score without storing anything
    Score {
        /// Due time as `YYYY-MM-DD HH:MM:SS`
        #[arg(long)]
        due: String,
        #[arg(long, default_value_t = 3.0)]
        importance: f64,
        #[arg(long, default_value_t = 3.0)]
        difficulty: f64,
        /// Reference time instead of the local clock
        #[arg(long)]
        now: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "planner",
            "create",
            "--student",
            "SV001",
            "--subject",
            "MH01",
            "--title",
            "Lab report",
            "--due",
            "2026-03-04 00:00:00",
            "--importance",
            "4",
            "--legacy-scoring",
        ])
        .expect("arguments should parse");

        assert!(cli.legacy_scoring);
        match cli.command {
            Command::Create {
                importance, due, ..
            } => {
                assert_eq!(importance, 4);
                assert_eq!(due, "2026-03-04 00:00:00");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_requires_importance() {
        let result = Cli::try_parse_from([
            "planner",
            "create",
            "--student",
            "SV001",
            "--subject",
            "MH01",
            "--title",
            "Lab report",
            "--due",
            "2026-03-04 00:00:00",
        ]);
        assert!(result.is_err());
    }
}
