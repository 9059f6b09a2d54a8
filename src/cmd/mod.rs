mod init;
mod prompt;
mod seed;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "incident-seeder")]
#[command(version)]
#[command(about = "Seed a database with random incident tickets", long_about = None)]
pub struct Cli {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail (INCIDENT_SEEDER_LOG overrides both flags)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize tickets and insert them into the event log
    Seed {
        /// DuckDB database holding the reference tables (prompted if missing)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// First day of the date window, YYYY-MM-DD (prompted if missing)
        #[arg(short, long, value_parser = seed::parse_date)]
        start: Option<chrono::NaiveDate>,

        /// Last day of the date window, YYYY-MM-DD (prompted if missing)
        #[arg(short, long, value_parser = seed::parse_date)]
        end: Option<chrono::NaiveDate>,

        /// Number of tickets to create (prompted if missing)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        count: Option<i64>,

        /// Seed for reproducible tickets
        #[arg(long)]
        seed: Option<u64>,

        /// YAML file naming the reference tables and the event log
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Draw dates exactly like the first release (start may precede the window by a day)
        #[arg(long)]
        legacy_dates: bool,

        /// Write INSERT statements to this file instead of the database ("-" for stdout, not with --json)
        #[arg(short, long, conflicts_with = "dry_run")]
        output: Option<PathBuf>,

        /// SQL dialect for --output: mysql, postgres, sqlite, duckdb
        #[arg(long, default_value = "mysql")]
        dialect: String,

        /// Print tickets instead of inserting them
        #[arg(long)]
        dry_run: bool,

        /// Show a progress bar while inserting
        #[arg(short, long)]
        progress: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the reference tables and the event log in a DuckDB database
    Init {
        /// DuckDB database to create or extend
        #[arg(short, long)]
        database: PathBuf,

        /// YAML file naming the reference tables and the event log
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fill empty reference tables with a starter vocabulary
        #[arg(long)]
        with_reference_data: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Seed {
            database,
            start,
            end,
            count,
            seed,
            config,
            legacy_dates,
            output,
            dialect,
            dry_run,
            progress,
            json,
        } => seed::run(seed::SeedArgs {
            database,
            start,
            end,
            count,
            seed,
            config,
            legacy_dates,
            output,
            dialect,
            dry_run,
            progress,
            json,
        }),
        Commands::Init {
            database,
            config,
            with_reference_data,
        } => init::run(database, config, with_reference_data),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "incident-seeder",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_flags_parse() {
        let cli = Cli::try_parse_from([
            "incident-seeder",
            "-v",
            "seed",
            "--database",
            "tickets.duckdb",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "-n",
            "25",
            "--seed",
            "7",
            "--legacy-dates",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Seed {
                database,
                start,
                count,
                seed,
                legacy_dates,
                dialect,
                ..
            } => {
                assert_eq!(database, Some(PathBuf::from("tickets.duckdb")));
                assert_eq!(start, chrono::NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(count, Some(25));
                assert_eq!(seed, Some(7));
                assert!(legacy_dates);
                assert_eq!(dialect, "mysql");
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_bad_date_rejected() {
        let result = Cli::try_parse_from(["incident-seeder", "seed", "--start", "2024-02-30"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_conflicts_with_dry_run() {
        let result = Cli::try_parse_from([
            "incident-seeder",
            "seed",
            "--output",
            "out.sql",
            "--dry-run",
        ]);
        assert!(result.is_err());
    }
}
