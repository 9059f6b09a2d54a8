//! Seed command CLI handler.

use super::prompt::Prompter;
use crate::progress::ticket_progress;
use anyhow::Context;
use chrono::NaiveDate;
use incident_seeder::config::SeederConfig;
use incident_seeder::seeder::{SeedPlan, SeedRun, SeedStats};
use incident_seeder::store::{DryRunSink, DuckDbStore, SqlScriptSink};
use incident_seeder::ticket_synth::{DateWindow, Dialect, SamplingMode};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

pub struct SeedArgs {
    pub database: Option<PathBuf>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub count: Option<i64>,
    pub seed: Option<u64>,
    pub config: Option<PathBuf>,
    pub legacy_dates: bool,
    pub output: Option<PathBuf>,
    pub dialect: String,
    pub dry_run: bool,
    pub progress: bool,
    pub json: bool,
}

/// Summary printed by `--json`
#[derive(Serialize)]
struct SeedReport<'a> {
    database: String,
    target: String,
    start: String,
    end: String,
    sampling: String,
    seed: Option<u64>,
    #[serde(flatten)]
    stats: &'a SeedStats,
}

/// Parse a `YYYY-MM-DD` command line date
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected a date as YYYY-MM-DD: {}", e))
}

/// Seeded ChaCha8 when `seed` is given, otherwise seeded from the OS
fn build_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(ChaCha8Rng::seed_from_u64(seed)),
        None => Box::new(StdRng::from_os_rng()),
    }
}

/// `--output -` sends the script to stdout
fn script_to_stdout(output: Option<&Path>) -> bool {
    output.is_some_and(|p| p.as_os_str() == "-")
}

/// Reject flag combinations that would share stdout
fn check_args(args: &SeedArgs) -> anyhow::Result<()> {
    if args.json && script_to_stdout(args.output.as_deref()) {
        anyhow::bail!("--json cannot be combined with --output - (both write to stdout)");
    }
    Ok(())
}

fn prompter(slot: &mut Option<Prompter>) -> anyhow::Result<&mut Prompter> {
    if slot.is_none() {
        *slot = Some(Prompter::new()?);
    }
    slot.as_mut()
        .ok_or_else(|| anyhow::anyhow!("interactive input is unavailable"))
}

pub fn run(args: SeedArgs) -> anyhow::Result<()> {
    check_args(&args)?;
    let config = SeederConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    let dialect = args
        .dialect
        .parse::<Dialect>()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    let mut prompts: Option<Prompter> = None;

    let database = match args.database {
        Some(path) => path,
        None => PathBuf::from(prompter(&mut prompts)?.line("Enter Database: ")?),
    };

    if !args.json {
        eprintln!("Establishing connection to database...");
    }
    let mut store =
        DuckDbStore::open_existing(&database)?.with_event_table(&config.event_log.table)?;
    if !args.json {
        eprintln!("Connection established: {}", store.path().display());
    }

    let start = match args.start {
        Some(date) => date,
        None => prompter(&mut prompts)?.date("Enter Start Date")?,
    };
    let end = match args.end {
        Some(date) => date,
        None => prompter(&mut prompts)?.date("Enter End Date")?,
    };
    let count = match args.count {
        Some(count) => count,
        None => prompter(&mut prompts)?.parse("Enter Number of Records: ")?,
    };
    // saves prompt history
    drop(prompts);

    let sampling = if args.legacy_dates {
        SamplingMode::Legacy
    } else {
        SamplingMode::default()
    };
    let plan = SeedPlan {
        count,
        window: DateWindow::new(start, end),
        sampling,
        config,
    };
    let run = SeedRun::prepare(&store, &plan)?;

    let mut rng = build_rng(args.seed);
    let pb = ticket_progress(run.count() as u64, args.progress && !args.json);
    let on_progress = |done: u64| pb.set_position(done);

    if !args.json {
        eprintln!("Executing SQL statements...");
    }

    let table = plan.config.event_log.table.as_str();
    let (target, stats) = if args.dry_run {
        let stats = if args.json || args.progress {
            run.execute(&mut DryRunSink::silent(), rng.as_mut(), on_progress)?
        } else {
            run.execute(&mut DryRunSink::printing(), rng.as_mut(), on_progress)?
        };
        ("dry run".to_string(), stats)
    } else if let Some(output) = &args.output {
        let header = format!(
            "incident-seeder: {} tickets for {} ({} dialect)",
            count, plan.window, dialect
        );
        let stats = if script_to_stdout(Some(output.as_path())) {
            let mut sink = SqlScriptSink::new(io::stdout(), table, dialect)?.with_header(&header)?;
            run.execute(&mut sink, rng.as_mut(), on_progress)?
        } else {
            let mut sink = SqlScriptSink::create(output, table, dialect)
                .with_context(|| format!("failed to create {}", output.display()))?
                .with_header(&header)?;
            run.execute(&mut sink, rng.as_mut(), on_progress)?
        };
        (output.display().to_string(), stats)
    } else {
        let stats = run.execute(&mut store, rng.as_mut(), on_progress)?;
        (format!("{} ({})", database.display(), table), stats)
    };
    pb.finish_and_clear();

    tracing::info!(%stats, "seed run finished");

    if args.json {
        let report = SeedReport {
            database: database.display().to_string(),
            target,
            start: start.to_string(),
            end: end.to_string(),
            sampling: sampling.to_string(),
            seed: args.seed,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!("Finished!");
    eprintln!();
    eprintln!("Seed Statistics:");
    eprintln!("  Target: {}", target);
    eprintln!("  Window: {} ({} dates)", plan.window, sampling);
    eprintln!("  Tickets: {} / {}", stats.inserted, stats.requested);
    if stats.failed > 0 {
        eprintln!("  Failed inserts: {}", stats.failed);
    }
    if let (Some(first), Some(last)) = (&stats.first_case_id, &stats.last_case_id) {
        eprintln!("  Case IDs: {} .. {}", first, last);
    }
    eprintln!("  Elapsed: {:.2}s", stats.elapsed_secs);

    Ok(())
}
