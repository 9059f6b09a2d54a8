//! Init command CLI handler.

use anyhow::Context;
use incident_seeder::config::SeederConfig;
use incident_seeder::schema::create_schema;
use incident_seeder::store::DuckDbStore;
use std::path::PathBuf;

pub fn run(
    database: PathBuf,
    config: Option<PathBuf>,
    with_reference_data: bool,
) -> anyhow::Result<()> {
    let config = SeederConfig::load_or_default(config.as_deref())
        .context("failed to load configuration")?;

    let store = DuckDbStore::open(&database)?;
    let report = create_schema(store.connection(), &config, with_reference_data)?;

    eprintln!("Schema ready in {}", database.display());
    eprintln!("  Event log: {}", config.event_log.table);
    if with_reference_data {
        if report.populated.is_empty() {
            eprintln!("  Reference tables already populated");
        } else {
            eprintln!(
                "  Populated: {} ({} rows)",
                report.populated.join(", "),
                report.rows_inserted
            );
        }
    }

    Ok(())
}
