//! The seeding run: read reference data once, then synthesize and persist
//! tickets one at a time.
//!
//! Reading and writing are separate phases ([`SeedRun::prepare`] and
//! [`SeedRun::execute`]) so one DuckDB store can serve as both the
//! reference store and the sink.

use crate::config::SeederConfig;
use crate::store::{ReferenceStore, StoreError, TicketSink};
use rand::Rng;
use serde::Serialize;
use std::time::Instant;
use ticket_synth::{
    DateWindow, SamplingMode, SynthesisError, TicketSynthesizer, Vocabularies, VocabularyKind,
};

/// Errors that abort a run before or outside the insert loop
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parameters of one seeding run
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub count: i64,
    pub window: DateWindow,
    pub sampling: SamplingMode,
    pub config: SeederConfig,
}

/// Outcome of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedStats {
    /// Tickets requested
    pub requested: u64,
    /// Tickets persisted
    pub inserted: u64,
    /// Tickets whose insert failed and was skipped
    pub failed: u64,
    /// Last identifier found before the run
    pub starting_id: i64,
    pub first_case_id: Option<String>,
    pub last_case_id: Option<String>,
    pub elapsed_secs: f64,
}

impl std::fmt::Display for SeedStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} tickets inserted ({} failed) in {:.2}s",
            self.inserted, self.requested, self.failed, self.elapsed_secs
        )?;
        if let (Some(first), Some(last)) = (&self.first_case_id, &self.last_case_id) {
            write!(f, ", case IDs {} .. {}", first, last)?;
        }
        Ok(())
    }
}

/// Read every vocabulary named in `config`.
///
/// A failed query is logged and leaves that vocabulary empty; validation
/// then rejects the run with `EmptyVocabulary` before anything is written.
pub fn load_vocabularies<S: ReferenceStore + ?Sized>(
    store: &S,
    config: &SeederConfig,
) -> Vocabularies {
    let mut vocabularies = Vocabularies::default();
    for kind in VocabularyKind::ALL {
        let reference = config.reference(kind);
        match store.column_values(&reference.table, &reference.column) {
            Ok(values) => vocabularies.set(kind, values),
            Err(e) => {
                tracing::warn!(vocabulary = %kind, error = %e, "could not load vocabulary");
            }
        }
    }
    vocabularies
}

/// Last used event log identifier; a failed query is logged and counts as 0.
pub fn starting_identifier<S: ReferenceStore + ?Sized>(store: &S, config: &SeederConfig) -> i64 {
    let log = &config.event_log;
    store
        .last_identifier(&log.table, &log.id_column)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read last identifier, starting from 0");
            0
        })
}

/// A validated run, ready to persist tickets.
#[derive(Debug)]
pub struct SeedRun {
    synth: TicketSynthesizer,
    count: i64,
}

impl SeedRun {
    /// Fetch reference data and check every synthesis precondition.
    pub fn prepare<S: ReferenceStore + ?Sized>(
        store: &S,
        plan: &SeedPlan,
    ) -> Result<Self, SeedError> {
        let vocabularies = load_vocabularies(store, &plan.config);
        let starting_id = starting_identifier(store, &plan.config);

        let synth = TicketSynthesizer::new(vocabularies, plan.window, starting_id)
            .with_case_prefix(plan.config.event_log.case_prefix.clone())
            .with_sampling(plan.sampling);
        synth.validate(plan.count)?;

        tracing::debug!(
            count = plan.count,
            starting_id,
            window = %plan.window,
            sampling = %plan.sampling,
            "seed run prepared"
        );
        Ok(Self {
            synth,
            count: plan.count,
        })
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Synthesize and persist every ticket.
    ///
    /// A failed insert is logged and counted, and the loop moves on to the
    /// next ticket. Nothing is rolled back or retried.
    pub fn execute<K, R, F>(
        &self,
        sink: &mut K,
        rng: &mut R,
        mut on_progress: F,
    ) -> Result<SeedStats, SeedError>
    where
        K: TicketSink + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(u64),
    {
        let start = Instant::now();
        let mut stats = SeedStats {
            requested: self.count as u64,
            starting_id: self.synth.starting_id(),
            ..Default::default()
        };

        for (done, ticket) in (1u64..).zip(self.synth.synthesize(self.count, rng)?) {
            match sink.insert(&ticket) {
                Ok(()) => {
                    stats.inserted += 1;
                    if stats.first_case_id.is_none() {
                        stats.first_case_id = Some(ticket.case_id.clone());
                    }
                    stats.last_case_id = Some(ticket.case_id);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(error = %e, "skipping ticket");
                }
            }
            on_progress(done);
        }

        sink.finish()?;
        stats.elapsed_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }
}

/// Prepare and execute against a separate store and sink.
pub fn run_seed<S, K, R, F>(
    store: &S,
    sink: &mut K,
    plan: &SeedPlan,
    rng: &mut R,
    on_progress: F,
) -> Result<SeedStats, SeedError>
where
    S: ReferenceStore + ?Sized,
    K: TicketSink + ?Sized,
    R: Rng + ?Sized,
    F: FnMut(u64),
{
    SeedRun::prepare(store, plan)?.execute(sink, rng, on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;
    use ticket_synth::Ticket;

    /// In-memory reference data keyed by `table.column`
    #[derive(Default)]
    struct FakeStore {
        columns: HashMap<String, Vec<String>>,
        last_id: Option<i64>,
    }

    impl FakeStore {
        fn with_defaults() -> Self {
            let config = SeederConfig::default();
            let mut store = FakeStore {
                last_id: Some(5),
                ..Default::default()
            };
            for (kind, values) in [
                (VocabularyKind::Activity, vec!["Reboot", "Patch"]),
                (VocabularyKind::Origin, vec!["Phone"]),
                (VocabularyKind::Status, vec!["Open", "Closed"]),
                (VocabularyKind::Class, vec!["Incident"]),
            ] {
                let r = config.reference(kind);
                store.columns.insert(
                    format!("{}.{}", r.table, r.column),
                    values.into_iter().map(String::from).collect(),
                );
            }
            store
        }
    }

    fn query_failure(table: &str, column: &str) -> StoreError {
        StoreError::Query {
            table: table.to_string(),
            column: column.to_string(),
            source: duckdb::Error::QueryReturnedNoRows,
        }
    }

    impl ReferenceStore for FakeStore {
        fn last_identifier(&self, table: &str, column: &str) -> Result<i64, StoreError> {
            self.last_id.ok_or_else(|| query_failure(table, column))
        }

        fn column_values(&self, table: &str, column: &str) -> Result<Vec<String>, StoreError> {
            self.columns
                .get(&format!("{}.{}", table, column))
                .cloned()
                .ok_or_else(|| query_failure(table, column))
        }
    }

    /// Records tickets and fails on the listed case IDs
    #[derive(Default)]
    struct RecordingSink {
        tickets: Vec<Ticket>,
        fail_on: Vec<String>,
        finished: bool,
    }

    impl TicketSink for RecordingSink {
        fn insert(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
            if self.fail_on.contains(&ticket.case_id) {
                return Err(StoreError::Insert {
                    case_id: ticket.case_id.clone(),
                    source: "constraint violation".into(),
                });
            }
            self.tickets.push(ticket.clone());
            Ok(())
        }

        fn finish(&mut self) -> Result<(), StoreError> {
            self.finished = true;
            Ok(())
        }
    }

    fn plan(count: i64) -> SeedPlan {
        SeedPlan {
            count,
            window: DateWindow::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ),
            sampling: SamplingMode::Uniform,
            config: SeederConfig::default(),
        }
    }

    #[test]
    fn test_run_continues_case_ids() {
        let store = FakeStore::with_defaults();
        let mut sink = RecordingSink::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut progress = Vec::new();

        let stats = run_seed(&store, &mut sink, &plan(3), &mut rng, |n| progress.push(n)).unwrap();

        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.starting_id, 5);
        assert_eq!(stats.first_case_id.as_deref(), Some("CS_6"));
        assert_eq!(stats.last_case_id.as_deref(), Some("CS_8"));
        assert_eq!(progress, vec![1, 2, 3]);
        assert!(sink.finished);
        assert!(sink.tickets.iter().all(|t| t.origin == "Phone"));
    }

    #[test]
    fn test_insert_failure_does_not_stop_run() {
        let store = FakeStore::with_defaults();
        let mut sink = RecordingSink {
            fail_on: vec!["CS_7".to_string()],
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let stats = run_seed(&store, &mut sink, &plan(4), &mut rng, |_| {}).unwrap();

        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.failed, 1);
        let ids: Vec<&str> = sink.tickets.iter().map(|t| t.case_id.as_str()).collect();
        assert_eq!(ids, ["CS_6", "CS_8", "CS_9"]);
    }

    #[test]
    fn test_missing_reference_table_fails_before_insert() {
        let mut store = FakeStore::with_defaults();
        store.columns.remove("EventStatus.Status");
        let mut sink = RecordingSink::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let err = run_seed(&store, &mut sink, &plan(3), &mut rng, |_| {}).unwrap_err();

        assert!(matches!(
            err,
            SeedError::Synthesis(SynthesisError::EmptyVocabulary(VocabularyKind::Status))
        ));
        assert!(sink.tickets.is_empty());
        assert!(!sink.finished);
    }

    #[test]
    fn test_last_identifier_failure_starts_at_zero() {
        let mut store = FakeStore::with_defaults();
        store.last_id = None;
        let mut sink = RecordingSink::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let stats = run_seed(&store, &mut sink, &plan(2), &mut rng, |_| {}).unwrap();
        assert_eq!(stats.first_case_id.as_deref(), Some("CS_1"));
    }

    #[test]
    fn test_zero_count_is_empty_run() {
        let store = FakeStore::with_defaults();
        let mut sink = RecordingSink::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let stats = run_seed(&store, &mut sink, &plan(0), &mut rng, |_| {}).unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.first_case_id, None);
        assert!(sink.finished);
    }

    #[test]
    fn test_negative_count_rejected() {
        let store = FakeStore::with_defaults();
        let err = SeedRun::prepare(&store, &plan(-1)).unwrap_err();
        assert!(matches!(
            err,
            SeedError::Synthesis(SynthesisError::NegativeCount(-1))
        ));
    }
}
