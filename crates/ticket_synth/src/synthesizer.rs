//! Ticket synthesis from vocabularies, a date window and a starting ID.

use crate::error::SynthesisError;
use crate::ticket::Ticket;
use crate::vocabulary::{Vocabularies, VocabularyKind};
use crate::window::{DateWindow, SamplingMode};
use chrono::{NaiveTime, TimeDelta};
use rand::Rng;

/// Case IDs are `CS_<n>` unless configured otherwise
pub const DEFAULT_CASE_PREFIX: &str = "CS_";

/// Produces internally consistent random tickets.
///
/// The synthesizer holds no mutable state: ticket `i` of a run always gets
/// case number `starting_id + i + 1`, and every random draw comes from the
/// caller's RNG so one generator can serve the whole run.
#[derive(Debug, Clone)]
pub struct TicketSynthesizer {
    vocabularies: Vocabularies,
    window: DateWindow,
    starting_id: i64,
    case_prefix: String,
    sampling: SamplingMode,
}

impl TicketSynthesizer {
    pub fn new(vocabularies: Vocabularies, window: DateWindow, starting_id: i64) -> Self {
        Self {
            vocabularies,
            window,
            starting_id,
            case_prefix: DEFAULT_CASE_PREFIX.to_string(),
            sampling: SamplingMode::default(),
        }
    }

    pub fn with_case_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.case_prefix = prefix.into();
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn starting_id(&self) -> i64 {
        self.starting_id
    }

    /// Case ID of ticket `index` (zero-based) in this run
    pub fn case_id(&self, index: u64) -> String {
        let number = i128::from(self.starting_id) + i128::from(index) + 1;
        format!("{}{}", self.case_prefix, number)
    }

    /// Check count, window and vocabularies, in that order.
    pub fn validate(&self, count: i64) -> Result<(), SynthesisError> {
        if count < 0 {
            return Err(SynthesisError::NegativeCount(count));
        }
        if self.window.span_days() <= 1 {
            return Err(SynthesisError::InvalidDateWindow {
                start: self.window.start,
                end: self.window.end,
            });
        }
        if self.sampling == SamplingMode::Legacy && self.window.start.pred_opt().is_none() {
            return Err(SynthesisError::InvalidDateWindow {
                start: self.window.start,
                end: self.window.end,
            });
        }
        self.vocabularies.validate()
    }

    /// Lazily produce `count` tickets.
    ///
    /// All preconditions are checked up front, so a returned iterator never
    /// fails part way through.
    pub fn synthesize<'a, R: Rng + ?Sized>(
        &'a self,
        count: i64,
        rng: &'a mut R,
    ) -> Result<Tickets<'a, R>, SynthesisError> {
        self.validate(count)?;
        Ok(Tickets {
            synth: self,
            rng,
            next: 0,
            count: count as u64,
        })
    }

    /// Collect `count` tickets into a vector
    pub fn synthesize_all<R: Rng + ?Sized>(
        &self,
        count: i64,
        rng: &mut R,
    ) -> Result<Vec<Ticket>, SynthesisError> {
        Ok(self.synthesize(count, rng)?.collect())
    }

    fn draw<R: Rng + ?Sized>(&self, index: u64, rng: &mut R) -> Ticket {
        let case_id = self.case_id(index);

        let start_date = self.sampling.start_date(&self.window, rng);
        let hour: i64 = rng.random_range(0..24);
        let minute: i64 = rng.random_range(0..60);
        let update_timestamp =
            start_date.and_time(NaiveTime::MIN) + TimeDelta::hours(hour) + TimeDelta::minutes(minute);

        let duration = self.sampling.duration(start_date, &self.window, rng);
        let end_date = start_date + TimeDelta::days(duration);

        let urgency: u8 = rng.random_range(1..=3);
        let impact: u8 = rng.random_range(1..=3);
        let priority = urgency + impact - 1;

        let activity = self.vocabularies.pick(VocabularyKind::Activity, rng);
        let status = self.vocabularies.pick(VocabularyKind::Status, rng);
        let origin = self.vocabularies.pick(VocabularyKind::Origin, rng);
        let event_class = self.vocabularies.pick(VocabularyKind::Class, rng);

        Ticket {
            case_id,
            activity,
            urgency,
            impact,
            priority,
            start_date,
            end_date,
            status,
            update_timestamp,
            duration,
            origin,
            event_class,
        }
    }
}

/// Iterator over the tickets of one run.
pub struct Tickets<'a, R: Rng + ?Sized> {
    synth: &'a TicketSynthesizer,
    rng: &'a mut R,
    next: u64,
    count: u64,
}

impl<R: Rng + ?Sized> Iterator for Tickets<'_, R> {
    type Item = Ticket;

    fn next(&mut self) -> Option<Ticket> {
        if self.next >= self.count {
            return None;
        }
        let ticket = self.synth.draw(self.next, &mut *self.rng);
        self.next += 1;
        Some(ticket)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.count - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn demo_vocabularies() -> Vocabularies {
        Vocabularies::new(
            words(&["Reboot", "Patch"]),
            words(&["Phone"]),
            words(&["Open", "Closed"]),
            words(&["Incident"]),
        )
    }

    #[test]
    fn test_case_ids_continue_from_starting_id() {
        let synth = TicketSynthesizer::new(
            demo_vocabularies(),
            DateWindow::new(date(2024, 1, 1), date(2024, 1, 10)),
            5,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ids: Vec<String> = synth
            .synthesize_all(3, &mut rng)
            .unwrap()
            .into_iter()
            .map(|t| t.case_id)
            .collect();
        assert_eq!(ids, vec!["CS_6", "CS_7", "CS_8"]);
    }

    #[test]
    fn test_custom_prefix() {
        let synth = TicketSynthesizer::new(
            demo_vocabularies(),
            DateWindow::new(date(2024, 1, 1), date(2024, 1, 10)),
            0,
        )
        .with_case_prefix("INC-");
        assert_eq!(synth.case_id(0), "INC-1");
        assert_eq!(synth.case_id(41), "INC-42");
    }

    #[test]
    fn test_validation_order() {
        let synth = TicketSynthesizer::new(
            Vocabularies::default(),
            DateWindow::new(date(2024, 1, 1), date(2024, 1, 2)),
            0,
        );
        // negative count is reported before the window and the vocabularies
        assert_eq!(synth.validate(-1), Err(SynthesisError::NegativeCount(-1)));
        assert!(matches!(
            synth.validate(1),
            Err(SynthesisError::InvalidDateWindow { .. })
        ));
    }

    #[test]
    fn test_size_hint_counts_down() {
        let synth = TicketSynthesizer::new(
            demo_vocabularies(),
            DateWindow::new(date(2024, 1, 1), date(2024, 1, 10)),
            0,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut tickets = synth.synthesize(4, &mut rng).unwrap();
        assert_eq!(tickets.size_hint(), (4, Some(4)));
        tickets.next();
        assert_eq!(tickets.size_hint(), (3, Some(3)));
        assert_eq!(tickets.count(), 3);
    }

    #[test]
    fn test_update_timestamp_on_start_date() {
        let synth = TicketSynthesizer::new(
            demo_vocabularies(),
            DateWindow::new(date(2024, 1, 1), date(2024, 3, 1)),
            0,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for ticket in synth.synthesize(100, &mut rng).unwrap() {
            assert_eq!(ticket.update_timestamp.date(), ticket.start_date);
            assert_eq!(ticket.update_timestamp.and_utc().timestamp() % 60, 0);
        }
    }
}
