//! Sink that persists nothing.

use super::{StoreError, TicketSink};
use std::io::Write;
use ticket_synth::Ticket;

/// Counts tickets and optionally prints a one-line summary of each.
pub struct DryRunSink<W: Write> {
    out: Option<W>,
    seen: u64,
}

impl DryRunSink<std::io::Stdout> {
    /// Print every ticket to stdout
    pub fn printing() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl DryRunSink<std::io::Sink> {
    /// Only count
    pub fn silent() -> Self {
        Self { out: None, seen: 0 }
    }
}

impl<W: Write> DryRunSink<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out: Some(out),
            seen: 0,
        }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }
}

impl<W: Write> TicketSink for DryRunSink<W> {
    fn insert(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        if let Some(out) = self.out.as_mut() {
            writeln!(out, "{}", ticket)?;
        }
        self.seen += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StoreError> {
        if let Some(out) = self.out.as_mut() {
            out.flush()?;
        }
        Ok(())
    }
}
