//! Random incident ticket synthesis.
//!
//! Builds internally consistent incident tickets from reference vocabularies
//! and a date window. Nothing here touches a database: callers fetch the
//! vocabularies and the last used identifier, then hand each ticket to
//! whatever sink they persist into.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use ticket_synth::{DateWindow, TicketSynthesizer, Vocabularies};
//!
//! let vocabularies = Vocabularies::new(
//!     vec!["Reboot".into(), "Patch".into()],
//!     vec!["Phone".into()],
//!     vec!["Open".into(), "Closed".into()],
//!     vec!["Incident".into()],
//! );
//! let window = DateWindow::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//! );
//!
//! let synth = TicketSynthesizer::new(vocabularies, window, 5);
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let tickets = synth.synthesize_all(3, &mut rng).unwrap();
//!
//! assert_eq!(tickets[0].case_id, "CS_6");
//! assert_eq!(tickets[2].case_id, "CS_8");
//! ```

pub mod error;
pub mod synthesizer;
pub mod ticket;
pub mod value;
pub mod vocabulary;
pub mod window;

pub use error::SynthesisError;
pub use synthesizer::{TicketSynthesizer, Tickets, DEFAULT_CASE_PREFIX};
pub use ticket::{Ticket, EVENT_LOG_COLUMNS};
pub use value::{render_insert, Dialect, SqlValue};
pub use vocabulary::{Vocabularies, VocabularyKind};
pub use window::{DateWindow, SamplingMode};
