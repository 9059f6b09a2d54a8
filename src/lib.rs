//! Seed a database with random incident tickets.
//!
//! Vocabularies come from reference tables already in the database, case
//! numbers continue from the last event log identifier, and every ticket is
//! inserted on its own. The synthesis itself lives in [`ticket_synth`].

pub mod config;
pub mod schema;
pub mod seeder;
pub mod store;

pub use ticket_synth;
