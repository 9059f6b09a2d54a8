//! Reference vocabularies for the categorical ticket fields.

use crate::error::SynthesisError;
use rand::Rng;
use std::fmt;

/// The categorical fields a ticket draws from a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    Activity,
    Origin,
    Status,
    Class,
}

impl VocabularyKind {
    /// All kinds, in the order the vocabularies are fetched.
    pub const ALL: [VocabularyKind; 4] = [
        VocabularyKind::Activity,
        VocabularyKind::Origin,
        VocabularyKind::Status,
        VocabularyKind::Class,
    ];
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyKind::Activity => write!(f, "activity"),
            VocabularyKind::Origin => write!(f, "origin"),
            VocabularyKind::Status => write!(f, "status"),
            VocabularyKind::Class => write!(f, "class"),
        }
    }
}

/// Permitted values for each categorical field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabularies {
    pub activities: Vec<String>,
    pub origins: Vec<String>,
    pub statuses: Vec<String>,
    pub classes: Vec<String>,
}

impl Vocabularies {
    pub fn new(
        activities: Vec<String>,
        origins: Vec<String>,
        statuses: Vec<String>,
        classes: Vec<String>,
    ) -> Self {
        Self {
            activities,
            origins,
            statuses,
            classes,
        }
    }

    pub fn get(&self, kind: VocabularyKind) -> &[String] {
        match kind {
            VocabularyKind::Activity => &self.activities,
            VocabularyKind::Origin => &self.origins,
            VocabularyKind::Status => &self.statuses,
            VocabularyKind::Class => &self.classes,
        }
    }

    pub fn set(&mut self, kind: VocabularyKind, values: Vec<String>) {
        match kind {
            VocabularyKind::Activity => self.activities = values,
            VocabularyKind::Origin => self.origins = values,
            VocabularyKind::Status => self.statuses = values,
            VocabularyKind::Class => self.classes = values,
        }
    }

    /// Fails on the first empty vocabulary, in [`VocabularyKind::ALL`] order.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        for kind in VocabularyKind::ALL {
            if self.get(kind).is_empty() {
                return Err(SynthesisError::EmptyVocabulary(kind));
            }
        }
        Ok(())
    }

    /// Uniformly pick one entry. The vocabulary must be non-empty.
    pub(crate) fn pick<R: Rng + ?Sized>(&self, kind: VocabularyKind, rng: &mut R) -> String {
        let values = self.get(kind);
        values[rng.random_range(0..values.len())].clone()
    }
}
