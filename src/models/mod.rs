// src/models/mod.rs

pub mod answer;
pub mod format;
pub mod options;
pub mod record;
pub mod tree;

use serde::{Deserialize, Serialize};

use self::answer::AnswerPart;
use self::options::FormulasOptions;
use self::record::Record;

/// In-memory question data handed to the serializer.
///
/// Fields may be missing; the serializer decides which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulasQuestion {
    pub options: Record,
    pub answers: Vec<Record>,
}

impl FormulasQuestion {
    /// Builds serializer input from stored rows.
    pub fn from_rows(options: &FormulasOptions, answers: &[AnswerPart]) -> Self {
        Self {
            options: options.to_record().with("id", options.id),
            answers: answers.iter().map(AnswerPart::to_record).collect(),
        }
    }
}
