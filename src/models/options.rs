// src/models/options.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::error::AppError;
use crate::models::format::{AnswerNumbering, TextFormat};
use crate::models::record::{Record, flag_text};

/// Represents the 'qtype_formulas_options' table in the database.
/// One row per question.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct FormulasOptions {
    pub id: i64,
    pub questionid: i64,

    /// Random variable definitions, re-drawn for every attempt.
    pub varsrandom: String,

    /// Variables shared by all parts.
    pub varsglobal: String,

    pub correctfeedback: String,
    pub correctfeedbackformat: TextFormat,
    pub partiallycorrectfeedback: String,
    pub partiallycorrectfeedbackformat: TextFormat,
    pub incorrectfeedback: String,
    pub incorrectfeedbackformat: TextFormat,

    /// Show the number of correct parts in the combined feedback.
    pub shownumcorrect: bool,

    pub answernumbering: AnswerNumbering,
}

impl FormulasOptions {
    /// Builds a row from a fully backfilled record.
    pub fn from_record(id: i64, questionid: i64, record: &Record) -> Result<Self, AppError> {
        Ok(Self {
            id,
            questionid,
            varsrandom: record.require("varsrandom")?.to_string(),
            varsglobal: record.require("varsglobal")?.to_string(),
            correctfeedback: record.require("correctfeedback")?.to_string(),
            correctfeedbackformat: record.parse("correctfeedbackformat")?,
            partiallycorrectfeedback: record.require("partiallycorrectfeedback")?.to_string(),
            partiallycorrectfeedbackformat: record.parse("partiallycorrectfeedbackformat")?,
            incorrectfeedback: record.require("incorrectfeedback")?.to_string(),
            incorrectfeedbackformat: record.parse("incorrectfeedbackformat")?,
            shownumcorrect: record.flag("shownumcorrect")?,
            answernumbering: record.require("answernumbering")?.parse()?,
        })
    }

    /// Field view without `id` and `questionid`.
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("varsrandom", &self.varsrandom)
            .with("varsglobal", &self.varsglobal)
            .with("correctfeedback", &self.correctfeedback)
            .with("correctfeedbackformat", self.correctfeedbackformat)
            .with("partiallycorrectfeedback", &self.partiallycorrectfeedback)
            .with("partiallycorrectfeedbackformat", self.partiallycorrectfeedbackformat)
            .with("incorrectfeedback", &self.incorrectfeedback)
            .with("incorrectfeedbackformat", self.incorrectfeedbackformat)
            .with("shownumcorrect", flag_text(self.shownumcorrect))
            .with("answernumbering", self.answernumbering)
    }
}
