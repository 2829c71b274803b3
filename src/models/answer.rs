// src/models/answer.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::error::AppError;
use crate::models::format::TextFormat;
use crate::models::record::{Record, flag_text};

/// Represents the 'qtype_formulas_answers' table in the database.
/// One row per part, ordered by `partindex`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AnswerPart {
    pub id: i64,
    pub questionid: i64,

    /// Zero-based position of the part inside the question.
    pub partindex: i64,

    /// Marker in the question text where the part is rendered.
    pub placeholder: String,

    /// Grading weight of the part.
    pub answermark: f64,

    pub answertype: i64,
    pub numbox: i64,

    /// Local variables evaluated before the answer.
    pub vars1: String,

    /// Expected answer expression(s).
    pub answer: String,

    pub answernotunique: bool,

    /// Grading variables evaluated after the student's response.
    pub vars2: String,

    pub correctness: String,
    pub unitpenalty: f64,
    pub postunit: String,
    pub ruleid: i64,
    pub otherrule: String,

    pub subqtext: String,
    pub subqtextformat: TextFormat,
    pub feedback: String,
    pub feedbackformat: TextFormat,
    pub partcorrectfb: String,
    pub partcorrectfbformat: TextFormat,
    pub partpartiallycorrectfb: String,
    pub partpartiallycorrectfbformat: TextFormat,
    pub partincorrectfb: String,
    pub partincorrectfbformat: TextFormat,

    pub emptyallowed: bool,
}

impl AnswerPart {
    /// Builds a row from a fully backfilled record.
    pub fn from_record(id: i64, questionid: i64, record: &Record) -> Result<Self, AppError> {
        let text = |field: &str| record.require(field).map(str::to_string);

        Ok(Self {
            id,
            questionid,
            partindex: record.parse("partindex")?,
            placeholder: text("placeholder")?,
            answermark: record.parse("answermark")?,
            answertype: record.parse("answertype")?,
            numbox: record.parse("numbox")?,
            vars1: text("vars1")?,
            answer: text("answer")?,
            answernotunique: record.flag("answernotunique")?,
            vars2: text("vars2")?,
            correctness: text("correctness")?,
            unitpenalty: record.parse("unitpenalty")?,
            postunit: text("postunit")?,
            ruleid: record.parse("ruleid")?,
            otherrule: text("otherrule")?,
            subqtext: text("subqtext")?,
            subqtextformat: record.parse("subqtextformat")?,
            feedback: text("feedback")?,
            feedbackformat: record.parse("feedbackformat")?,
            partcorrectfb: text("partcorrectfb")?,
            partcorrectfbformat: record.parse("partcorrectfbformat")?,
            partpartiallycorrectfb: text("partpartiallycorrectfb")?,
            partpartiallycorrectfbformat: record.parse("partpartiallycorrectfbformat")?,
            partincorrectfb: text("partincorrectfb")?,
            partincorrectfbformat: record.parse("partincorrectfbformat")?,
            emptyallowed: record.flag("emptyallowed")?,
        })
    }

    /// Field view with `id` but without `questionid`, matching the backup record.
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("partindex", self.partindex)
            .with("placeholder", &self.placeholder)
            .with("answermark", self.answermark)
            .with("answertype", self.answertype)
            .with("numbox", self.numbox)
            .with("vars1", &self.vars1)
            .with("answer", &self.answer)
            .with("answernotunique", flag_text(self.answernotunique))
            .with("vars2", &self.vars2)
            .with("correctness", &self.correctness)
            .with("unitpenalty", self.unitpenalty)
            .with("postunit", &self.postunit)
            .with("ruleid", self.ruleid)
            .with("otherrule", &self.otherrule)
            .with("subqtext", &self.subqtext)
            .with("subqtextformat", self.subqtextformat)
            .with("feedback", &self.feedback)
            .with("feedbackformat", self.feedbackformat)
            .with("partcorrectfb", &self.partcorrectfb)
            .with("partcorrectfbformat", self.partcorrectfbformat)
            .with("partpartiallycorrectfb", &self.partpartiallycorrectfb)
            .with("partpartiallycorrectfbformat", self.partpartiallycorrectfbformat)
            .with("partincorrectfb", &self.partincorrectfb)
            .with("partincorrectfbformat", self.partincorrectfbformat)
            .with("emptyallowed", flag_text(self.emptyallowed))
    }
}
