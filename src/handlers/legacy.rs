// src/handlers/legacy.rs

use tracing::debug;

use crate::config::Config;
use crate::migration::{self, COMBINED_FEEDBACK, PART_TEXT_FIELDS};
use crate::models::FormulasQuestion;
use crate::models::record::Record;

/// A question as stored by pre-XML archives: flat question fields plus one
/// `answers` list. The list may be missing altogether.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyQuestion {
    pub fields: Record,
    pub answers: Option<Vec<Record>>,
}

fn normalize(record: &Record) -> Record {
    record
        .iter()
        .map(|(name, value)| (migration::current_name(name), value.to_string()))
        .collect()
}

/// Converts a legacy question into serializer input.
///
/// * Every answer gets `partindex` equal to its position in the list.
/// * Every part text field present in the archive is stamped with the default
///   format. Absent text fields get no format here; the serializer fills both.
/// * The combined-feedback group is filled with empty text.
pub fn import_legacy(legacy: &LegacyQuestion, config: &Config) -> FormulasQuestion {
    let format = config.default_format.to_string();

    let mut options = normalize(&legacy.fields);
    options.remove("answers");
    for (text, text_format) in COMBINED_FEEDBACK {
        options.set(text, "");
        options.set(text_format, &format);
    }
    options.set("shownumcorrect", "0");

    let answers: Vec<Record> = legacy
        .answers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(position, answer)| {
            let mut part = normalize(answer);
            part.set("partindex", position);
            for (text, text_format) in PART_TEXT_FIELDS {
                if part.contains(text) {
                    part.set(text_format, &format);
                }
            }
            part
        })
        .collect();

    debug!("Imported legacy formulas question with {} part(s)", answers.len());

    FormulasQuestion { options, answers }
}
