// src/migration.rs

//! Field migration table.
//!
//! Lists every field of the two interchange records in schema order together
//! with the rule applied when an older backup does not carry it. Archives from
//! the pre-XML era used upper-case tag names; `current_name` maps them onto the
//! current lower-case names.

use crate::config::Config;
use crate::error::AppError;
use crate::models::record::Record;

/// What to do when a field is absent from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Grading data: absence is a hard error.
    Required,
    /// Empty text.
    Text,
    /// The configured default rich-text format.
    Format,
    Flag(bool),
    /// Numbering style "none".
    Numbering,
    /// Part position; the value depends on the operation, see the callers.
    PartIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub default: FieldDefault,
}

const fn rule(name: &'static str, default: FieldDefault) -> FieldRule {
    FieldRule { name, default }
}

impl FieldRule {
    pub fn is_required(&self) -> bool {
        self.default == FieldDefault::Required
    }

    /// Whether an empty value stands for "not given". Only free text may be empty.
    pub fn empty_is_absent(&self) -> bool {
        matches!(
            self.default,
            FieldDefault::Format
                | FieldDefault::Flag(_)
                | FieldDefault::Numbering
                | FieldDefault::PartIndex
        )
    }

    /// The value `record` carries for this rule, with empty non-text values treated as absent.
    pub fn value_in<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record
            .get(self.name)
            .filter(|value| !(self.empty_is_absent() && value.trim().is_empty()))
    }

    /// Tag name used by pre-XML archives.
    pub fn legacy_name(&self) -> String {
        self.name.to_ascii_uppercase()
    }
}

/// Fields of the `formulas` element, in schema order.
pub const OPTION_FIELDS: &[FieldRule] = &[
    rule("varsrandom", FieldDefault::Required),
    rule("varsglobal", FieldDefault::Required),
    rule("correctfeedback", FieldDefault::Text),
    rule("correctfeedbackformat", FieldDefault::Format),
    rule("partiallycorrectfeedback", FieldDefault::Text),
    rule("partiallycorrectfeedbackformat", FieldDefault::Format),
    rule("incorrectfeedback", FieldDefault::Text),
    rule("incorrectfeedbackformat", FieldDefault::Format),
    rule("shownumcorrect", FieldDefault::Flag(false)),
    rule("answernumbering", FieldDefault::Numbering),
];

/// Fields of a `formulas_answer` element, in schema order.
pub const PART_FIELDS: &[FieldRule] = &[
    rule("partindex", FieldDefault::PartIndex),
    rule("placeholder", FieldDefault::Required),
    rule("answermark", FieldDefault::Required),
    rule("answertype", FieldDefault::Required),
    rule("numbox", FieldDefault::Required),
    rule("vars1", FieldDefault::Required),
    rule("answer", FieldDefault::Required),
    rule("answernotunique", FieldDefault::Flag(true)),
    rule("vars2", FieldDefault::Required),
    rule("correctness", FieldDefault::Required),
    rule("unitpenalty", FieldDefault::Required),
    rule("postunit", FieldDefault::Required),
    rule("ruleid", FieldDefault::Required),
    rule("otherrule", FieldDefault::Required),
    rule("subqtext", FieldDefault::Required),
    rule("subqtextformat", FieldDefault::Format),
    rule("feedback", FieldDefault::Required),
    rule("feedbackformat", FieldDefault::Format),
    rule("partcorrectfb", FieldDefault::Text),
    rule("partcorrectfbformat", FieldDefault::Format),
    rule("partpartiallycorrectfb", FieldDefault::Text),
    rule("partpartiallycorrectfbformat", FieldDefault::Format),
    rule("partincorrectfb", FieldDefault::Text),
    rule("partincorrectfbformat", FieldDefault::Format),
    rule("emptyallowed", FieldDefault::Flag(false)),
];

/// Question-level feedback text fields and their format companions.
pub const COMBINED_FEEDBACK: &[(&str, &str)] = &[
    ("correctfeedback", "correctfeedbackformat"),
    ("partiallycorrectfeedback", "partiallycorrectfeedbackformat"),
    ("incorrectfeedback", "incorrectfeedbackformat"),
];

/// Part text fields and their format companions.
pub const PART_TEXT_FIELDS: &[(&str, &str)] = &[
    ("subqtext", "subqtextformat"),
    ("feedback", "feedbackformat"),
    ("partcorrectfb", "partcorrectfbformat"),
    ("partpartiallycorrectfb", "partpartiallycorrectfbformat"),
    ("partincorrectfb", "partincorrectfbformat"),
];

/// Defaults applied to parts when building identity-hash data.
pub const IDENTITY_PART_DEFAULTS: &[&str] = &["answernotunique", "emptyallowed"];

/// Maps a legacy tag name onto the current field name.
pub fn current_name(legacy: &str) -> String {
    legacy.to_ascii_lowercase()
}

pub fn find_rule(rules: &[FieldRule], name: &str) -> Option<FieldRule> {
    rules.iter().copied().find(|r| r.name == name)
}

/// Text value a rule synthesizes, or `None` for rules without a static default.
pub fn default_value(default: FieldDefault, config: &Config) -> Option<String> {
    match default {
        FieldDefault::Text => Some(String::new()),
        FieldDefault::Format => Some(config.default_format.to_string()),
        FieldDefault::Flag(value) => Some(crate::models::record::flag_text(value).to_string()),
        FieldDefault::Numbering => Some("none".to_string()),
        FieldDefault::Required | FieldDefault::PartIndex => None,
    }
}

/// Fills every absent field that has a static default.
///
/// Empty flags, formats, numbering styles and part indices count as absent.
/// Fails on the first absent required field. `PartIndex` fields are left
/// absent. Returns the names of the fields that were filled.
pub fn backfill(
    record: &mut Record,
    rules: &[FieldRule],
    config: &Config,
) -> Result<Vec<&'static str>, AppError> {
    let mut filled = Vec::new();
    for rule in rules {
        if rule.value_in(record).is_some() {
            continue;
        }
        record.remove(rule.name);
        if rule.is_required() {
            return Err(AppError::MissingField(rule.name.to_string()));
        }
        if let Some(value) = default_value(rule.default, config) {
            record.set(rule.name, value);
            filled.push(rule.name);
        }
    }
    Ok(filled)
}

/// Applies only the named defaults, never failing on required fields.
pub fn apply_defaults(record: &mut Record, rules: &[FieldRule], names: &[&str], config: &Config) {
    for name in names {
        if let Some(rule) = find_rule(rules, name) {
            if let Some(value) = default_value(rule.default, config) {
                record.set_default(rule.name, value);
            }
        }
    }
}
