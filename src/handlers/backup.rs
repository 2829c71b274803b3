// src/handlers/backup.rs

use std::collections::HashSet;

use tracing::debug;

use crate::config::Config;
use crate::error::AppError;
use crate::host::IdGenerator;
use crate::migration::{self, FieldDefault, FieldRule, OPTION_FIELDS, PART_FIELDS};
use crate::models::FormulasQuestion;
use crate::models::record::Record;
use crate::models::tree::{FormulasTree, TreeRecord};
use crate::xml;

/// Builds the backup record tree of one question.
///
/// * Absent optional fields are synthesized from the migration table.
/// * Absent required fields fail with `AppError::MissingField`.
/// * Parts without `partindex` take the free indices in ascending order, in
///   the order they appear in `question.answers`.
/// * Records without an `id` get one from `ids`.
///
/// Parts are emitted in increasing `partindex` order; indices must end up
/// dense (0..N-1), otherwise the part list is rejected.
pub fn serialize_question(
    question: &FormulasQuestion,
    ids: &mut dyn IdGenerator,
    config: &Config,
) -> Result<FormulasTree, AppError> {
    let options = build_record(&question.options, OPTION_FIELDS, ids, config)?;

    let mut answers = Vec::with_capacity(question.answers.len());
    for part in &question.answers {
        answers.push(build_record(part, PART_FIELDS, ids, config)?);
    }

    let taken = answers
        .iter()
        .filter_map(|answer| answer.fields.parse_opt::<i64>("partindex").transpose())
        .collect::<Result<HashSet<i64>, AppError>>()?;
    let mut free = (0i64..).filter(|index| !taken.contains(index));
    for answer in answers.iter_mut() {
        if !answer.fields.contains("partindex") {
            if let Some(index) = free.next() {
                answer.fields.set("partindex", index);
            }
        }
    }

    let mut keyed = answers
        .into_iter()
        .map(|answer| {
            let index = answer.fields.parse::<i64>("partindex")?;
            Ok((index, answer))
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    keyed.sort_by_key(|(index, _)| *index);

    for (expected, (index, _)) in keyed.iter().enumerate() {
        if *index != expected as i64 {
            return Err(AppError::invalid("partindex", index.to_string()));
        }
    }

    Ok(FormulasTree {
        options,
        answers: keyed.into_iter().map(|(_, answer)| answer).collect(),
    })
}

/// Serializes straight to backup XML.
pub fn backup_question(
    question: &FormulasQuestion,
    ids: &mut dyn IdGenerator,
    config: &Config,
) -> Result<String, AppError> {
    let tree = serialize_question(question, ids, config)?;
    debug!(
        "Serialized formulas question {} with {} part(s)",
        tree.options.id,
        tree.answers.len()
    );
    xml::write_backup(&tree)
}

fn build_record(
    input: &Record,
    rules: &[FieldRule],
    ids: &mut dyn IdGenerator,
    config: &Config,
) -> Result<TreeRecord, AppError> {
    let id = match input.parse_opt::<i64>("id")? {
        Some(id) => id,
        None => {
            let id = ids.next_id();
            debug!("Assigned fresh id {} to record without one", id);
            id
        }
    };

    let mut fields = Record::new();
    for rule in rules {
        if let Some(value) = rule.value_in(input) {
            fields.set(rule.name, value);
            continue;
        }
        match rule.default {
            FieldDefault::Required => return Err(AppError::MissingField(rule.name.to_string())),
            // Assigned once all parts are known.
            FieldDefault::PartIndex => {}
            default => {
                if let Some(value) = migration::default_value(default, config) {
                    fields.set(rule.name, value);
                }
            }
        }
    }

    Ok(TreeRecord { id, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::HostState;

    fn part(placeholder: &str) -> Record {
        Record::new()
            .with("placeholder", placeholder)
            .with("answermark", 1)
            .with("answertype", 1)
            .with("numbox", 1)
            .with("vars1", "")
            .with("answer", "a")
            .with("vars2", "")
            .with("correctness", "_relerr < 0.01")
            .with("unitpenalty", 1)
            .with("postunit", "m")
            .with("ruleid", 1)
            .with("otherrule", "")
            .with("subqtext", "")
            .with("feedback", "")
    }

    fn question(answers: Vec<Record>) -> FormulasQuestion {
        FormulasQuestion {
            options: Record::new()
                .with("id", 2)
                .with("varsrandom", "")
                .with("varsglobal", "a=1;"),
            answers,
        }
    }

    #[test]
    fn missing_partindex_takes_list_position() {
        let q = question(vec![part("p").with("id", 7), part("q").with("id", 8)]);
        let tree = serialize_question(&q, &mut HostState::new(), &Config::default()).unwrap();

        assert_eq!(tree.answers[0].id, 7);
        assert_eq!(tree.answers[0].fields.get("partindex"), Some("0"));
        assert_eq!(tree.answers[1].id, 8);
        assert_eq!(tree.answers[1].fields.get("partindex"), Some("1"));
    }

    #[test]
    fn parts_are_emitted_in_index_order() {
        let q = question(vec![
            part("second").with("partindex", 1),
            part("first").with("partindex", 0),
        ]);
        let tree = serialize_question(&q, &mut HostState::new(), &Config::default()).unwrap();
        assert_eq!(tree.answers[0].fields.get("placeholder"), Some("first"));
        assert_eq!(tree.answers[1].fields.get("placeholder"), Some("second"));
    }

    #[test]
    fn every_required_field_is_enforced() {
        for rule in PART_FIELDS.iter().filter(|r| r.is_required()) {
            let mut broken = part("p");
            broken.remove(rule.name);
            let err = serialize_question(
                &question(vec![broken]),
                &mut HostState::new(),
                &Config::default(),
            )
            .unwrap_err();
            assert!(matches!(err, AppError::MissingField(ref f) if f == rule.name));
        }

        let mut options = question(vec![]);
        options.options.remove("varsglobal");
        let err = serialize_question(&options, &mut HostState::new(), &Config::default())
            .unwrap_err();
        assert!(matches!(err, AppError::MissingField(ref f) if f == "varsglobal"));
    }

    #[test]
    fn optional_fields_are_synthesized() {
        let q = FormulasQuestion {
            options: Record::new().with("varsrandom", "").with("varsglobal", ""),
            answers: vec![part("p")],
        };
        let mut ids = HostState::with_id_base(100);
        let tree = serialize_question(&q, &mut ids, &Config::default()).unwrap();

        assert_eq!(tree.options.id, 101);
        assert_eq!(tree.answers[0].id, 102);
        assert_eq!(tree.options.fields.get("answernumbering"), Some("none"));
        assert_eq!(tree.options.fields.get("shownumcorrect"), Some("0"));
        assert_eq!(tree.options.fields.get("incorrectfeedbackformat"), Some("1"));

        let fields = &tree.answers[0].fields;
        assert_eq!(fields.get("partcorrectfb"), Some(""));
        assert_eq!(fields.get("feedbackformat"), Some("1"));
        assert_eq!(fields.get("answernotunique"), Some("1"));
        assert_eq!(fields.get("emptyallowed"), Some("0"));
    }

    #[test]
    fn unindexed_parts_fill_the_free_slots() {
        let q = question(vec![
            part("explicit").with("partindex", 1),
            part("implicit"),
            part("last").with("partindex", ""),
        ]);
        let tree = serialize_question(&q, &mut HostState::new(), &Config::default()).unwrap();

        let order: Vec<_> = tree
            .answers
            .iter()
            .map(|a| a.fields.get("placeholder").unwrap())
            .collect();
        assert_eq!(order, vec!["implicit", "explicit", "last"]);
        assert_eq!(tree.answers[2].fields.get("partindex"), Some("2"));
    }

    #[test]
    fn rejects_duplicate_part_indices() {
        let q = question(vec![
            part("a").with("partindex", 0),
            part("b").with("partindex", 0),
        ]);
        let err = serialize_question(&q, &mut HostState::new(), &Config::default()).unwrap_err();
        assert!(matches!(err, AppError::InvalidField { ref field, .. } if field == "partindex"));
    }
}
