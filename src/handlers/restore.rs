// src/handlers/restore.rs

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::host::{QuestionStore, RestoreHost};
use crate::migration::{self, OPTION_FIELDS, PART_FIELDS};
use crate::models::answer::AnswerPart;
use crate::models::options::FormulasOptions;
use crate::models::tree::FormulasTree;
use crate::xml;

/// Mapping item name for the options record.
pub const OPTIONS_ITEM: &str = "qtype_formulas";
/// Mapping item name for answer parts.
pub const ANSWER_ITEM: &str = "qtype_formulas_answer";

/// What a restore pass did with the target question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Rows were written. Pairs are (backup id, new id).
    Inserted {
        options: (i64, i64),
        answers: Vec<(i64, i64)>,
    },
    /// The question already existed on the target; nothing was written.
    Matched,
}

/// Restores one question's records into `store`.
///
/// Rows are inserted only when the host created `target_question_id` during
/// this restore. Absent fields are backfilled per the migration table. A part
/// without `partindex` is placed after the highest index already stored for
/// the question; this is a best-effort for legacy backups and is not stable
/// when parts are restored out of order.
pub async fn restore_question(
    tree: &FormulasTree,
    target_question_id: i64,
    host: &mut dyn RestoreHost,
    store: &dyn QuestionStore,
    config: &Config,
) -> Result<RestoreOutcome, AppError> {
    if !host.question_created(target_question_id) {
        warn!(
            "Question {} matched an existing question, skipping formulas rows",
            target_question_id
        );
        return Ok(RestoreOutcome::Matched);
    }

    // Everything is validated before the first insert.
    let mut options_fields = tree.options.fields.clone();
    let filled = migration::backfill(&mut options_fields, OPTION_FIELDS, config)?;
    if !filled.is_empty() {
        debug!("Backfilled options fields {:?}", filled);
    }
    let options = FormulasOptions::from_record(0, target_question_id, &options_fields)?;

    let mut parts = Vec::with_capacity(tree.answers.len());
    for answer in &tree.answers {
        let mut fields = answer.fields.clone();
        let filled = migration::backfill(&mut fields, PART_FIELDS, config)?;
        if !filled.is_empty() {
            debug!("Backfilled fields {:?} of answer {}", filled, answer.id);
        }
        let has_index = fields.contains("partindex");
        if !has_index {
            fields.set("partindex", 0);
        }
        let part = AnswerPart::from_record(0, target_question_id, &fields)?;
        parts.push((answer.id, part, has_index));
    }

    let new_options_id = store.insert_options(&options).await?;
    host.set_mapping(OPTIONS_ITEM, tree.options.id, new_options_id);

    let mut answers = Vec::with_capacity(parts.len());
    for (old_id, mut part, has_index) in parts {
        if !has_index {
            part.partindex = match store.max_partindex(target_question_id).await? {
                Some(max) => max + 1,
                None => 0,
            };
            debug!("Answer {} has no partindex, using {}", old_id, part.partindex);
        }
        let new_id = store.insert_answer(&part).await?;
        host.set_mapping(ANSWER_ITEM, old_id, new_id);
        answers.push((old_id, new_id));
    }

    info!(
        "Restored formulas question {} with {} part(s)",
        target_question_id,
        answers.len()
    );

    Ok(RestoreOutcome::Inserted {
        options: (tree.options.id, new_options_id),
        answers,
    })
}

/// Parses backup XML and restores it.
pub async fn restore_from_xml(
    backup: &str,
    target_question_id: i64,
    host: &mut dyn RestoreHost,
    store: &dyn QuestionStore,
    config: &Config,
) -> Result<RestoreOutcome, AppError> {
    let tree = xml::parse_backup(backup)?;
    restore_question(&tree, target_question_id, host, store, config).await
}
