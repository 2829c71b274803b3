// src/handlers/identity.rs

//! Canonical question data for duplicate detection.
//!
//! The host compares the fingerprint of an imported question with the one of
//! a live question; storage artifacts are stripped before hashing.

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::AppError;
use crate::migration::{self, IDENTITY_PART_DEFAULTS, PART_FIELDS};
use crate::models::answer::AnswerPart;
use crate::models::options::FormulasOptions;
use crate::models::record::Record;
use crate::models::tree::FormulasTree;
use crate::utils::hash::sha256_hex;

/// Paths removed before hashing. A path segment that meets an array applies
/// to every element.
pub const EXCLUDED_FIELDS: &[&str] = &[
    "/options/answers/id",
    "/options/answers/questionid",
    "/options/numparts",
];

fn record_to_map(record: &Record) -> Map<String, Value> {
    record
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

fn take_object(question: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match question.remove(key) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Merges the backup records into the host's generic question data.
///
/// `base` is whatever the host already built for the question; its `options`
/// object receives the `formulas` fields and an `answers` list with one entry
/// per part in document order.
pub fn project_for_identity_hash(base: Value, tree: &FormulasTree, config: &Config) -> Value {
    let mut question = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let mut options = take_object(&mut question, "options");

    options.extend(record_to_map(&tree.options.fields));

    let answers = tree
        .answers
        .iter()
        .map(|answer| {
            let mut fields = answer.fields.clone();
            migration::apply_defaults(&mut fields, PART_FIELDS, IDENTITY_PART_DEFAULTS, config);
            let mut map = record_to_map(&fields);
            map.insert("id".to_string(), Value::String(answer.id.to_string()));
            Value::Object(map)
        })
        .collect();
    options.insert("answers".to_string(), Value::Array(answers));

    question.insert("options".to_string(), Value::Object(options));
    Value::Object(question)
}

/// Same shape as `project_for_identity_hash`, built from stored rows.
pub fn live_question_data(base: Value, options: &FormulasOptions, parts: &[AnswerPart]) -> Value {
    let mut question = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let mut merged = take_object(&mut question, "options");

    merged.extend(record_to_map(&options.to_record()));
    let answers = parts
        .iter()
        .map(|part| {
            let mut map = record_to_map(&part.to_record());
            map.insert(
                "questionid".to_string(),
                Value::String(part.questionid.to_string()),
            );
            Value::Object(map)
        })
        .collect();
    merged.insert("answers".to_string(), Value::Array(answers));
    merged.insert("numparts".to_string(), Value::from(parts.len()));

    question.insert("options".to_string(), Value::Object(merged));
    Value::Object(question)
}

fn remove_path(value: &mut Value, path: &[&str]) {
    match value {
        Value::Array(items) => {
            for item in items {
                remove_path(item, path);
            }
        }
        Value::Object(map) => match path {
            [] => {}
            [last] => {
                map.remove(*last);
            }
            [head, rest @ ..] => {
                if let Some(child) = map.get_mut(*head) {
                    remove_path(child, rest);
                }
            }
        },
        _ => {}
    }
}

/// Strips the storage artifacts listed in `EXCLUDED_FIELDS`.
pub fn remove_excluded_fields(value: &mut Value) {
    for path in EXCLUDED_FIELDS {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        remove_path(value, &segments);
    }
}

/// SHA-256 of the canonical JSON of `question` after exclusion.
pub fn identity_hash(question: &Value) -> Result<String, AppError> {
    let mut canonical = question.clone();
    remove_excluded_fields(&mut canonical);
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(sha256_hex(&bytes))
}
