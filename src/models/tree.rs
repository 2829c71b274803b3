// src/models/tree.rs

use serde::{Deserialize, Serialize};

use crate::models::record::Record;

/// One tagged element of a backup: the `id` attribute plus its leaf fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: i64,
    pub fields: Record,
}

/// The nested record tree of one question, as exchanged with the host.
///
/// `options` is the `formulas` element, `answers` the `formulas_answer`
/// elements of the `formulas_answers` section in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulasTree {
    pub options: TreeRecord,
    pub answers: Vec<TreeRecord>,
}
