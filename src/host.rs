// src/host.rs

//! Operations this crate consumes from the host backup/restore subsystem.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::answer::AnswerPart;
use crate::models::options::FormulasOptions;

/// Hands out fresh identifiers for records that arrive without one.
pub trait IdGenerator {
    fn next_id(&mut self) -> i64;
}

/// Restore-job bookkeeping owned by the host.
pub trait RestoreHost: Send {
    /// True when the restore created this question; false when it was matched
    /// to a question that already exists on the target site.
    fn question_created(&self, questionid: i64) -> bool;

    /// Records that `old_id` from the backup became `new_id` in the target store.
    fn set_mapping(&mut self, itemname: &str, old_id: i64, new_id: i64);

    fn get_mapping(&self, itemname: &str, old_id: i64) -> Option<i64>;
}

/// Access to the two tables of the question type.
///
/// Inserts ignore the `id` of the row passed in; the store assigns it and
/// returns the new value.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn insert_options(&self, options: &FormulasOptions) -> Result<i64, AppError>;

    async fn insert_answer(&self, answer: &AnswerPart) -> Result<i64, AppError>;

    /// Highest `partindex` stored for the question, `None` when it has no parts.
    async fn max_partindex(&self, questionid: i64) -> Result<Option<i64>, AppError>;

    async fn load_options(&self, questionid: i64) -> Result<Option<FormulasOptions>, AppError>;

    /// Parts of the question ordered by `partindex`.
    async fn load_answers(&self, questionid: i64) -> Result<Vec<AnswerPart>, AppError>;
}
