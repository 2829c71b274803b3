// src/store/sqlite.rs

use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::config::Config;
use crate::error::AppError;
use crate::host::QuestionStore;
use crate::models::answer::AnswerPart;
use crate::models::options::FormulasOptions;

/// `QuestionStore` backed by an SQLite pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `config.database_url` and applies the migrations.
    ///
    /// In-memory databases are per connection, so the pool is capped at one.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let max_connections = if config.database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        tracing::info!("Formulas store ready at {}", config.database_url);
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn insert_options(&self, options: &FormulasOptions) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO qtype_formulas_options
            (questionid, varsrandom, varsglobal,
             correctfeedback, correctfeedbackformat,
             partiallycorrectfeedback, partiallycorrectfeedbackformat,
             incorrectfeedback, incorrectfeedbackformat,
             shownumcorrect, answernumbering)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(options.questionid)
        .bind(&options.varsrandom)
        .bind(&options.varsglobal)
        .bind(&options.correctfeedback)
        .bind(options.correctfeedbackformat)
        .bind(&options.partiallycorrectfeedback)
        .bind(options.partiallycorrectfeedbackformat)
        .bind(&options.incorrectfeedback)
        .bind(options.incorrectfeedbackformat)
        .bind(options.shownumcorrect)
        .bind(options.answernumbering)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert formulas options: {:?}", e);
            AppError::Database(e.to_string())
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn insert_answer(&self, answer: &AnswerPart) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO qtype_formulas_answers
            (questionid, partindex, placeholder, answermark, answertype, numbox,
             vars1, answer, answernotunique, vars2, correctness, unitpenalty,
             postunit, ruleid, otherrule, subqtext, subqtextformat,
             feedback, feedbackformat,
             partcorrectfb, partcorrectfbformat,
             partpartiallycorrectfb, partpartiallycorrectfbformat,
             partincorrectfb, partincorrectfbformat, emptyallowed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(answer.questionid)
        .bind(answer.partindex)
        .bind(&answer.placeholder)
        .bind(answer.answermark)
        .bind(answer.answertype)
        .bind(answer.numbox)
        .bind(&answer.vars1)
        .bind(&answer.answer)
        .bind(answer.answernotunique)
        .bind(&answer.vars2)
        .bind(&answer.correctness)
        .bind(answer.unitpenalty)
        .bind(&answer.postunit)
        .bind(answer.ruleid)
        .bind(&answer.otherrule)
        .bind(&answer.subqtext)
        .bind(answer.subqtextformat)
        .bind(&answer.feedback)
        .bind(answer.feedbackformat)
        .bind(&answer.partcorrectfb)
        .bind(answer.partcorrectfbformat)
        .bind(&answer.partpartiallycorrectfb)
        .bind(answer.partpartiallycorrectfbformat)
        .bind(&answer.partincorrectfb)
        .bind(answer.partincorrectfbformat)
        .bind(answer.emptyallowed)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert formulas answer: {:?}", e);
            AppError::Database(e.to_string())
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn max_partindex(&self, questionid: i64) -> Result<Option<i64>, AppError> {
        let max = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(partindex) FROM qtype_formulas_answers WHERE questionid = ?",
        )
        .bind(questionid)
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn load_options(&self, questionid: i64) -> Result<Option<FormulasOptions>, AppError> {
        let options = sqlx::query_as::<_, FormulasOptions>(
            "SELECT * FROM qtype_formulas_options WHERE questionid = ?",
        )
        .bind(questionid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(options)
    }

    async fn load_answers(&self, questionid: i64) -> Result<Vec<AnswerPart>, AppError> {
        let answers = sqlx::query_as::<_, AnswerPart>(
            "SELECT * FROM qtype_formulas_answers WHERE questionid = ? ORDER BY partindex, id",
        )
        .bind(questionid)
        .fetch_all(&self.pool)
        .await?;

        Ok(answers)
    }
}
