// src/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;
use crate::handlers::{backup, identity, restore};
use crate::host::{IdGenerator, QuestionStore, RestoreHost};
use crate::models::FormulasQuestion;
use crate::xml;

/// Capabilities a question type offers to the host backup/restore subsystem.
#[async_trait]
pub trait QuestionTypeHandler: Send + Sync {
    /// Name the host uses for the question type.
    fn qtype(&self) -> &'static str;

    /// Renders the question's backup XML.
    fn serialize(
        &self,
        question: &FormulasQuestion,
        ids: &mut dyn IdGenerator,
    ) -> Result<String, AppError>;

    /// Restores backup XML into the store for `target_question_id`.
    async fn deserialize(
        &self,
        backup: &str,
        target_question_id: i64,
        host: &mut dyn RestoreHost,
        store: &dyn QuestionStore,
    ) -> Result<restore::RestoreOutcome, AppError>;

    /// Merges backup XML into `base` for identity hashing.
    fn project_for_identity_hash(&self, base: Value, backup: &str) -> Result<Value, AppError>;
}

pub struct FormulasHandler {
    config: Config,
}

impl FormulasHandler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl QuestionTypeHandler for FormulasHandler {
    fn qtype(&self) -> &'static str {
        "formulas"
    }

    fn serialize(
        &self,
        question: &FormulasQuestion,
        ids: &mut dyn IdGenerator,
    ) -> Result<String, AppError> {
        backup::backup_question(question, ids, &self.config)
    }

    async fn deserialize(
        &self,
        backup: &str,
        target_question_id: i64,
        host: &mut dyn RestoreHost,
        store: &dyn QuestionStore,
    ) -> Result<restore::RestoreOutcome, AppError> {
        restore::restore_from_xml(backup, target_question_id, host, store, &self.config).await
    }

    fn project_for_identity_hash(&self, base: Value, backup: &str) -> Result<Value, AppError> {
        let tree = xml::parse_backup(backup)?;
        Ok(identity::project_for_identity_hash(base, &tree, &self.config))
    }
}

/// Handlers the host can look up by question type name.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn QuestionTypeHandler>>,
}

impl HandlerRegistry {
    pub fn register(&mut self, handler: Arc<dyn QuestionTypeHandler>) {
        tracing::debug!("Registered handler for question type '{}'", handler.qtype());
        self.handlers.insert(handler.qtype(), handler);
    }

    pub fn get(&self, qtype: &str) -> Result<Arc<dyn QuestionTypeHandler>, AppError> {
        self.handlers
            .get(qtype)
            .cloned()
            .ok_or_else(|| AppError::UnknownQtype(qtype.to_string()))
    }
}

/// Assembles the registry with every handler this crate provides.
pub fn create_registry(config: Config) -> HandlerRegistry {
    let mut registry = HandlerRegistry::default();
    registry.register(Arc::new(FormulasHandler::new(config)));
    registry
}
