// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod migration;
pub mod models;
pub mod registry;
pub mod state;
pub mod store;
pub mod utils;
pub mod xml;

// Re-export specific items for convenience
pub use registry::{FormulasHandler, HandlerRegistry, QuestionTypeHandler, create_registry};
