// src/store/mod.rs

pub mod sqlite;

pub use sqlite::SqliteStore;
