// src/state.rs

use std::collections::{HashMap, HashSet};

use crate::host::{IdGenerator, RestoreHost};

/// In-memory restore bookkeeping.
///
/// Suitable for hosts that keep no mapping table of their own and for tests.
#[derive(Debug, Clone, Default)]
pub struct HostState {
    created: HashSet<i64>,
    mappings: HashMap<(String, i64), i64>,
    last_id: i64,
}

impl HostState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers handed out by `next_id` start after `last_id`.
    pub fn with_id_base(last_id: i64) -> Self {
        Self {
            last_id,
            ..Self::default()
        }
    }

    /// Flags a question as freshly created by the running restore.
    pub fn mark_created(&mut self, questionid: i64) {
        self.created.insert(questionid);
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }
}

impl IdGenerator for HostState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl RestoreHost for HostState {
    fn question_created(&self, questionid: i64) -> bool {
        self.created.contains(&questionid)
    }

    fn set_mapping(&mut self, itemname: &str, old_id: i64, new_id: i64) {
        self.mappings.insert((itemname.to_string(), old_id), new_id);
    }

    fn get_mapping(&self, itemname: &str, old_id: i64) -> Option<i64> {
        self.mappings.get(&(itemname.to_string(), old_id)).copied()
    }
}
