use std::collections::HashMap;

use super::{Persistence, PersistenceError};

/// In-process storage; nothing survives the session
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, e.g. data left by an earlier session
    pub fn with_value(mut self, key: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.insert(key.into(), raw.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Persistence for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, raw: &str) -> Result<(), PersistenceError> {
        self.values.insert(key.to_string(), raw.to_string());
        Ok(())
    }
}
