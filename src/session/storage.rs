use parking_lot::Mutex;
use std::collections::HashMap;

use crate::utils::StorageError;

/// Key/value storage scoped to one client process (the "tab")
#[cfg_attr(test, mockall::automock)]
pub trait TabStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage living as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("chatSessionId").unwrap(), None);

        storage.set("chatSessionId", "user-deadbeef").unwrap();
        assert_eq!(
            storage.get("chatSessionId").unwrap(),
            Some("user-deadbeef".to_string())
        );
    }
}
