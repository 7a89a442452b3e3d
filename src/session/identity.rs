use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::storage::TabStorage;
use crate::constants::{SESSION_ID_HEX_LEN, SESSION_ID_PREFIX, SESSION_STORAGE_KEY};

/// Opaque per-process session token, `user-` followed by 8 hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", SESSION_ID_PREFIX, &hex[..SESSION_ID_HEX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out the session id, creating and storing it on first use.
///
/// When the storage fails, every call generates a new id. The session then
/// loses server-side correlation between questions, but the client keeps
/// working.
#[derive(Clone)]
pub struct SessionIdentity {
    storage: Arc<dyn TabStorage>,
}

impl SessionIdentity {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self { storage }
    }

    pub fn get_or_create_session_id(&self) -> SessionId {
        match self.storage.get(SESSION_STORAGE_KEY) {
            Ok(Some(existing)) => return SessionId(existing),
            Ok(None) => {}
            Err(e) => {
                warn!("session storage unreadable, using an ephemeral id: {}", e);
                return SessionId::generate();
            }
        }

        let id = SessionId::generate();
        if let Err(e) = self.storage.set(SESSION_STORAGE_KEY, id.as_str()) {
            warn!("could not persist session id: {}", e);
        } else {
            debug!(session_id = %id, "created session id");
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::{MemoryStorage, MockTabStorage};
    use crate::utils::StorageError;

    fn is_well_formed(id: &SessionId) -> bool {
        let Some(hex) = id.as_str().strip_prefix("user-") else {
            return false;
        };
        hex.len() == 8 && hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_new_id_format() {
        for _ in 0..50 {
            assert!(is_well_formed(&SessionId::generate()));
        }
    }

    #[test]
    fn test_id_is_stable_within_session() {
        let storage = Arc::new(MemoryStorage::new());
        let identity = SessionIdentity::new(storage.clone());

        let first = identity.get_or_create_session_id();
        let second = identity.get_or_create_session_id();

        assert!(is_well_formed(&first));
        assert_eq!(first, second);
        assert_eq!(
            storage.get(SESSION_STORAGE_KEY).unwrap(),
            Some(first.to_string())
        );
    }

    #[test]
    fn test_existing_entry_is_reused() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SESSION_STORAGE_KEY, "user-cafebabe").unwrap();
        let identity = SessionIdentity::new(storage);

        assert_eq!(identity.get_or_create_session_id().as_str(), "user-cafebabe");
    }

    #[test]
    fn test_unavailable_storage_degrades_to_fresh_ids() {
        let mut storage = MockTabStorage::new();
        storage
            .expect_get()
            .returning(|_| Err(StorageError::Unavailable("disabled".into())));
        storage.expect_set().never();
        let identity = SessionIdentity::new(Arc::new(storage));

        let first = identity.get_or_create_session_id();
        let second = identity.get_or_create_session_id();
        assert!(is_well_formed(&first));
        assert!(is_well_formed(&second));
    }

    #[test]
    fn test_failed_write_still_returns_id() {
        let mut storage = MockTabStorage::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .times(1)
            .returning(|_, _| Err(StorageError::Unavailable("quota".into())));
        let identity = SessionIdentity::new(Arc::new(storage));

        assert!(is_well_formed(&identity.get_or_create_session_id()));
    }
}
