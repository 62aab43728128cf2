//! Session state and persistence.
//!
//! The session holds the current token pair and user record. It is shared
//! through [`SessionHandle`], a cheaply clonable handle with an explicit
//! update/clear API; the HTTP client reads the access token through it on
//! every request and the refresh flow writes new tokens back through it.
//!
//! Persistence goes through the [`SessionStorage`] key-value trait so the
//! core logic stays storage-agnostic: [`FileStorage`] keeps a JSON document
//! per profile under `~/.stockpile/`, [`MemoryStorage`] backs tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::models::User;

/// Storage key for the access token.
pub const KEY_ACCESS_TOKEN: &str = "access_token";
/// Storage key for the refresh token.
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
/// Storage key for the serialized user record.
pub const KEY_USER: &str = "user";

/// Session persistence failure.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    /// Creates a new storage error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Durable key-value persistence for session fields.
pub trait SessionStorage: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes every stored key.
    fn clear(&self) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON document holding all keys.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Creates a store backed by the given file. The file is created lazily
    /// on first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Creates the store for a named profile under `~/.stockpile/`.
    pub fn for_profile(profile: &str) -> Result<Self, StorageError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StorageError::new("cannot determine home directory"))?
            .join(".stockpile");
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join(format!("session.{profile}.json"))))
    }

    fn load_map(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests.
#[derive(Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        map.clear();
        Ok(())
    }
}

/// The current authentication state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
    pub return_url: Option<String>,
}

/// Shared handle over the session. Clones share the same state and storage.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionHandle {
    /// Creates an empty session over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Arc::new(RwLock::new(Session::default())),
            storage,
        }
    }

    /// Creates a session populated from persisted values.
    ///
    /// A user record that fails to parse is dropped rather than failing the
    /// whole load; the tokens still allow the session to operate.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Result<Self, StorageError> {
        let access_token = storage.get(KEY_ACCESS_TOKEN)?;
        let refresh_token = storage.get(KEY_REFRESH_TOKEN)?;
        let user = match storage.get(KEY_USER)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    warn!(error = %err, "discarding unparseable persisted user record");
                    None
                }
            },
            None => None,
        };
        Ok(Self {
            state: Arc::new(RwLock::new(Session {
                access_token,
                refresh_token,
                user,
                return_url: None,
            })),
            storage,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    /// Returns the current refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// Returns the current user record, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Returns `true` if an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    /// Returns the post-login return URL, if one was recorded.
    #[must_use]
    pub fn return_url(&self) -> Option<String> {
        self.read().return_url.clone()
    }

    /// Records where to navigate after the next successful login. Held in
    /// memory only.
    pub fn set_return_url(&self, url: Option<String>) {
        self.write().return_url = url;
    }

    /// Installs a full session after a successful login and persists it.
    pub fn establish(
        &self,
        access: String,
        refresh: String,
        user: User,
    ) -> Result<(), StorageError> {
        self.storage.set(KEY_ACCESS_TOKEN, &access)?;
        self.storage.set(KEY_REFRESH_TOKEN, &refresh)?;
        self.storage.set(KEY_USER, &serde_json::to_string(&user)?)?;
        let mut state = self.write();
        state.access_token = Some(access);
        state.refresh_token = Some(refresh);
        state.user = Some(user);
        debug!("session established");
        Ok(())
    }

    /// Overwrites the token pair after a successful refresh and persists it.
    /// When the backend does not rotate the refresh token, the current one
    /// is kept.
    pub fn update_tokens(
        &self,
        access: String,
        refresh: Option<String>,
    ) -> Result<(), StorageError> {
        self.storage.set(KEY_ACCESS_TOKEN, &access)?;
        if let Some(refresh) = &refresh {
            self.storage.set(KEY_REFRESH_TOKEN, refresh)?;
        }
        let mut state = self.write();
        state.access_token = Some(access);
        if refresh.is_some() {
            state.refresh_token = refresh;
        }
        Ok(())
    }

    /// Clears the whole session, in memory and in storage.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear()?;
        let mut state = self.write();
        *state = Session::default();
        debug!("session cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            username: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_establish_persists_all_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionHandle::new(storage.clone());
        session
            .establish("acc".to_string(), "ref".to_string(), test_user())
            .unwrap();

        assert_eq!(session.access_token().as_deref(), Some("acc"));
        assert_eq!(session.refresh_token().as_deref(), Some("ref"));
        assert!(session.is_authenticated());
        assert_eq!(storage.get(KEY_ACCESS_TOKEN).unwrap().as_deref(), Some("acc"));
        assert_eq!(storage.get(KEY_REFRESH_TOKEN).unwrap().as_deref(), Some("ref"));
        assert!(storage.get(KEY_USER).unwrap().is_some());
    }

    #[test]
    fn test_load_restores_persisted_session() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let session = SessionHandle::new(storage.clone());
            session
                .establish("acc".to_string(), "ref".to_string(), test_user())
                .unwrap();
        }
        let restored = SessionHandle::load(storage).unwrap();
        assert_eq!(restored.access_token().as_deref(), Some("acc"));
        assert_eq!(restored.user().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_load_drops_corrupt_user_record() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(KEY_ACCESS_TOKEN, "acc").unwrap();
        storage.set(KEY_USER, "not json").unwrap();
        let session = SessionHandle::load(storage).unwrap();
        assert!(session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_clear_empties_state_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionHandle::new(storage.clone());
        session
            .establish("acc".to_string(), "ref".to_string(), test_user())
            .unwrap();
        session.clear().unwrap();

        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
        assert!(session.user().is_none());
        assert!(storage.get(KEY_ACCESS_TOKEN).unwrap().is_none());
        assert!(storage.get(KEY_REFRESH_TOKEN).unwrap().is_none());
        assert!(storage.get(KEY_USER).unwrap().is_none());
    }

    #[test]
    fn test_update_tokens_keeps_refresh_when_not_rotated() {
        let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
        session
            .establish("old-acc".to_string(), "old-ref".to_string(), test_user())
            .unwrap();

        session.update_tokens("new-acc".to_string(), None).unwrap();
        assert_eq!(session.access_token().as_deref(), Some("new-acc"));
        assert_eq!(session.refresh_token().as_deref(), Some("old-ref"));

        session
            .update_tokens("acc2".to_string(), Some("ref2".to_string()))
            .unwrap();
        assert_eq!(session.refresh_token().as_deref(), Some("ref2"));
    }

    #[test]
    fn test_return_url_shared_across_clones_and_cleared_on_logout() {
        let session = SessionHandle::new(Arc::new(MemoryStorage::new()));
        assert!(session.return_url().is_none());

        session.set_return_url(Some("/dashboard/default".to_string()));
        let clone = session.clone();
        assert_eq!(clone.return_url().as_deref(), Some("/dashboard/default"));

        session.clear().unwrap();
        assert!(clone.return_url().is_none());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        assert!(storage.get(KEY_ACCESS_TOKEN).unwrap().is_none());
        storage.set(KEY_ACCESS_TOKEN, "acc").unwrap();
        storage.set(KEY_REFRESH_TOKEN, "ref").unwrap();
        assert_eq!(storage.get(KEY_ACCESS_TOKEN).unwrap().as_deref(), Some("acc"));
        assert_eq!(storage.get(KEY_REFRESH_TOKEN).unwrap().as_deref(), Some("ref"));

        storage.clear().unwrap();
        assert!(storage.get(KEY_ACCESS_TOKEN).unwrap().is_none());
        assert!(!dir.path().join("session.json").exists());
    }
}
