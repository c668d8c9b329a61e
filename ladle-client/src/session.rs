//! The signed-in session: bearer token plus the cached current user.
//!
//! [`Session`] is the only place the token is read or written. It keeps the
//! state in memory and mirrors every change to a [`TokenStore`].

use ladle_core::{Role, User};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Persistence for the session between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, StoreError>;
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Write `contents` to a file only the owner can read, since it holds the
/// bearer token.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // mode() only applies when the file is created
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

/// JSON file on disk, e.g. ~/.ladle/session.json
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        write_private(&self.path, &serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and one-shot use.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        Ok(self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

pub struct Session {
    store: Box<dyn TokenStore>,
    state: RwLock<Option<StoredSession>>,
}

impl Session {
    /// Restore whatever the store holds. An unreadable store starts signed out.
    pub fn load(store: impl TokenStore + 'static) -> Self {
        let state = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable session store");
            None
        });
        Self {
            store: Box::new(store),
            state: RwLock::new(state),
        }
    }

    /// Signed-out session that is never persisted.
    pub fn in_memory() -> Self {
        Self::load(MemoryTokenStore::new())
    }

    fn read(&self) -> Option<StoredSession> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Memory and store are updated under the same write lock so concurrent
    /// writers land in the same order in both.
    fn write(&self, next: Option<StoredSession>) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let persisted = match &next {
            Some(session) => self.store.save(session),
            None => self.store.clear(),
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "failed to persist session");
        }
        *guard = next;
    }

    pub fn token(&self) -> Option<String> {
        self.read().map(|s| s.token)
    }

    pub fn user(&self) -> Option<User> {
        self.read().and_then(|s| s.user)
    }

    /// Role of the cached user. Advisory only: the server decides.
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, token: String, user: Option<User>) {
        self.write(Some(StoredSession { token, user }));
    }

    /// Refresh the cached user; ignored when signed out.
    pub fn set_user(&self, user: User) {
        if let Some(mut current) = self.read() {
            current.user = Some(user);
            self.write(Some(current));
        }
    }

    pub fn clear(&self) {
        self.write(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role,
            bio: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_set_and_clear() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.set("tok".to_string(), Some(user(Role::Admin)));
        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.role(), Some(Role::Admin));

        session.clear();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn test_set_user_ignored_when_signed_out() {
        let session = Session::in_memory();
        session.set_user(user(Role::User));
        assert!(session.user().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::load(FileTokenStore::new(&path));
        session.set("abc".to_string(), Some(user(Role::User)));
        assert!(path.exists());

        let restored = Session::load(FileTokenStore::new(&path));
        assert_eq!(restored.token().as_deref(), Some("abc"));

        restored.clear();
        assert!(!path.exists());
    }

    #[test]
    fn test_corrupt_file_starts_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let session = Session::load(FileTokenStore::new(&path));
        assert!(!session.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileTokenStore::new(&path);
        store
            .save(&StoredSession {
                token: "secret".to_string(),
                user: None,
            })
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_poisoned_lock_still_updates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = std::sync::Arc::new(Session::load(FileTokenStore::new(&path)));

        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.write().unwrap();
            panic!("writer panicked while holding the session lock");
        })
        .join();
        assert!(session.state.is_poisoned());

        session.set("fresh".to_string(), None);
        assert_eq!(session.token().as_deref(), Some("fresh"));

        let on_disk = FileTokenStore::new(&path).load().unwrap().unwrap();
        assert_eq!(on_disk.token, "fresh");

        session.clear();
        assert!(session.token().is_none());
        assert!(!path.exists());
    }
}
