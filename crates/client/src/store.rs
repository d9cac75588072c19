//! Persistent credential store.
//!
//! One JSON document in the platform data directory holds the session
//! token under a fixed key, with an optionally cached profile next to it.
//!
//! Contract:
//! - `save` must not propagate persistence failure to the caller
//! - `load` returns an explicit absent value
//! - `clear` removes token and cached user together and is idempotent
//!
//! The in-memory copy is authoritative within the process; the file is a
//! mirror written on every mutation. With a single active session per
//! context the discipline is last-writer-wins, no locking.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use eqori_core::CurrentUser;

/// File name of the credential document inside the data directory.
const CREDENTIALS_FILE: &str = "credentials.json";

/// An opaque bearer token proving an authenticated identity.
///
/// Never inspected client-side; only attached to outgoing requests. Held as
/// a [`SecretString`] so it cannot leak through `Debug` output.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// Expose the raw token for header attachment.
    #[must_use]
    pub fn reveal(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// The persisted session: a token plus the optionally cached profile.
///
/// Token and user live and die together: both are written on login and both
/// are removed on logout or an observed authorization failure.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// The active bearer token.
    pub token: SessionToken,
    /// Cached profile from the last `/auth/me` call, if any.
    pub user: Option<CurrentUser>,
}

/// On-disk shape of the credential document.
#[derive(Serialize, Deserialize)]
struct PersistedCredentials {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<CurrentUser>,
}

/// Handle to the credential store. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: PathBuf,
    state: RwLock<Option<Credentials>>,
}

impl CredentialStore {
    /// Open the store rooted at `data_dir`, loading any persisted session.
    ///
    /// An unreadable or malformed credential file is treated as an absent
    /// session (logged, never fatal): the user simply has to log in again.
    #[must_use]
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join(CREDENTIALS_FILE);
        let state = RwLock::new(read_persisted(&path));
        Self {
            inner: Arc::new(StoreInner { path, state }),
        }
    }

    /// Store a session, replacing any previous one.
    ///
    /// Persistence failure is logged and swallowed: the session stays valid
    /// in memory for the life of the process even if the disk is read-only.
    pub fn save(&self, credentials: Credentials) {
        let mut guard = self.write();
        *guard = Some(credentials);
        self.persist(guard.as_ref());
    }

    /// Attach a cached profile to the current session, if one exists.
    ///
    /// A no-op when no token is stored: the profile is only ever a cache of
    /// an authenticated session.
    pub fn save_user(&self, user: CurrentUser) {
        let mut guard = self.write();
        if let Some(credentials) = guard.as_mut() {
            credentials.user = Some(user);
        }
        self.persist(guard.as_ref());
    }

    /// The stored session, or `None`.
    #[must_use]
    pub fn load(&self) -> Option<Credentials> {
        self.read().clone()
    }

    /// The stored token, or `None`.
    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.read().as_ref().map(|c| c.token.clone())
    }

    /// The cached profile, or `None`.
    #[must_use]
    pub fn cached_user(&self) -> Option<CurrentUser> {
        self.read().as_ref().and_then(|c| c.user.clone())
    }

    /// Remove the token and cached user, in memory and on disk.
    ///
    /// Idempotent: clearing an already-empty store succeeds silently.
    pub fn clear(&self) {
        let mut guard = self.write();
        *guard = None;
        match std::fs::remove_file(&self.inner.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.inner.path.display(), error = %e,
                    "failed to remove credential file");
            }
        }
    }

    /// Mirror the in-memory state to disk. Must not fail the caller.
    fn persist(&self, credentials: Option<&Credentials>) {
        let Some(credentials) = credentials else {
            return;
        };
        let doc = PersistedCredentials {
            token: credentials.token.reveal().to_string(),
            user: credentials.user.clone(),
        };
        if let Err(e) = write_persisted(&self.inner.path, &doc) {
            tracing::warn!(path = %self.inner.path.display(), error = %e,
                "failed to persist credentials; session will not survive restart");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Credentials>> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Credentials>> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.inner.path)
            .field("present", &self.read().is_some())
            .finish()
    }
}

fn read_persisted(path: &Path) -> Option<Credentials> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read credential file");
            return None;
        }
    };
    match serde_json::from_str::<PersistedCredentials>(&raw) {
        Ok(doc) => Some(Credentials {
            token: SessionToken::new(doc.token),
            user: doc.user,
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e,
                "malformed credential file; treating session as absent");
            None
        }
    }
}

fn write_persisted(path: &Path, doc: &PersistedCredentials) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec_pretty(doc).map_err(std::io::Error::other)?;
    std::fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    use eqori_core::{Email, UserId};

    fn sample_user() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("user@example.com").expect("valid email"),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_absent_on_fresh_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CredentialStore::open(dir.path());
        assert!(store.load().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_save_then_reopen_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CredentialStore::open(dir.path());
        store.save(Credentials {
            token: SessionToken::new("abc123"),
            user: Some(sample_user()),
        });

        // A fresh handle sees the persisted session.
        let reopened = CredentialStore::open(dir.path());
        let loaded = reopened.load().expect("persisted session");
        assert_eq!(loaded.token.reveal(), "abc123");
        assert_eq!(
            loaded.user.expect("cached user").email.as_str(),
            "user@example.com"
        );
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CredentialStore::open(dir.path());
        store.save(Credentials {
            token: SessionToken::new("abc123"),
            user: None,
        });

        store.clear();
        assert!(store.load().is_none());
        // Clearing again must not error or panic.
        store.clear();
        assert!(store.load().is_none());
        assert!(CredentialStore::open(dir.path()).load().is_none());
    }

    #[test]
    fn test_save_user_without_token_is_noop() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CredentialStore::open(dir.path());
        store.save_user(sample_user());
        assert!(store.cached_user().is_none());
    }

    #[test]
    fn test_save_survives_unwritable_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Make the "data directory" an existing file so create_dir_all fails.
        let bogus = dir.path().join("not-a-dir");
        std::fs::write(&bogus, b"x").expect("write file");

        let store = CredentialStore::open(&bogus);
        store.save(Credentials {
            token: SessionToken::new("abc123"),
            user: None,
        });

        // Persistence failed silently; the in-memory session is intact.
        assert_eq!(store.token().expect("in-memory token").reveal(), "abc123");
    }

    #[test]
    fn test_malformed_file_treated_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CREDENTIALS_FILE), b"{not json")
            .expect("write corrupt file");
        let store = CredentialStore::open(dir.path());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("super-secret-token");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret-token"));
        assert!(rendered.contains("REDACTED"));
    }
}
