//! Auth session manager.
//!
//! Sole owner of the credential lifecycle: the session manager is the only
//! writer to the credential store apart from the transport's clear-on-401
//! path. Front-ends read the published [`SessionState`] and never touch the
//! store directly.
//!
//! State machine:
//!
//! ```text
//! Resolving ──resolve──▶ Anonymous ◀──logout / 401── Authenticated
//!                            │                            ▲
//!                     login/register              success │
//!                            ▼                            │
//!                       Authenticating ───────────────────┘
//!                            │ failure
//!                            ▼
//!                        Anonymous
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use eqori_core::{CurrentUser, Email};

use crate::error::ApiError;
use crate::store::{Credentials, CredentialStore, SessionToken};
use crate::transport::ApiTransport;

/// Minimum password length enforced client-side before any request.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Published session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Startup: a stored token (if any) is being validated. Route guards
    /// must hold rendering rather than redirect while in this state.
    #[default]
    Resolving,
    /// No token, no user.
    Anonymous,
    /// A login or registration is in flight.
    Authenticating,
    /// Token persisted and profile confirmed by the backend.
    Authenticated(CurrentUser),
}

impl SessionState {
    /// The authenticated profile, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Discriminated outcome of a login or registration attempt.
///
/// Expected credential failures are data, not errors: only transport and
/// server faults surface as `Err` from the session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The session is established.
    Accepted(CurrentUser),
    /// The attempt was refused; `reason` is suitable for form-level display.
    Rejected {
        /// Human-readable reason (server-provided, or the local validation
        /// message when no request was issued).
        reason: String,
    },
}

impl AuthOutcome {
    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Token grant returned by the login endpoint.
///
/// Deployment revisions disagree on the field name (`access_token` per the
/// OAuth2 form flow, `token` in older revisions); both are accepted.
#[derive(Debug, Deserialize)]
struct TokenGrant {
    #[serde(alias = "access_token")]
    token: String,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}

#[derive(Serialize)]
struct RegistrationRequest<'a> {
    email: &'a str,
    username: &'a str,
    password: &'a str,
}

/// The auth session manager. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: ApiTransport,
    state: RwLock<SessionState>,
}

impl AuthSession {
    /// Create a session manager in the `Resolving` state.
    #[must_use]
    pub fn new(transport: ApiTransport) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport,
                state: RwLock::new(SessionState::Resolving),
            }),
        }
    }

    /// The currently published state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The cached profile, without a network call.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state().user().cloned()
    }

    /// Validate any stored token and publish the resolved state.
    ///
    /// Called once at startup. No token means `Anonymous` without a network
    /// call; a stored token is confirmed against `/auth/me`. An invalid
    /// token resolves to `Anonymous` (the 401 path has already cleared the
    /// store).
    ///
    /// # Errors
    ///
    /// Returns the transport or server error when the backend could not be
    /// consulted; the state is published as `Anonymous` for this run and
    /// the stored token is left for a later attempt.
    pub async fn resolve(&self) -> Result<SessionState, ApiError> {
        if self.store().token().is_none() {
            self.publish(SessionState::Anonymous);
            return Ok(SessionState::Anonymous);
        }

        match self.transport().get::<CurrentUser>("/auth/me", &[]).await {
            Ok(user) => {
                self.store().save_user(user.clone());
                let state = SessionState::Authenticated(user);
                self.publish(state.clone());
                Ok(state)
            }
            Err(e) if e.is_unauthorized() => {
                self.publish(SessionState::Anonymous);
                Ok(SessionState::Anonymous)
            }
            Err(e) => {
                self.publish(SessionState::Anonymous);
                Err(e)
            }
        }
    }

    /// Attempt to establish a session with the given credentials.
    ///
    /// On success the token is persisted, the profile fetched and cached,
    /// and the state becomes `Authenticated`. A 4xx refusal publishes
    /// `Anonymous` and returns [`AuthOutcome::Rejected`] with the server's
    /// reason - it is not an `Err`.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failure or a 5xx response; the
    /// state is `Anonymous` on every failure path.
    pub async fn login(&self, email: &Email, password: &str) -> Result<AuthOutcome, ApiError> {
        self.publish(SessionState::Authenticating);

        let form = [("username", email.as_str()), ("password", password)];
        let grant: TokenGrant = match self.transport().post_form("/auth/login", &form).await {
            Ok(grant) => grant,
            Err(e) => return self.refuse_or_raise(e),
        };

        self.store().save(Credentials {
            token: SessionToken::new(grant.token),
            user: None,
        });

        let user: CurrentUser = match self.transport().get("/auth/me", &[]).await {
            Ok(user) => user,
            Err(e) => return self.refuse_or_raise(e),
        };

        self.store().save_user(user.clone());
        self.publish(SessionState::Authenticated(user.clone()));
        tracing::info!(user = %user.email, "session established");
        Ok(AuthOutcome::Accepted(user))
    }

    /// Create an account, then establish a session with it.
    ///
    /// Client-side validation runs first and short-circuits with a
    /// `Rejected` outcome before any request is issued: the confirmation
    /// must match and the password must be at least
    /// [`MIN_PASSWORD_LENGTH`] characters.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failure or a 5xx response.
    pub async fn register(
        &self,
        email: &Email,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<AuthOutcome, ApiError> {
        if password != confirm_password {
            return Ok(AuthOutcome::rejected("Passwords do not match"));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Ok(AuthOutcome::rejected(
                "Password must be at least 6 characters long",
            ));
        }

        self.publish(SessionState::Authenticating);

        let body = RegistrationRequest {
            email: email.as_str(),
            username,
            password,
        };
        // The register endpoint returns the created account without a
        // token; the session is established by the follow-up login.
        match self
            .transport()
            .post::<_, CurrentUser>("/auth/register", &body)
            .await
        {
            Ok(_created) => {}
            Err(e) => return self.refuse_or_raise(e),
        }

        self.login(email, password).await
    }

    /// Tear the session down.
    ///
    /// Synchronous, infallible, idempotent: clears the credential store and
    /// publishes `Anonymous`.
    pub fn logout(&self) {
        self.store().clear();
        self.publish(SessionState::Anonymous);
        tracing::info!("session cleared");
    }

    fn transport(&self) -> &ApiTransport {
        &self.inner.transport
    }

    fn store(&self) -> &CredentialStore {
        self.inner.transport.store()
    }

    fn publish(&self, state: SessionState) {
        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Map an auth-call failure: 4xx refusals become `Rejected` outcomes,
    /// everything else propagates. Always publishes `Anonymous` first so
    /// the UI returns to an interactive state on every exit path.
    fn refuse_or_raise(&self, error: ApiError) -> Result<AuthOutcome, ApiError> {
        self.publish(SessionState::Anonymous);
        match error {
            ApiError::Unauthorized { message } => Ok(AuthOutcome::rejected(message)),
            ApiError::Status {
                status: 400..=499,
                message,
            } => Ok(AuthOutcome::rejected(message)),
            other => Err(other),
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::ClientConfig;
    use crate::router::Navigator;

    /// Session wired to a port nothing listens on: any issued request
    /// fails, so tests that must not touch the network would surface it.
    fn offline_session(dir: &std::path::Path) -> AuthSession {
        let config = ClientConfig {
            api_base_url: url::Url::parse("http://127.0.0.1:9").expect("url"),
            data_dir: dir.to_path_buf(),
        };
        let store = CredentialStore::open(dir);
        let (navigator, _events) = Navigator::channel();
        let transport = ApiTransport::new(&config, store, navigator).expect("transport");
        AuthSession::new(transport)
    }

    #[test]
    fn test_initial_state_is_resolving() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = offline_session(dir.path());
        assert_eq!(session.state(), SessionState::Resolving);
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_resolve_without_token_is_anonymous_offline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = offline_session(dir.path());
        // No token stored: resolution must not need the (dead) backend.
        let state = session.resolve().await.expect("no network required");
        assert_eq!(state, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_register_password_mismatch_issues_no_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = offline_session(dir.path());
        let email = Email::parse("user@example.com").expect("email");

        let outcome = session
            .register(&email, "user", "secret1", "secret2")
            .await
            .expect("short-circuits before the dead backend");
        assert_eq!(outcome, AuthOutcome::rejected("Passwords do not match"));
        assert!(session.transport().store().token().is_none());
    }

    #[tokio::test]
    async fn test_register_short_password_issues_no_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = offline_session(dir.path());
        let email = Email::parse("user@example.com").expect("email");

        let outcome = session
            .register(&email, "user", "five!", "five!")
            .await
            .expect("short-circuits before the dead backend");
        assert_eq!(
            outcome,
            AuthOutcome::rejected("Password must be at least 6 characters long")
        );
    }

    #[test]
    fn test_logout_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = offline_session(dir.path());
        session.logout();
        assert_eq!(session.state(), SessionState::Anonymous);
        session.logout();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.transport().store().load().is_none());
    }

    #[test]
    fn test_token_grant_accepts_both_field_names() {
        let grant: TokenGrant =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "bearer"}"#)
                .expect("oauth2 shape");
        assert_eq!(grant.token, "abc");

        let grant: TokenGrant =
            serde_json::from_str(r#"{"token": "abc123"}"#).expect("legacy shape");
        assert_eq!(grant.token, "abc123");
    }
}
