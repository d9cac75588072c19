//! Session lifecycle: login, registration, logout, startup resolution.

use eqori_client::{AuthOutcome, CredentialStore, SessionState};
use eqori_core::Email;
use eqori_integration_tests::MockBackend;

fn email(raw: &str) -> Email {
    Email::parse(raw).expect("valid email")
}

#[tokio::test]
async fn login_persists_token_and_caches_user() {
    let backend = MockBackend::start().await;
    let account_id = backend.seed_user("user@example.com", "correctpass");
    backend.script_next_token("abc123");

    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let outcome = client
        .session()
        .login(&email("user@example.com"), "correctpass")
        .await
        .expect("login call");

    let user = match outcome {
        AuthOutcome::Accepted(user) => user,
        AuthOutcome::Rejected { reason } => panic!("login rejected: {reason}"),
    };
    assert_eq!(user.email.as_str(), "user@example.com");
    assert_eq!(user.id.as_i64(), account_id);

    // Session state is authenticated and the profile is cached.
    assert!(matches!(
        client.session().state(),
        SessionState::Authenticated(_)
    ));
    assert_eq!(
        client
            .session()
            .current_user()
            .expect("cached user")
            .email
            .as_str(),
        "user@example.com"
    );

    // The credential store holds exactly the issued token.
    let store = CredentialStore::open(dir.path());
    assert_eq!(store.token().expect("stored token").reveal(), "abc123");
}

#[tokio::test]
async fn wrong_credentials_never_leave_anonymous() {
    let backend = MockBackend::start().await;
    backend.seed_user("user@example.com", "correctpass");

    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    // Any sequence of failed attempts: state stays anonymous, nothing is
    // persisted.
    for wrong in ["wrongpass", "", "correctpass2", "CORRECTPASS"] {
        let outcome = client
            .session()
            .login(&email("user@example.com"), wrong)
            .await
            .expect("refusal is an outcome, not an error");
        assert_eq!(
            outcome,
            AuthOutcome::Rejected {
                reason: "Incorrect email or password".to_string()
            }
        );
        assert_eq!(client.session().state(), SessionState::Anonymous);
        assert!(client.session().current_user().is_none());
        assert!(CredentialStore::open(dir.path()).token().is_none());
    }
}

#[tokio::test]
async fn register_password_mismatch_issues_no_request() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let outcome = client
        .session()
        .register(&email("new@example.com"), "new", "secret1", "secret2")
        .await
        .expect("validation is local");

    assert_eq!(
        outcome,
        AuthOutcome::Rejected {
            reason: "Passwords do not match".to_string()
        }
    );
    assert_eq!(backend.total_hits(), 0, "no request may be issued");
    assert_eq!(client.session().state(), SessionState::Anonymous);
}

#[tokio::test]
async fn register_short_password_issues_no_request() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let outcome = client
        .session()
        .register(&email("new@example.com"), "new", "five!", "five!")
        .await
        .expect("validation is local");

    assert_eq!(
        outcome,
        AuthOutcome::Rejected {
            reason: "Password must be at least 6 characters long".to_string()
        }
    );
    assert_eq!(backend.total_hits(), 0, "no request may be issued");
}

#[tokio::test]
async fn register_establishes_a_session() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let outcome = client
        .session()
        .register(&email("new@example.com"), "new", "longenough", "longenough")
        .await
        .expect("register call");

    assert!(matches!(outcome, AuthOutcome::Accepted(_)));
    assert_eq!(backend.hits("POST", "/api/auth/register"), 1);
    assert_eq!(backend.hits("POST", "/api/auth/login"), 1);
    assert!(CredentialStore::open(dir.path()).token().is_some());
}

#[tokio::test]
async fn register_duplicate_email_is_refused_with_server_reason() {
    let backend = MockBackend::start().await;
    backend.seed_user("taken@example.com", "whatever1");

    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let outcome = client
        .session()
        .register(&email("taken@example.com"), "taken", "longenough", "longenough")
        .await
        .expect("refusal is an outcome");

    assert_eq!(
        outcome,
        AuthOutcome::Rejected {
            reason: "Email already registered".to_string()
        }
    );
    assert_eq!(client.session().state(), SessionState::Anonymous);
}

#[tokio::test]
async fn logout_is_idempotent() {
    let backend = MockBackend::start().await;
    backend.seed_user("user@example.com", "correctpass");

    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());
    client
        .session()
        .login(&email("user@example.com"), "correctpass")
        .await
        .expect("login");

    client.session().logout();
    assert_eq!(client.session().state(), SessionState::Anonymous);
    assert!(CredentialStore::open(dir.path()).token().is_none());

    // Second logout: still anonymous, still empty, no error.
    client.session().logout();
    assert_eq!(client.session().state(), SessionState::Anonymous);
    assert!(CredentialStore::open(dir.path()).token().is_none());
}

#[tokio::test]
async fn startup_resolution_restores_a_valid_session() {
    let backend = MockBackend::start().await;
    backend.seed_user("user@example.com", "correctpass");

    let dir = tempfile::tempdir().expect("tempdir");
    {
        let (client, _navigation) = backend.client(dir.path());
        client
            .session()
            .login(&email("user@example.com"), "correctpass")
            .await
            .expect("login");
    }

    // A fresh process: token on disk, no in-memory session.
    let (client, _navigation) = backend.client(dir.path());
    assert_eq!(client.session().state(), SessionState::Resolving);

    let state = client.session().resolve().await.expect("resolve");
    match state {
        SessionState::Authenticated(user) => {
            assert_eq!(user.email.as_str(), "user@example.com");
        }
        other => panic!("expected authenticated session, got {other:?}"),
    }
}

#[tokio::test]
async fn startup_resolution_with_revoked_token_is_anonymous() {
    let backend = MockBackend::start().await;
    backend.seed_user("user@example.com", "correctpass");

    let dir = tempfile::tempdir().expect("tempdir");
    {
        let (client, _navigation) = backend.client(dir.path());
        client
            .session()
            .login(&email("user@example.com"), "correctpass")
            .await
            .expect("login");
    }
    backend.revoke_all_tokens();

    let (client, _navigation) = backend.client(dir.path());
    let state = client.session().resolve().await.expect("resolve");
    assert_eq!(state, SessionState::Anonymous);
    // The 401 path cleared the stale token.
    assert!(CredentialStore::open(dir.path()).token().is_none());
}
