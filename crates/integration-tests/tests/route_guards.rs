//! Route guards over resolved session state.

use eqori_client::{GuardOutcome, SessionState, require_anonymous, require_authenticated};
use eqori_core::Email;
use eqori_integration_tests::MockBackend;

fn email(raw: &str) -> Email {
    Email::parse(raw).expect("valid email")
}

#[tokio::test]
async fn unresolved_session_holds_both_guards() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    // Before resolution neither guard may redirect: a neutral loading view
    // renders here to avoid a flash of the wrong screen.
    let state = client.session().state();
    assert_eq!(state, SessionState::Resolving);
    assert_eq!(require_authenticated(&state), GuardOutcome::Wait);
    assert_eq!(require_anonymous(&state), GuardOutcome::Wait);
}

#[tokio::test]
async fn without_a_token_protected_screens_redirect_to_login() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let (client, _navigation) = backend.client(dir.path());

    let state = client.session().resolve().await.expect("resolve");
    assert_eq!(require_authenticated(&state), GuardOutcome::RedirectToLogin);
    assert_eq!(require_anonymous(&state), GuardOutcome::Render);
}

#[tokio::test]
async fn with_a_valid_token_anonymous_screens_redirect_to_dashboard() {
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

    // Fresh process with the persisted token.
    let (client, _navigation) = backend.client(dir.path());
    let state = client.session().resolve().await.expect("resolve");

    assert_eq!(require_authenticated(&state), GuardOutcome::Render);
    assert_eq!(
        require_anonymous(&state),
        GuardOutcome::RedirectToDashboard
    );
}

#[tokio::test]
async fn guards_flip_after_logout() {
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
    let state = client.session().state();
    assert_eq!(require_authenticated(&state), GuardOutcome::RedirectToLogin);
    assert_eq!(require_anonymous(&state), GuardOutcome::Render);
}
