//! Route guards.
//!
//! Two complementary predicates over the published session state, plus an
//! explicit holding outcome for the window where the session is still being
//! resolved: a neutral loading view renders there, precisely to avoid a
//! flash of the wrong screen before redirecting.
//!
//! The predicates are pure: they decide, the front-end acts.

use crate::session::SessionState;

/// Decision produced by a route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session state not yet resolved: render a neutral loading indicator,
    /// redirect nowhere.
    Wait,
    /// The gated screen may render.
    Render,
    /// Send the user to the login screen.
    RedirectToLogin,
    /// Send the user to the authenticated landing screen.
    RedirectToDashboard,
}

/// Gate a screen that requires an authenticated session.
#[must_use]
pub const fn require_authenticated(state: &SessionState) -> GuardOutcome {
    match state {
        SessionState::Resolving | SessionState::Authenticating => GuardOutcome::Wait,
        SessionState::Authenticated(_) => GuardOutcome::Render,
        SessionState::Anonymous => GuardOutcome::RedirectToLogin,
    }
}

/// Gate a screen that only makes sense without a session (login, register).
#[must_use]
pub const fn require_anonymous(state: &SessionState) -> GuardOutcome {
    match state {
        SessionState::Resolving | SessionState::Authenticating => GuardOutcome::Wait,
        SessionState::Anonymous => GuardOutcome::Render,
        SessionState::Authenticated(_) => GuardOutcome::RedirectToDashboard,
    }
}
