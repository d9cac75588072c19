//! Account commands: login, register, logout, whoami.

use eqori_client::{AuthOutcome, EqoriClient};
use eqori_core::Email;

use crate::commands::{CommandError, prompt_line, prompt_password};
use crate::screen;

/// Sign in to an existing account.
pub async fn login(client: &EqoriClient, email_arg: Option<&str>) -> Result<(), CommandError> {
    let state = screen::resolve_session(client).await;
    screen::gate_anonymous(&state)?;

    let email = read_email(email_arg)?;
    let password = prompt_password("Password: ")?;

    match client.session().login(&email, &password).await? {
        AuthOutcome::Accepted(user) => {
            println!("Signed in as {}.", user.email);
            Ok(())
        }
        AuthOutcome::Rejected { reason } => refuse(reason),
    }
}

/// Create an account, then sign in with it.
pub async fn register(
    client: &EqoriClient,
    email_arg: Option<&str>,
    username_arg: Option<&str>,
) -> Result<(), CommandError> {
    let state = screen::resolve_session(client).await;
    screen::gate_anonymous(&state)?;

    let email = read_email(email_arg)?;
    let username = match username_arg {
        Some(username) => username.to_string(),
        None => prompt_line("Username: ")?,
    };
    let password = prompt_password("Password: ")?;
    let confirm_password = prompt_password("Confirm password: ")?;

    match client
        .session()
        .register(&email, &username, &password, &confirm_password)
        .await?
    {
        AuthOutcome::Accepted(user) => {
            println!("Account created. Signed in as {}.", user.email);
            Ok(())
        }
        AuthOutcome::Rejected { reason } => refuse(reason),
    }
}

/// Sign out. Always succeeds, even without a session.
pub fn logout(client: &EqoriClient) -> Result<(), CommandError> {
    client.session().logout();
    println!("Signed out.");
    Ok(())
}

/// Show the signed-in account.
pub async fn whoami(client: &EqoriClient) -> Result<(), CommandError> {
    let state = screen::resolve_session(client).await;
    screen::gate_authenticated(&state)?;

    if let Some(user) = state.user() {
        println!("{}", user.email);
        println!("account #{}, since {}", user.id, user.created_at.format("%Y-%m-%d"));
    }
    Ok(())
}

fn read_email(email_arg: Option<&str>) -> Result<Email, CommandError> {
    let raw = match email_arg {
        Some(email) => email.to_string(),
        None => prompt_line("Email: ")?,
    };
    // Inline validation failure: no request is issued for a malformed email.
    Email::parse(&raw).map_err(|e| {
        eprintln!("{e}");
        CommandError::Refused(e.to_string())
    })
}

fn refuse(reason: String) -> Result<(), CommandError> {
    eprintln!("{reason}");
    Err(CommandError::Refused(reason))
}
