//! Command implementations, one module per screen group.

pub mod auth;
pub mod blog;
pub mod generate;
pub mod history;

use std::io::Write;

use thiserror::Error;

use eqori_client::ApiError;

/// Errors a command can exit with.
///
/// The first four are flow outcomes that have already been explained to the
/// user on the way out; `main` only turns them into a nonzero exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A guarded screen was requested without a session.
    #[error("not signed in")]
    NotSignedIn,
    /// An anonymous-only screen was requested with an active session.
    #[error("already signed in as {0}")]
    AlreadySignedIn(String),
    /// Login or registration was refused (validation or server reason).
    #[error("{0}")]
    Refused(String),
    /// The user declined a confirmation prompt.
    #[error("aborted")]
    Aborted,
    /// The session was still unresolved when a guard ran.
    #[error("the session is still being resolved; try again")]
    SessionUnresolved,
    /// API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Reading interactive input failed.
    #[error("input error: {0}")]
    Io(#[from] std::io::Error),
}

/// Prompt for one line of input on the controlling terminal.
pub fn prompt_line(label: &str) -> Result<String, CommandError> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a secret without echoing it.
pub fn prompt_password(label: &str) -> Result<String, CommandError> {
    Ok(rpassword::prompt_password(label)?)
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> Result<bool, CommandError> {
    let answer = prompt_line(&format!("{question} [y/N] "))?;
    Ok(matches!(answer.as_str(), "y" | "Y" | "yes" | "Yes"))
}
