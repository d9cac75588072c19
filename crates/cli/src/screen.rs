//! Session resolution, screen gating, and record rendering.
//!
//! The guard predicates live in `eqori-client`; this module maps their
//! outcomes onto the terminal: a redirect becomes a message telling the
//! user where to go, and the resolving window becomes a status line instead
//! of prematurely rendering either branch.

use eqori_client::{
    EqoriClient, GuardOutcome, SessionState, require_anonymous, require_authenticated,
};
use eqori_core::{BlogPost, BlogPostSummary, GenerationRecord};

use crate::commands::CommandError;

/// Resolve the stored session before rendering a gated screen.
///
/// While a stored token is being validated the user sees a neutral status
/// line - neither the anonymous nor the authenticated branch renders until
/// the state is known. Failure to reach the backend resolves to an
/// anonymous state for this run and is reported as a warning, not a crash.
pub async fn resolve_session(client: &EqoriClient) -> SessionState {
    if client.session().state() == SessionState::Resolving {
        eprintln!("Checking session...");
    }
    match client.session().resolve().await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "could not validate stored session");
            client.session().state()
        }
    }
}

/// Gate a screen that requires a signed-in account.
///
/// # Errors
///
/// Returns [`CommandError::NotSignedIn`] after pointing the user at
/// `eqori login` (the terminal's redirect).
pub fn gate_authenticated(state: &SessionState) -> Result<(), CommandError> {
    match require_authenticated(state) {
        GuardOutcome::Render => Ok(()),
        GuardOutcome::Wait => Err(CommandError::SessionUnresolved),
        GuardOutcome::RedirectToLogin | GuardOutcome::RedirectToDashboard => {
            eprintln!("You are not signed in. Run `eqori login` first.");
            Err(CommandError::NotSignedIn)
        }
    }
}

/// Gate a screen that only makes sense without a session.
///
/// # Errors
///
/// Returns [`CommandError::AlreadySignedIn`] after pointing the user at
/// `eqori logout` (the terminal's redirect to the dashboard).
pub fn gate_anonymous(state: &SessionState) -> Result<(), CommandError> {
    match require_anonymous(state) {
        GuardOutcome::Render => Ok(()),
        GuardOutcome::Wait => Err(CommandError::SessionUnresolved),
        GuardOutcome::RedirectToLogin | GuardOutcome::RedirectToDashboard => {
            let email = state
                .user()
                .map_or_else(|| "this account".to_string(), |u| u.email.to_string());
            eprintln!("Already signed in as {email}. Run `eqori logout` to switch accounts.");
            Err(CommandError::AlreadySignedIn(email))
        }
    }
}

/// Render a generation record in full.
pub fn print_record(record: &GenerationRecord) {
    let star = if record.is_favorite { "*" } else { " " };
    println!(
        "[{star}] #{}  {}  ({})",
        record.id,
        record.brief.product_name,
        record.created_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(category) = &record.brief.category {
        println!("    category: {category}");
    }

    println!("\nProduct description\n-------------------\n{}", record.copy.description);

    println!("\nSocial ads\n----------");
    for (i, ad) in record.copy.ad_copy.iter().enumerate() {
        println!("Ad {}: {ad}\n", i + 1);
    }

    println!("Email blurb\n-----------\n{}", record.copy.email_blurb);
}

/// Render one line of a history listing.
pub fn print_record_row(record: &GenerationRecord) {
    let star = if record.is_favorite { "*" } else { " " };
    println!(
        "[{star}] #{:<5} {:<32} {}",
        record.id,
        record.brief.product_name,
        record.created_at.format("%Y-%m-%d %H:%M")
    );
}

/// Render one line of a blog listing.
pub fn print_post_row(post: &BlogPostSummary) {
    let category = post.category.as_deref().unwrap_or("-");
    println!("{:<40} [{category}] {}", post.slug, post.title);
    if let Some(excerpt) = &post.excerpt {
        println!("    {excerpt}");
    }
}

/// Render a full blog post.
pub fn print_post(post: &BlogPost) {
    println!("{}\n{}\n", post.title, "=".repeat(post.title.len()));
    if let Some(published_at) = post.published_at {
        let category = post.category.as_deref().unwrap_or("uncategorized");
        println!("{} | {category} | {} views\n", published_at.format("%Y-%m-%d"), post.view_count);
    }
    println!("{}", post.content);
    if let Some(tags) = &post.tags {
        println!("\ntags: {tags}");
    }
}
