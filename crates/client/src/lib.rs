//! Eqori API client.
//!
//! Typed access to the Eqori marketing-content backend: authentication
//! session lifecycle, content generation and history management, and the
//! public blog.
//!
//! # Architecture
//!
//! - One [`transport::ApiTransport`] is the single point of outbound
//!   communication. Credential attachment and 401 supervision are explicit
//!   steps of its request pipeline, not hidden hooks.
//! - The [`session::AuthSession`] owns the credential lifecycle; the
//!   [`store::CredentialStore`] persists it; [`guard`] exposes the pure
//!   route-guard predicates a front-end gates its screens with.
//! - On an observed 401 the transport clears the store and publishes a
//!   [`router::Destination::Login`] command; the attached front-end decides
//!   how to honor it.
//!
//! # Example
//!
//! ```rust,ignore
//! use eqori_client::{ClientConfig, EqoriClient};
//! use eqori_core::Email;
//!
//! let config = ClientConfig::from_env()?;
//! let (client, _navigation) = EqoriClient::new(config)?;
//!
//! client.session().resolve().await?;
//! let outcome = client
//!     .session()
//!     .login(&Email::parse("user@example.com")?, "correcthorse")
//!     .await?;
//!
//! let history = client.generation().history(0, 50).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod blog;
pub mod config;
pub mod error;
pub mod generation;
pub mod guard;
pub mod router;
pub mod session;
pub mod store;
pub mod transport;

pub use blog::BlogApi;
pub use config::{ClientConfig, ConfigError, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use generation::GenerationApi;
pub use guard::{GuardOutcome, require_anonymous, require_authenticated};
pub use router::{Destination, NavigationEvents, Navigator};
pub use session::{AuthOutcome, AuthSession, SessionState};
pub use store::{CredentialStore, Credentials, SessionToken};
pub use transport::ApiTransport;

/// Bundled client: one constructor wiring the store, transport, session,
/// and API surfaces together.
///
/// Cheap to clone; all clones share the same session and connection pool.
#[derive(Debug, Clone)]
pub struct EqoriClient {
    session: AuthSession,
    generation: GenerationApi,
    blog: BlogApi,
}

impl EqoriClient {
    /// Wire up a client from configuration.
    ///
    /// Returns the client plus the navigation event stream the front-end
    /// should watch for forced redirects (401 handling).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<(Self, NavigationEvents), ApiError> {
        let store = CredentialStore::open(&config.data_dir);
        let (navigator, events) = Navigator::channel();
        let transport = ApiTransport::new(&config, store, navigator)?;

        Ok((
            Self {
                session: AuthSession::new(transport.clone()),
                generation: GenerationApi::new(transport.clone()),
                blog: BlogApi::new(transport),
            },
            events,
        ))
    }

    /// The auth session manager.
    #[must_use]
    pub const fn session(&self) -> &AuthSession {
        &self.session
    }

    /// The generation API surface.
    #[must_use]
    pub const fn generation(&self) -> &GenerationApi {
        &self.generation
    }

    /// The blog API surface.
    #[must_use]
    pub const fn blog(&self) -> &BlogApi {
        &self.blog
    }
}
