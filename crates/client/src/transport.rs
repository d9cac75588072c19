//! HTTP transport: the single point of outbound communication.
//!
//! Credential attachment and expiry supervision are not hidden hooks on a
//! shared client; they are explicit steps of one request pipeline, composed
//! in one auditable place:
//!
//! ```text
//! execute = attach_bearer, then dispatch, then supervise, then decode
//! ```
//!
//! - `attach_bearer` runs synchronously before dispatch: no request leaves
//!   without the credential check.
//! - `supervise` owns the 401 contract: clear the credential store, publish
//!   a login navigation, and surface `ApiError::Unauthorized` to the
//!   caller. Every other status passes through unchanged - no retry, no
//!   backoff, no deduplication of concurrent 401s (the trigger is
//!   idempotent).

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::router::{Destination, Navigator};
use crate::store::CredentialStore;

/// Configured HTTP client for the Eqori backend.
///
/// Cheap to clone; all clones share one connection pool, one credential
/// store handle, and one navigator.
#[derive(Clone)]
pub struct ApiTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    http: reqwest::Client,
    base_url: Url,
    store: CredentialStore,
    navigator: Navigator,
}

impl ApiTransport {
    /// Build the transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(
        config: &ClientConfig,
        store: CredentialStore,
        navigator: Navigator,
    ) -> Result<Self, ApiError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(TransportInner {
                http,
                base_url: config.api_base_url.clone(),
                store,
                navigator,
            }),
        })
    }

    /// The credential store this transport reads from.
    #[must_use]
    pub fn store(&self) -> &CredentialStore {
        &self.inner.store
    }

    /// GET `path` with optional query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.http.get(url).query(query);
        self.execute(builder).await
    }

    /// POST a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let builder = self.inner.http.post(url).json(body);
        self.execute(builder).await
    }

    /// POST a form-encoded body to `path`.
    ///
    /// The login endpoint speaks `application/x-www-form-urlencoded`
    /// (OAuth2 password form), unlike the rest of the API.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.http.post(url).form(form);
        self.execute(builder).await
    }

    /// PUT a JSON body to `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let builder = self.inner.http.put(url).json(body);
        self.execute(builder).await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// See [`ApiError`] for the failure classes.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.http.delete(url);
        self.execute(builder).await
    }

    /// Resolve an API path against the configured base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        if !path.starts_with('/') {
            return Err(ApiError::InvalidPath(path.to_string()));
        }
        // A host-only base normalizes to a trailing slash; strip it so the
        // joined path never doubles up.
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let joined = format!("{base}{path}");
        Url::parse(&joined).map_err(|_| ApiError::InvalidPath(path.to_string()))
    }

    /// Run the full request pipeline.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let builder = self.attach_bearer(builder);
        let response = builder.send().await?;
        let response = self.supervise(response).await?;
        Self::decode(response).await
    }

    /// Attach `Authorization: Bearer <token>` when a session is stored.
    ///
    /// Synchronous by design: the credential check happens on the caller's
    /// path to dispatch, so no request can leave without it. An absent
    /// token sends the request unauthenticated.
    fn attach_bearer(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.inner.store.token() {
            Some(token) => builder.bearer_auth(token.reveal()),
            None => builder,
        }
    }

    /// Inspect an inbound response for the authorization-expiry contract.
    ///
    /// 401: clear the store, publish a login navigation, and re-raise.
    /// Other non-success statuses become [`ApiError::Status`] with the
    /// server's `detail` text. Success passes through.
    async fn supervise(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            let message = error_detail(status, &body);
            tracing::debug!("401 observed; clearing session and redirecting to login");
            self.inner.store.clear();
            self.inner.navigator.navigate(Destination::Login);
            return Err(ApiError::Unauthorized { message });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_detail(status, &body),
            });
        }

        Ok(response)
    }

    /// Decode a successful response body.
    ///
    /// The body is read as text first so a decode failure can carry the
    /// offending payload's shape in the error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl std::fmt::Debug for ApiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiTransport")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Extract a human-readable reason from an error response body.
///
/// The backend wraps reasons as `{"detail": "..."}`; validation failures
/// carry a structured `detail` array. Anything else falls back to the raw
/// body, then to the canonical status phrase.
fn error_detail(status: StatusCode, body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            serde_json::Value::String(s) => return s,
            serde_json::Value::Null => {}
            other => return other.to_string(),
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_with_base(base: &str) -> ApiTransport {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ClientConfig {
            api_base_url: Url::parse(base).expect("base url"),
            data_dir: dir.path().to_path_buf(),
        };
        let store = CredentialStore::open(dir.path());
        let (navigator, _events) = Navigator::channel();
        ApiTransport::new(&config, store, navigator).expect("transport")
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let transport = transport_with_base("http://localhost:8000/api");
        let url = transport.endpoint("/auth/login").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:8000/api/auth/login");
    }

    #[test]
    fn test_endpoint_host_only_base_does_not_double_slash() {
        let transport = transport_with_base("http://localhost:8000");
        let url = transport.endpoint("/auth/login").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:8000/auth/login");
    }

    #[test]
    fn test_endpoint_rejects_relative_path() {
        let transport = transport_with_base("http://localhost:8000/api");
        assert!(matches!(
            transport.endpoint("auth/login"),
            Err(ApiError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_error_detail_from_backend_shape() {
        let message = error_detail(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Email already registered"}"#,
        );
        assert_eq!(message, "Email already registered");
    }

    #[test]
    fn test_error_detail_structured_validation() {
        let message = error_detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "email"], "msg": "field required"}]}"#,
        );
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_error_detail_falls_back_to_body_then_status() {
        assert_eq!(
            error_detail(StatusCode::BAD_GATEWAY, "upstream exploded"),
            "upstream exploded"
        );
        assert_eq!(
            error_detail(StatusCode::BAD_GATEWAY, "  "),
            "Bad Gateway"
        );
    }
}
