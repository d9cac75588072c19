//! Account types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::UserId;

/// The authenticated account, as reported by the backend's `/auth/me`
/// endpoint.
///
/// This is a cache of server truth: it is populated after a successful
/// login (or at startup when a stored token validates) and cleared on
/// logout or an observed authorization failure. It is never locally
/// authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Unique account ID.
    pub id: UserId,
    /// Account email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_backend_shape() {
        let user: CurrentUser = serde_json::from_str(
            r#"{"id": 1, "email": "user@example.com", "created_at": "2026-01-05T12:00:00Z"}"#,
        )
        .expect("deserialize");
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.email.as_str(), "user@example.com");
    }
}
