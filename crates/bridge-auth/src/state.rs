//! Per-user OAuth 1.0 authorization state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authorization progress of one user against one tracker.
///
/// Stored as the record payload:
///
/// ```json
/// {"temporaryToken": "...", "accessToken": "..."}
/// ```
///
/// `accessToken` is absent while the user has not granted consent yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth1AuthorizationState {
    temporary_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
}

impl OAuth1AuthorizationState {
    /// State right after the temporary token was issued.
    #[must_use]
    pub fn pending(temporary_token: impl Into<String>) -> Self {
        Self {
            temporary_token: temporary_token.into(),
            access_token: None,
        }
    }

    /// Attach the access token obtained for this temporary token.
    #[must_use]
    pub fn authorized(self, access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..self
        }
    }

    #[must_use]
    pub fn temporary_token(&self) -> &str {
        &self.temporary_token
    }

    /// Access token, if the exchange completed. Empty tokens count as absent.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    pub(crate) fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub(crate) fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_pending_omits_access_token() {
        let state = OAuth1AuthorizationState::pending("tmp");

        assert_eq!(state.to_value().unwrap(), json!({"temporaryToken": "tmp"}));
        assert_eq!(state.access_token(), None);
    }

    #[test]
    fn test_authorized_keeps_temporary_token() {
        let state = OAuth1AuthorizationState::pending("tmp").authorized("acc");

        assert_eq!(state.temporary_token(), "tmp");
        assert_eq!(state.access_token(), Some("acc"));
        assert_eq!(
            state.to_value().unwrap(),
            json!({"temporaryToken": "tmp", "accessToken": "acc"})
        );
    }

    #[test]
    fn test_from_value_accepts_null_and_empty_access_token() {
        let null = OAuth1AuthorizationState::from_value(
            json!({"temporaryToken": "tmp", "accessToken": null}),
        )
        .unwrap();
        assert_eq!(null.access_token(), None);

        let empty = OAuth1AuthorizationState::from_value(
            json!({"temporaryToken": "tmp", "accessToken": ""}),
        )
        .unwrap();
        assert_eq!(empty.access_token(), None);
    }

    #[test]
    fn test_from_value_rejects_missing_temporary_token() {
        assert!(OAuth1AuthorizationState::from_value(json!({"accessToken": "acc"})).is_err());
    }
}
