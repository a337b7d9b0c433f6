//! Persisted authorization record types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload field filter for [`AuthorizationStore::search`](crate::AuthorizationStore::search).
///
/// Each entry requires the payload's top-level field of that name to be a
/// string equal to the value.
pub type SearchFilter = BTreeMap<String, String>;

/// Authorization record of one user against one tracker URL.
///
/// The payload is opaque to the store; the authorization manager decides its
/// shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthorizationData {
    /// Tracker base URL.
    pub url: String,
    /// Messaging platform user ID.
    pub user_id: i64,
    /// Serialized authorization state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl UserAuthorizationData {
    /// Create a record with a payload.
    #[must_use]
    pub fn new(url: impl Into<String>, user_id: i64, data: Value) -> Self {
        Self {
            url: url.into(),
            user_id,
            data: Some(data),
        }
    }

    /// Whether the payload matches every entry of `filter`.
    ///
    /// An empty filter matches every record; a record without payload only
    /// matches an empty filter.
    #[must_use]
    pub fn matches(&self, filter: &SearchFilter) -> bool {
        filter.iter().all(|(field, expected)| {
            self.data
                .as_ref()
                .and_then(|data| data.get(field))
                .and_then(Value::as_str)
                .is_some_and(|actual| actual == expected)
        })
    }
}

/// Unique identity of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct RecordKey {
    pub integration_type: String,
    pub configuration_id: String,
    pub url: String,
    pub user_id: i64,
}

impl RecordKey {
    pub(crate) fn new(
        integration_type: &str,
        configuration_id: &str,
        record: &UserAuthorizationData,
    ) -> Self {
        Self {
            integration_type: integration_type.to_owned(),
            configuration_id: configuration_id.to_owned(),
            url: record.url.clone(),
            user_id: record.user_id,
        }
    }

    /// Whether the key belongs to the given configuration instance.
    pub(crate) fn in_instance(&self, integration_type: &str, configuration_id: &str) -> bool {
        self.integration_type == integration_type && self.configuration_id == configuration_id
    }

    /// Whether the key identifies the given record.
    pub(crate) fn identifies(
        &self,
        integration_type: &str,
        configuration_id: &str,
        url: &str,
        user_id: i64,
    ) -> bool {
        self.in_instance(integration_type, configuration_id)
            && self.url == url
            && self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn filter(field: &str, value: &str) -> SearchFilter {
        SearchFilter::from([(field.to_owned(), value.to_owned())])
    }

    #[test]
    fn test_matches_string_field() {
        let record = UserAuthorizationData::new("https://jira.example.com", 1, json!({"temporaryToken": "abc"}));

        assert!(record.matches(&filter("temporaryToken", "abc")));
        assert!(!record.matches(&filter("temporaryToken", "xyz")));
        assert!(!record.matches(&filter("accessToken", "abc")));
    }

    #[test]
    fn test_matches_ignores_non_string_fields() {
        let record = UserAuthorizationData::new("https://jira.example.com", 1, json!({"count": 1}));
        assert!(!record.matches(&filter("count", "1")));
    }

    #[test]
    fn test_record_without_payload_matches_only_empty_filter() {
        let record = UserAuthorizationData {
            url: "https://jira.example.com".to_owned(),
            user_id: 1,
            data: None,
        };

        assert!(record.matches(&SearchFilter::new()));
        assert!(!record.matches(&filter("temporaryToken", "abc")));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = UserAuthorizationData::new("https://jira.example.com", 9, json!({"temporaryToken": "t"}));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"url": "https://jira.example.com", "userId": 9, "data": {"temporaryToken": "t"}})
        );
    }
}
