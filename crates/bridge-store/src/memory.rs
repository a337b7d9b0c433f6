//! In-memory store implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::record::RecordKey;
use crate::{AuthorizationStore, SearchFilter, StoreError, UserAuthorizationData};

/// In-memory [`AuthorizationStore`].
///
/// Records are ordered by identity, so `search` results are deterministic.
/// Counts writes to let callers assert that an operation did not persist
/// anything.
#[derive(Debug, Default)]
pub struct MemoryAuthorizationStore {
    records: RwLock<BTreeMap<RecordKey, UserAuthorizationData>>,
    writes: AtomicUsize,
}

impl MemoryAuthorizationStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `save` calls performed so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl AuthorizationStore for MemoryAuthorizationStore {
    fn find(
        &self,
        integration_type: &str,
        configuration_id: &str,
        url: &str,
        user_id: i64,
    ) -> Result<Option<UserAuthorizationData>, StoreError> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .find(|(key, _)| key.identifies(integration_type, configuration_id, url, user_id))
            .map(|(_, record)| record.clone()))
    }

    fn search(
        &self,
        integration_type: &str,
        configuration_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<UserAuthorizationData>, StoreError> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .filter(|(key, record)| {
                key.in_instance(integration_type, configuration_id) && record.matches(filter)
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn save(
        &self,
        integration_type: &str,
        configuration_id: &str,
        record: &UserAuthorizationData,
    ) -> Result<(), StoreError> {
        let key = RecordKey::new(integration_type, configuration_id, record);
        self.records.write().unwrap().insert(key, record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const URL: &str = "https://jira.example.com";

    fn pending(token: &str) -> serde_json::Value {
        json!({"temporaryToken": token})
    }

    #[test]
    fn test_find_missing() {
        let store = MemoryAuthorizationStore::new();
        assert!(store.find("jira", "42", URL, 1).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_then_find() {
        let store = MemoryAuthorizationStore::new();
        let record = UserAuthorizationData::new(URL, 1, pending("t1"));

        store.save("jira", "42", &record).unwrap();

        assert_eq!(store.find("jira", "42", URL, 1).unwrap(), Some(record));
        assert!(store.find("jira", "43", URL, 1).unwrap().is_none());
        assert!(store.find("jira", "42", URL, 2).unwrap().is_none());
        assert!(store.find("github", "42", URL, 1).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites_same_identity() {
        let store = MemoryAuthorizationStore::new();

        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 1, pending("t1")))
            .unwrap();
        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 1, pending("t2")))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.write_count(), 2);
        let record = store.find("jira", "42", URL, 1).unwrap().unwrap();
        assert_eq!(record.data, Some(pending("t2")));
    }

    #[test]
    fn test_search_by_payload_field() {
        let store = MemoryAuthorizationStore::new();
        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 1, pending("t1")))
            .unwrap();
        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 2, pending("t2")))
            .unwrap();
        store
            .save("jira", "99", &UserAuthorizationData::new(URL, 3, pending("t1")))
            .unwrap();

        let filter = SearchFilter::from([("temporaryToken".to_owned(), "t1".to_owned())]);
        let found = store.search("jira", "42", &filter).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, 1);
    }

    #[test]
    fn test_search_empty_filter_returns_instance_records_in_order() {
        let store = MemoryAuthorizationStore::new();
        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 2, pending("b")))
            .unwrap();
        store
            .save("jira", "42", &UserAuthorizationData::new(URL, 1, pending("a")))
            .unwrap();

        let found = store.search("jira", "42", &SearchFilter::new()).unwrap();
        let users: Vec<i64> = found.iter().map(|r| r.user_id).collect();

        assert_eq!(users, vec![1, 2]);
    }
}
