//! User authorization record storage.
//!
//! This crate provides an [`AuthorizationStore`] trait for persisting per-user
//! OAuth state, keyed by integration type, configuration instance, tracker URL
//! and user. The core only relies on the query/write contract; backends decide
//! how records are kept.
//!
//! # Implementations
//!
//! - [`MemoryAuthorizationStore`]: in-process map, used by tests and embedders
//! - [`FileAuthorizationStore`]: single JSON file, used by the CLI
//!
//! # Example
//!
//! ```
//! use bridge_store::{AuthorizationStore, MemoryAuthorizationStore, SearchFilter, UserAuthorizationData};
//! use serde_json::json;
//!
//! let store = MemoryAuthorizationStore::new();
//! let record = UserAuthorizationData::new("https://jira.example.com", 7, json!({"temporaryToken": "t1"}));
//! store.save("jira", "42", &record).unwrap();
//!
//! let filter = SearchFilter::from([("temporaryToken".to_owned(), "t1".to_owned())]);
//! assert_eq!(store.search("jira", "42", &filter).unwrap().len(), 1);
//! ```

mod error;
mod file;
mod memory;
mod record;

pub use error::{StoreError, StoreErrorKind};
pub use file::FileAuthorizationStore;
pub use memory::MemoryAuthorizationStore;
pub use record::{SearchFilter, UserAuthorizationData};

/// Persistence contract for user authorization records.
///
/// Records are unique per `(integration_type, configuration_id, url, user_id)`;
/// saving a record with an existing identity replaces it (last write wins).
pub trait AuthorizationStore: Send + Sync {
    /// Find the record for an exact identity.
    ///
    /// Returns `Ok(None)` if no record exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn find(
        &self,
        integration_type: &str,
        configuration_id: &str,
        url: &str,
        user_id: i64,
    ) -> Result<Option<UserAuthorizationData>, StoreError>;

    /// Return all records of a configuration instance whose payload matches
    /// every entry of `filter`.
    ///
    /// Results are returned in the backend's natural order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn search(
        &self,
        integration_type: &str,
        configuration_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<UserAuthorizationData>, StoreError>;

    /// Insert or replace a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be written.
    fn save(
        &self,
        integration_type: &str,
        configuration_id: &str,
        record: &UserAuthorizationData,
    ) -> Result<(), StoreError>;
}
