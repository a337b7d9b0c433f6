//! JSON file store implementation.
//!
//! [`FileAuthorizationStore`] keeps every record in a single JSON document:
//!
//! ```text
//! {
//!   "records": [
//!     {"integrationType": "jira", "configurationId": "42",
//!      "url": "https://jira.example.com", "userId": 7,
//!      "data": {"temporaryToken": "..."}}
//!   ]
//! }
//! ```
//!
//! The file is read on every call and replaced atomically on save (write to a
//! temporary file in the same directory, then rename). A missing file is an
//! empty store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::record::RecordKey;
use crate::{AuthorizationStore, SearchFilter, StoreError, StoreErrorKind, UserAuthorizationData};

/// Backend identifier for error messages.
const BACKEND: &str = "File";

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    integration_type: String,
    configuration_id: String,
    #[serde(flatten)]
    record: UserAuthorizationData,
}

impl StoredRecord {
    fn key(&self) -> RecordKey {
        RecordKey::new(&self.integration_type, &self.configuration_id, &self.record)
    }
}

/// File-backed [`AuthorizationStore`].
///
/// Writes within one process are serialized; concurrent processes sharing the
/// file follow last-write-wins.
#[derive(Debug)]
pub struct FileAuthorizationStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuthorizationStore {
    /// Create a store backed by the JSON file at `path`.
    ///
    /// The file and its parent directory are created on first save.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreDocument, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("authorization store {} not found, starting empty", self.path.display());
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(StoreError::io(e, &self.path).with_backend(BACKEND)),
        };

        serde_json::from_str(&content).map_err(|e| {
            StoreError::new(StoreErrorKind::Corrupted)
                .with_backend(BACKEND)
                .with_path(&self.path)
                .with_source(e)
        })
    }

    fn persist(&self, document: &StoreDocument) -> Result<(), StoreError> {
        let io_err = |e: std::io::Error| StoreError::io(e, &self.path).with_backend(BACKEND);

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(document).map_err(|e| {
            StoreError::new(StoreErrorKind::Other)
                .with_backend(BACKEND)
                .with_source(e)
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl AuthorizationStore for FileAuthorizationStore {
    fn find(
        &self,
        integration_type: &str,
        configuration_id: &str,
        url: &str,
        user_id: i64,
    ) -> Result<Option<UserAuthorizationData>, StoreError> {
        let document = self.load()?;
        Ok(document
            .records
            .into_iter()
            .find(|stored| {
                stored
                    .key()
                    .identifies(integration_type, configuration_id, url, user_id)
            })
            .map(|stored| stored.record))
    }

    fn search(
        &self,
        integration_type: &str,
        configuration_id: &str,
        filter: &SearchFilter,
    ) -> Result<Vec<UserAuthorizationData>, StoreError> {
        let document = self.load()?;
        Ok(document
            .records
            .into_iter()
            .filter(|stored| {
                stored.key().in_instance(integration_type, configuration_id)
                    && stored.record.matches(filter)
            })
            .map(|stored| stored.record)
            .collect())
    }

    fn save(
        &self,
        integration_type: &str,
        configuration_id: &str,
        record: &UserAuthorizationData,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();

        let mut document = self.load()?;
        let key = RecordKey::new(integration_type, configuration_id, record);
        let stored = StoredRecord {
            integration_type: integration_type.to_owned(),
            configuration_id: configuration_id.to_owned(),
            record: record.clone(),
        };

        match document.records.iter_mut().find(|s| s.key() == key) {
            Some(existing) => *existing = stored,
            None => document.records.push(stored),
        }

        self.persist(&document)?;
        tracing::debug!(
            "saved authorization record for user {} at {} ({integration_type}/{configuration_id})",
            record.user_id,
            record.url
        );
        Ok(())
    }
}
