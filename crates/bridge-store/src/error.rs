//! Store error types.

use std::path::PathBuf;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Permission denied.
    PermissionDenied,
    /// Stored data could not be decoded.
    Corrupted,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "File", "Memory").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                StoreErrorKind::Unavailable
            }
            _ => StoreErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::Corrupted => "Corrupted data",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_display_full_context() {
        let err = StoreError::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            "/var/lib/bridge/auth.json",
        )
        .with_backend("File");

        assert_eq!(err.kind, StoreErrorKind::PermissionDenied);
        assert_eq!(
            err.to_string(),
            "[File] Permission denied: denied (path: /var/lib/bridge/auth.json)"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display_kind_only() {
        let err = StoreError::new(StoreErrorKind::Corrupted);
        assert_eq!(err.to_string(), "Corrupted data");
        assert!(err.source().is_none());
    }
}
