use thiserror::Error;

/// Errors raised by the catalog engine.
///
/// Each failure path of the catalog maps to exactly one variant so callers
/// can tell a name collision from a missing author or a dead store.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Missing author: {0}")]
    MissingAuthor(String),

    #[error("Artifact exists: {0}")]
    ArtifactAlreadyExists(String),

    #[error("User exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid artifact definition: {0}")]
    InvalidDefinition(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CatalogError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        CatalogError::InvalidDefinition(message.into())
    }

    /// Errors that stop a bulk import instead of being recorded per item.
    pub fn is_fatal_for_import(&self) -> bool {
        !matches!(self, CatalogError::ArtifactAlreadyExists(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CatalogError::MissingAuthor("admin".to_string()).to_string(),
            "Missing author: admin"
        );
        assert_eq!(
            CatalogError::ArtifactAlreadyExists("TestArtifact1".to_string()).to_string(),
            "Artifact exists: TestArtifact1"
        );
        assert_eq!(
            CatalogError::not_found("Artifact", 100).to_string(),
            "Artifact not found: 100"
        );
    }

    #[test]
    fn test_import_fatality() {
        assert!(!CatalogError::ArtifactAlreadyExists("a".to_string()).is_fatal_for_import());
        assert!(CatalogError::MissingAuthor("a".to_string()).is_fatal_for_import());
        let storage = CatalogError::StorageUnavailable(rusqlite::Error::InvalidQuery);
        assert!(storage.is_fatal_for_import());
    }
}
