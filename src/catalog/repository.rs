use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::models::{
    Artifact, ArtifactId, ArtifactRef, NewArtifact, User, UserId, VocabularyEntry, VocabularyId,
    VocabularyKind,
};
use crate::error::Result;

/// Filter criteria for artifact listings.
///
/// Within one dimension any match is enough; every non-empty dimension
/// must match. Empty dimensions impose no constraint.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ArtifactFilter {
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub supported_os: BTreeSet<String>,
    #[serde(default)]
    pub authors: BTreeSet<String>,
    #[serde(default)]
    pub source_types: BTreeSet<String>,
}

impl ArtifactFilter {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.supported_os.is_empty()
            && self.authors.is_empty()
            && self.source_types.is_empty()
    }

    /// Names required for one vocabulary dimension
    pub fn vocabulary(&self, kind: VocabularyKind) -> &BTreeSet<String> {
        match kind {
            VocabularyKind::Label => &self.labels,
            VocabularyKind::SupportedOs => &self.supported_os,
            VocabularyKind::Source => &self.source_types,
        }
    }
}

/// Storage seen by the catalog engine.
///
/// Every call may fail with `CatalogError::StorageUnavailable`. A store
/// that enforces artifact name uniqueness must report a violation as
/// `CatalogError::ArtifactAlreadyExists`.
pub trait Repository {
    fn find_artifact_by_name(&self, name: &str) -> Result<Option<Artifact>>;

    fn find_artifact_by_id(&self, id: ArtifactId) -> Result<Option<Artifact>>;

    fn find_user_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Insert the entry unless one with the same identifier exists, and
    /// return the stored entry either way.
    fn find_or_create(
        &self,
        kind: VocabularyKind,
        identifier: &str,
        description: Option<&str>,
    ) -> Result<VocabularyEntry>;

    /// Persist a new artifact together with its associations.
    fn insert_artifact(&self, artifact: NewArtifact) -> Result<Artifact>;

    /// Overwrite name, data, author and all association sets of an
    /// existing artifact.
    fn update_artifact(&self, artifact: &Artifact) -> Result<()>;

    fn delete_artifact(&self, id: ArtifactId) -> Result<()>;

    /// Artifacts matching the filter, in a stable order.
    fn query_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>>;

    fn create_user(&self, name: &str, fullname: &str, password: &str) -> Result<User>;

    fn list_users(&self) -> Result<Vec<User>>;

    fn list_vocabulary(&self, kind: VocabularyKind) -> Result<Vec<VocabularyEntry>>;

    /// Every link between an entry of `kind` and an artifact, ordered by
    /// artifact id.
    fn list_links(&self, kind: VocabularyKind) -> Result<Vec<(VocabularyId, ArtifactRef)>>;

    /// Every artifact with its author, ordered by artifact id.
    fn list_authored(&self) -> Result<Vec<(UserId, ArtifactRef)>>;
}
