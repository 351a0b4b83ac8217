//! Test utilities for the artifact catalog
//!
//! Connections with the schema (and optionally the seeded vocabulary and
//! the two default users), definition builders, and a repository wrapper
//! that fails a chosen operation.

#![cfg(test)]

use std::collections::BTreeSet;

use rusqlite::Connection;
use serde_json::{json, Map, Value};

use crate::catalog::models::{
    Artifact, ArtifactId, ArtifactRef, NewArtifact, User, UserId, VocabularyEntry, VocabularyId,
    VocabularyKind,
};
use crate::catalog::repository::{ArtifactFilter, Repository};
use crate::catalog::sqlite::{self, SqliteRepository};
use crate::catalog::vocabulary;
use crate::definition::{ArtifactDefinition, SourceDefinition, SourceType};
use crate::error::{CatalogError, Result};

/// In-memory database with the catalog schema.
pub fn open_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    sqlite::initialize_schema(&conn).unwrap();
    conn
}

/// In-memory database with the vocabulary seeded and the users
/// `admin` and `user`.
pub fn seeded_connection() -> Connection {
    let conn = open_connection();
    {
        let repo = SqliteRepository::new(&conn);
        vocabulary::seed(&repo).unwrap();
        repo.create_user("admin", "admin", "admin").unwrap();
        repo.create_user("user", "user", "user").unwrap();
    }
    conn
}

fn source_attributes(source_type: SourceType) -> Map<String, Value> {
    let value = match source_type {
        SourceType::ArtifactGroup => json!({ "names": ["TestArtifact1"] }),
        SourceType::Command => json!({ "cmd": "/bin/ls", "args": ["-la"] }),
        SourceType::Directory | SourceType::File | SourceType::Path => {
            json!({ "paths": ["/etc/passwd"] })
        }
        SourceType::RegistryKey => {
            json!({ "keys": ["HKEY_LOCAL_MACHINE\\SOFTWARE\\Test"] })
        }
        SourceType::RegistryValue => json!({
            "key_value_pairs": [{ "key": "HKEY_LOCAL_MACHINE\\SOFTWARE\\Test", "value": "Path" }]
        }),
        SourceType::Wmi => json!({ "query": "SELECT * FROM Win32_Process" }),
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A valid definition with one source per entry of `sources`.
pub fn definition(
    name: &str,
    labels: &[&str],
    supported_os: &[&str],
    sources: &[SourceType],
) -> ArtifactDefinition {
    let mut def = ArtifactDefinition::new(name, format!("Test artifact {}", name));
    def.labels = labels.iter().map(|label| label.to_string()).collect();
    def.supported_os = supported_os.iter().map(|os| os.to_string()).collect();
    def.sources = sources
        .iter()
        .map(|source_type| SourceDefinition::new(*source_type, source_attributes(*source_type)))
        .collect();
    def
}

pub fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Names of the entries of `kind` linked to `artifact`.
pub fn association_names<R: Repository + ?Sized>(
    repo: &R,
    artifact: &Artifact,
    kind: VocabularyKind,
) -> BTreeSet<String> {
    let linked = artifact.associations.get(kind);
    repo.list_vocabulary(kind)
        .unwrap()
        .into_iter()
        .filter(|entry| linked.contains(&entry.id))
        .map(|entry| entry.name)
        .collect()
}

/// The error a busy or broken database produces.
pub fn storage_failure() -> CatalogError {
    CatalogError::StorageUnavailable(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        Some("database is locked".to_string()),
    ))
}

/// Repository operations [`FailingRepository`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FindArtifactByName,
    FindArtifactById,
    FindUserByName,
    FindOrCreate,
    InsertArtifact,
    UpdateArtifact,
    DeleteArtifact,
    QueryArtifacts,
    CreateUser,
    ListUsers,
    ListVocabulary,
    ListLinks,
    ListAuthored,
}

/// Delegates to `inner` except for `fail_on`, which always fails with
/// [`storage_failure`].
pub struct FailingRepository<R> {
    inner: R,
    fail_on: Operation,
}

impl<R: Repository> FailingRepository<R> {
    pub fn new(inner: R, fail_on: Operation) -> Self {
        Self { inner, fail_on }
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if operation == self.fail_on {
            Err(storage_failure())
        } else {
            Ok(())
        }
    }
}

impl<R: Repository> Repository for FailingRepository<R> {
    fn find_artifact_by_name(&self, name: &str) -> Result<Option<Artifact>> {
        self.check(Operation::FindArtifactByName)?;
        self.inner.find_artifact_by_name(name)
    }

    fn find_artifact_by_id(&self, id: ArtifactId) -> Result<Option<Artifact>> {
        self.check(Operation::FindArtifactById)?;
        self.inner.find_artifact_by_id(id)
    }

    fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        self.check(Operation::FindUserByName)?;
        self.inner.find_user_by_name(name)
    }

    fn find_or_create(
        &self,
        kind: VocabularyKind,
        identifier: &str,
        description: Option<&str>,
    ) -> Result<VocabularyEntry> {
        self.check(Operation::FindOrCreate)?;
        self.inner.find_or_create(kind, identifier, description)
    }

    fn insert_artifact(&self, artifact: NewArtifact) -> Result<Artifact> {
        self.check(Operation::InsertArtifact)?;
        self.inner.insert_artifact(artifact)
    }

    fn update_artifact(&self, artifact: &Artifact) -> Result<()> {
        self.check(Operation::UpdateArtifact)?;
        self.inner.update_artifact(artifact)
    }

    fn delete_artifact(&self, id: ArtifactId) -> Result<()> {
        self.check(Operation::DeleteArtifact)?;
        self.inner.delete_artifact(id)
    }

    fn query_artifacts(&self, filter: &ArtifactFilter) -> Result<Vec<Artifact>> {
        self.check(Operation::QueryArtifacts)?;
        self.inner.query_artifacts(filter)
    }

    fn create_user(&self, name: &str, fullname: &str, password: &str) -> Result<User> {
        self.check(Operation::CreateUser)?;
        self.inner.create_user(name, fullname, password)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.check(Operation::ListUsers)?;
        self.inner.list_users()
    }

    fn list_vocabulary(&self, kind: VocabularyKind) -> Result<Vec<VocabularyEntry>> {
        self.check(Operation::ListVocabulary)?;
        self.inner.list_vocabulary(kind)
    }

    fn list_links(&self, kind: VocabularyKind) -> Result<Vec<(VocabularyId, ArtifactRef)>> {
        self.check(Operation::ListLinks)?;
        self.inner.list_links(kind)
    }

    fn list_authored(&self) -> Result<Vec<(UserId, ArtifactRef)>> {
        self.check(Operation::ListAuthored)?;
        self.inner.list_authored()
    }
}
