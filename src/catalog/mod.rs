//! The artifact catalog engine.
//!
//! [`Catalog`] owns the SQLite connection and runs every operation in its
//! own transaction. Writes commit as a whole or not at all, and reads see
//! a single snapshot of the store. The algorithms themselves live in the
//! submodules and only see the [`Repository`] trait.

pub mod import;
pub mod models;
pub mod query;
pub mod reconciler;
pub mod repository;
pub mod sqlite;
pub mod vocabulary;

use std::path::Path;

use log::{debug, info};
use rusqlite::Connection;

pub use crate::error::{CatalogError, Result};
pub use import::ImportReport;
pub use models::{Artifact, ArtifactId, User, VocabularyEntry, VocabularyKind};
pub use query::{ArtifactDetail, ArtifactRef, ArtifactSummary, AuthorListing, VocabularyListing};
pub use repository::{ArtifactFilter, Repository};
pub use vocabulary::SeedSummary;

use crate::constants::DEFAULT_AUTHOR;
use crate::definition::{reader, ArtifactDefinition};
use sqlite::SqliteRepository;

/// Summary of [`Catalog::initialize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitSummary {
    pub vocabulary: SeedSummary,
    pub admin_created: bool,
    pub import: Option<ImportReport>,
}

pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open (or create) a catalog database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!("Opened catalog database {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        sqlite::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run `f` against one read snapshot of the store.
    fn in_read_transaction<T>(
        &self,
        f: impl FnOnce(&SqliteRepository<'_>) -> Result<T>,
    ) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(&SqliteRepository::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` in a transaction that commits only if `f` succeeds.
    fn in_transaction<T>(
        &mut self,
        f: impl FnOnce(&SqliteRepository<'_>) -> Result<T>,
    ) -> Result<T> {
        let tx = self.conn.transaction()?;
        let value = f(&SqliteRepository::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }

    /// Make sure every known label, supported OS and source type exists.
    pub fn seed_vocabulary(&mut self) -> Result<SeedSummary> {
        self.in_transaction(|repo| vocabulary::seed(repo))
    }

    pub fn add_user(&mut self, name: &str, fullname: &str, password: &str) -> Result<User> {
        let user = self.in_transaction(|repo| repo.create_user(name, fullname, password))?;
        info!("Added user {}", user.name);
        Ok(user)
    }

    /// Return the named user, creating it when missing. The flag is true
    /// when the user was created.
    pub fn ensure_user(
        &mut self,
        name: &str,
        fullname: &str,
        password: &str,
    ) -> Result<(User, bool)> {
        self.in_transaction(|repo| match repo.find_user_by_name(name)? {
            Some(user) => Ok((user, false)),
            None => Ok((repo.create_user(name, fullname, password)?, true)),
        })
    }

    pub fn upsert(
        &mut self,
        definition: &ArtifactDefinition,
        author: &str,
        allow_replace: bool,
    ) -> Result<Artifact> {
        self.in_transaction(|repo| reconciler::upsert(repo, definition, author, allow_replace))
    }

    /// Rewrite the artifact `id` from `definition`.
    pub fn update(
        &mut self,
        id: ArtifactId,
        definition: &ArtifactDefinition,
        author: &str,
    ) -> Result<Artifact> {
        self.in_transaction(|repo| {
            let existing = repo
                .find_artifact_by_id(id)?
                .ok_or_else(|| CatalogError::not_found("Artifact", id))?;
            reconciler::update(repo, &existing, definition, author)
        })
    }

    /// Upsert every definition, each in its own transaction.
    ///
    /// The author is checked once up front so an unknown author fails the
    /// batch before anything is stored.
    pub fn import_all(
        &mut self,
        definitions: &[ArtifactDefinition],
        author: &str,
        allow_replace: bool,
    ) -> Result<ImportReport> {
        self.in_read_transaction(|repo| match repo.find_user_by_name(author)? {
            Some(_) => Ok(()),
            None => Err(CatalogError::MissingAuthor(author.to_string())),
        })?;

        import::import_all(definitions, |definition| {
            self.in_transaction(|repo| reconciler::upsert(repo, definition, author, allow_replace))
        })
    }

    pub fn artifact(&self, id: ArtifactId) -> Result<Artifact> {
        self.in_read_transaction(|repo| {
            repo.find_artifact_by_id(id)?
                .ok_or_else(|| CatalogError::not_found("Artifact", id))
        })
    }

    pub fn artifact_by_name(&self, name: &str) -> Result<Artifact> {
        self.in_read_transaction(|repo| {
            repo.find_artifact_by_name(name)?
                .ok_or_else(|| CatalogError::not_found("Artifact", name))
        })
    }

    /// The stored definition of artifact `id`.
    pub fn artifact_definition(&self, id: ArtifactId) -> Result<ArtifactDefinition> {
        ArtifactDefinition::from_canonical_json(&self.artifact(id)?.data)
    }

    pub fn show(&self, id: ArtifactId) -> Result<ArtifactDetail> {
        self.in_read_transaction(|repo| query::detail(repo, id))
    }

    pub fn user(&self, name: &str) -> Result<User> {
        self.in_read_transaction(|repo| {
            repo.find_user_by_name(name)?
                .ok_or_else(|| CatalogError::not_found("User", name))
        })
    }

    pub fn delete(&mut self, id: ArtifactId) -> Result<()> {
        self.in_transaction(|repo| repo.delete_artifact(id))?;
        info!("Deleted artifact {}", id);
        Ok(())
    }

    pub fn list(&self, filter: &ArtifactFilter) -> Result<Vec<ArtifactSummary>> {
        self.in_read_transaction(|repo| query::list(repo, filter))
    }

    pub fn labels(&self) -> Result<Vec<VocabularyListing>> {
        self.in_read_transaction(|repo| query::vocabulary_listing(repo, VocabularyKind::Label))
    }

    pub fn supported_os(&self) -> Result<Vec<VocabularyListing>> {
        self.in_read_transaction(|repo| {
            query::vocabulary_listing(repo, VocabularyKind::SupportedOs)
        })
    }

    pub fn sources(&self) -> Result<Vec<VocabularyListing>> {
        self.in_read_transaction(|repo| query::vocabulary_listing(repo, VocabularyKind::Source))
    }

    pub fn authors(&self) -> Result<Vec<AuthorListing>> {
        self.in_read_transaction(|repo| query::author_listing(repo))
    }

    /// Stored definitions of the given artifacts, in request order.
    /// Unknown ids are skipped.
    pub fn export(&self, ids: &[ArtifactId]) -> Result<Vec<ArtifactDefinition>> {
        self.in_read_transaction(|repo| {
            let mut definitions = Vec::with_capacity(ids.len());

            for id in ids {
                match repo.find_artifact_by_id(*id)? {
                    Some(artifact) => {
                        definitions.push(ArtifactDefinition::from_canonical_json(&artifact.data)?)
                    }
                    None => debug!("Export skipping unknown artifact {}", id),
                }
            }

            Ok(definitions)
        })
    }

    /// Prepare a fresh catalog: seed the vocabulary, create the default
    /// admin user and load the definitions found below `seed_dir`,
    /// replacing existing artifacts of the same name.
    pub fn initialize(
        &mut self,
        admin_password: &str,
        seed_dir: Option<&Path>,
    ) -> Result<InitSummary> {
        let vocabulary = self.seed_vocabulary()?;
        let (_, admin_created) = self.ensure_user(DEFAULT_AUTHOR, DEFAULT_AUTHOR, admin_password)?;

        let import = match seed_dir {
            Some(dir) => {
                let definitions = reader::read_yaml_directory(dir)?;
                info!(
                    "Loading {} artifact definitions from {}",
                    definitions.len(),
                    dir.display()
                );
                Some(self.import_all(&definitions, DEFAULT_AUTHOR, true)?)
            }
            None => None,
        };

        Ok(InitSummary {
            vocabulary,
            admin_created,
            import,
        })
    }
}
