use log::{debug, info};

use crate::catalog::models::{Artifact, Associations, NewArtifact, VocabularyKind};
use crate::catalog::repository::Repository;
use crate::catalog::vocabulary;
use crate::definition::ArtifactDefinition;
use crate::error::{CatalogError, Result};

/// How an incoming definition is reconciled with the stored artifacts.
#[derive(Debug, Clone, Copy)]
pub enum ReconcileMode<'a> {
    /// Create an artifact named after the definition. An artifact with that
    /// name is overwritten only when `allow_replace` is set.
    Create { allow_replace: bool },
    /// Rewrite `existing`, including its name.
    Update { existing: &'a Artifact },
}

/// Create an artifact from `definition`, or overwrite the artifact of the
/// same name when `allow_replace` is set.
pub fn upsert<R: Repository + ?Sized>(
    repo: &R,
    definition: &ArtifactDefinition,
    author: &str,
    allow_replace: bool,
) -> Result<Artifact> {
    reconcile(repo, definition, author, ReconcileMode::Create { allow_replace })
}

/// Overwrite `existing` with `definition`, renaming it when the names differ.
pub fn update<R: Repository + ?Sized>(
    repo: &R,
    existing: &Artifact,
    definition: &ArtifactDefinition,
    author: &str,
) -> Result<Artifact> {
    reconcile(repo, definition, author, ReconcileMode::Update { existing })
}

/// Persist `definition` according to `mode`.
///
/// The author must exist and the name must not collide with another
/// artifact; both checks run before anything is written. The artifact's
/// author, name, data and all three association sets are then replaced.
pub fn reconcile<R: Repository + ?Sized>(
    repo: &R,
    definition: &ArtifactDefinition,
    author: &str,
    mode: ReconcileMode<'_>,
) -> Result<Artifact> {
    let author = repo
        .find_user_by_name(author)?
        .ok_or_else(|| CatalogError::MissingAuthor(author.to_string()))?;

    let target = match mode {
        ReconcileMode::Create { allow_replace } => {
            match repo.find_artifact_by_name(&definition.name)? {
                Some(_) if !allow_replace => {
                    return Err(CatalogError::ArtifactAlreadyExists(definition.name.clone()));
                }
                found => found,
            }
        }
        ReconcileMode::Update { existing } => {
            if existing.name != definition.name {
                let holder = repo.find_artifact_by_name(&definition.name)?;
                if holder.is_some_and(|holder| holder.id != existing.id) {
                    return Err(CatalogError::ArtifactAlreadyExists(definition.name.clone()));
                }
            }
            Some(existing.clone())
        }
    };

    let data = definition.to_canonical_json()?;
    let associations = resolve_associations(repo, definition)?;

    match target {
        None => {
            let artifact = repo.insert_artifact(NewArtifact {
                name: definition.name.clone(),
                data,
                author: author.id,
                associations,
            })?;
            info!("Created artifact {} ({}) for {}", artifact.name, artifact.id, author.name);
            Ok(artifact)
        }
        Some(mut artifact) => {
            if artifact.name != definition.name {
                debug!("Renaming artifact {} to {}", artifact.name, definition.name);
            }
            artifact.name = definition.name.clone();
            artifact.data = data;
            artifact.author = author.id;
            artifact.associations = associations;
            repo.update_artifact(&artifact)?;
            info!("Replaced artifact {} ({}) for {}", artifact.name, artifact.id, author.name);
            Ok(artifact)
        }
    }
}

/// Build the association sets of `definition` from scratch.
fn resolve_associations<R: Repository + ?Sized>(
    repo: &R,
    definition: &ArtifactDefinition,
) -> Result<Associations> {
    let mut associations = Associations::default();

    for label in &definition.labels {
        let entry = vocabulary::resolve(repo, VocabularyKind::Label, label, None)?;
        associations.labels.insert(entry.id);
    }

    for os in &definition.supported_os {
        let entry = vocabulary::resolve(repo, VocabularyKind::SupportedOs, os, None)?;
        associations.supported_os.insert(entry.id);
    }

    for source in &definition.sources {
        let indicator = source.type_indicator();
        let entry = vocabulary::resolve(repo, VocabularyKind::Source, indicator, None)?;
        associations.sources.insert(entry.id);
    }

    Ok(associations)
}
