use std::collections::HashMap;

use serde::Serialize;

pub use crate::catalog::models::ArtifactRef;

use crate::catalog::models::{Artifact, ArtifactId, UserId, VocabularyId, VocabularyKind};
use crate::catalog::repository::{ArtifactFilter, Repository};
use crate::definition::ArtifactDefinition;
use crate::error::{CatalogError, Result};

/// Denormalized view of a stored artifact
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub id: ArtifactId,
    pub name: String,
    pub author: String,
    pub supported_os: Vec<String>,
    pub labels: Vec<String>,
    pub sources: Vec<String>,
}

/// A vocabulary entry with the artifacts linked to it
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct VocabularyListing {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub artifacts: Vec<ArtifactRef>,
}

/// A user with the artifacts they author
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AuthorListing {
    pub name: String,
    pub fullname: String,
    pub artifacts: Vec<ArtifactRef>,
}

/// A stored artifact with its parsed definition
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ArtifactDetail {
    #[serde(flatten)]
    pub summary: ArtifactSummary,
    pub definition: ArtifactDefinition,
}

/// Artifacts matching `filter`, ordered by id.
pub fn list<R: Repository + ?Sized>(
    repo: &R,
    filter: &ArtifactFilter,
) -> Result<Vec<ArtifactSummary>> {
    let artifacts = repo.query_artifacts(filter)?;
    summarize(repo, &artifacts)
}

/// Summary and definition of artifact `id`.
pub fn detail<R: Repository + ?Sized>(repo: &R, id: ArtifactId) -> Result<ArtifactDetail> {
    let artifact = repo
        .find_artifact_by_id(id)?
        .ok_or_else(|| CatalogError::not_found("Artifact", id))?;
    let definition = ArtifactDefinition::from_canonical_json(&artifact.data)?;
    let summary = summarize(repo, std::slice::from_ref(&artifact))?
        .pop()
        .ok_or_else(|| CatalogError::not_found("Artifact", id))?;

    Ok(ArtifactDetail { summary, definition })
}

fn summarize<R: Repository + ?Sized>(
    repo: &R,
    artifacts: &[Artifact],
) -> Result<Vec<ArtifactSummary>> {
    if artifacts.is_empty() {
        return Ok(Vec::new());
    }

    let mut vocabulary: HashMap<VocabularyKind, HashMap<VocabularyId, String>> = HashMap::new();
    for kind in VocabularyKind::ALL {
        let names = repo
            .list_vocabulary(kind)?
            .into_iter()
            .map(|entry| (entry.id, entry.name))
            .collect();
        vocabulary.insert(kind, names);
    }

    let authors: HashMap<UserId, String> = repo
        .list_users()?
        .into_iter()
        .map(|user| (user.id, user.name))
        .collect();

    let names_of = |artifact: &Artifact, kind: VocabularyKind| -> Result<Vec<String>> {
        let mut names = artifact
            .associations
            .get(kind)
            .iter()
            .map(|id| {
                vocabulary
                    .get(&kind)
                    .and_then(|names| names.get(id))
                    .cloned()
                    .ok_or_else(|| {
                        CatalogError::not_found("Vocabulary entry", format!("{} {}", kind, id))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    };

    artifacts
        .iter()
        .map(|artifact| -> Result<ArtifactSummary> {
            let author = authors
                .get(&artifact.author)
                .cloned()
                .ok_or_else(|| CatalogError::not_found("User", artifact.author))?;
            Ok(ArtifactSummary {
                id: artifact.id,
                name: artifact.name.clone(),
                author,
                supported_os: names_of(artifact, VocabularyKind::SupportedOs)?,
                labels: names_of(artifact, VocabularyKind::Label)?,
                sources: names_of(artifact, VocabularyKind::Source)?,
            })
        })
        .collect()
}

/// Every entry of one vocabulary with its linked artifacts.
pub fn vocabulary_listing<R: Repository + ?Sized>(
    repo: &R,
    kind: VocabularyKind,
) -> Result<Vec<VocabularyListing>> {
    let mut linked: HashMap<VocabularyId, Vec<ArtifactRef>> = HashMap::new();
    for (entry_id, artifact) in repo.list_links(kind)? {
        linked.entry(entry_id).or_default().push(artifact);
    }

    let listings = repo
        .list_vocabulary(kind)?
        .into_iter()
        .map(|entry| VocabularyListing {
            artifacts: linked.remove(&entry.id).unwrap_or_default(),
            name: entry.name,
            description: entry.description,
        })
        .collect();

    Ok(listings)
}

/// Every user with the artifacts they author.
pub fn author_listing<R: Repository + ?Sized>(repo: &R) -> Result<Vec<AuthorListing>> {
    let mut authored: HashMap<UserId, Vec<ArtifactRef>> = HashMap::new();
    for (author, artifact) in repo.list_authored()? {
        authored.entry(author).or_default().push(artifact);
    }

    let listings = repo
        .list_users()?
        .into_iter()
        .map(|user| AuthorListing {
            artifacts: authored.remove(&user.id).unwrap_or_default(),
            name: user.name,
            fullname: user.fullname,
        })
        .collect();

    Ok(listings)
}
