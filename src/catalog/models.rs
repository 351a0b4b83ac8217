use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Store-generated artifact identifier
    ArtifactId
);
id_type!(UserId);
id_type!(VocabularyId);

/// The three controlled vocabularies an artifact links to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    Label,
    SupportedOs,
    Source,
}

impl VocabularyKind {
    pub const ALL: [VocabularyKind; 3] = [
        VocabularyKind::Label,
        VocabularyKind::SupportedOs,
        VocabularyKind::Source,
    ];
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyKind::Label => write!(f, "Label"),
            VocabularyKind::SupportedOs => write!(f, "SupportedOS"),
            VocabularyKind::Source => write!(f, "Source"),
        }
    }
}

/// A canonical row of one of the controlled vocabularies.
///
/// `name` holds the label name, the OS name or the source type indicator.
/// Only labels carry a description.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub id: VocabularyId,
    pub kind: VocabularyKind,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub fullname: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Vocabulary links of an artifact, one id set per vocabulary.
///
/// The sets are always replaced as a whole on save.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Associations {
    pub labels: BTreeSet<VocabularyId>,
    pub supported_os: BTreeSet<VocabularyId>,
    pub sources: BTreeSet<VocabularyId>,
}

impl Associations {
    pub fn get(&self, kind: VocabularyKind) -> &BTreeSet<VocabularyId> {
        match kind {
            VocabularyKind::Label => &self.labels,
            VocabularyKind::SupportedOs => &self.supported_os,
            VocabularyKind::Source => &self.sources,
        }
    }

    pub fn get_mut(&mut self, kind: VocabularyKind) -> &mut BTreeSet<VocabularyId> {
        match kind {
            VocabularyKind::Label => &mut self.labels,
            VocabularyKind::SupportedOs => &mut self.supported_os,
            VocabularyKind::Source => &mut self.sources,
        }
    }
}

/// A stored artifact definition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub name: String,
    /// Canonical JSON of the full definition
    pub data: String,
    pub author: UserId,
    pub associations: Associations,
}

/// Id and name of a stored artifact, without its data
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub id: ArtifactId,
    pub name: String,
}

impl From<&Artifact> for ArtifactRef {
    fn from(artifact: &Artifact) -> Self {
        Self {
            id: artifact.id,
            name: artifact.name.clone(),
        }
    }
}

/// An artifact that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifact {
    pub name: String,
    pub data: String,
    pub author: UserId,
    pub associations: Associations,
}

impl NewArtifact {
    pub fn into_artifact(self, id: ArtifactId) -> Artifact {
        Artifact {
            id,
            name: self.name,
            data: self.data,
            author: self.author,
            associations: self.associations,
        }
    }
}
