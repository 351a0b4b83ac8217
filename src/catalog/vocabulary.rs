use log::info;
use serde::Serialize;

use crate::catalog::models::{VocabularyEntry, VocabularyKind};
use crate::catalog::repository::Repository;
use crate::constants::{LABELS, SUPPORTED_OS};
use crate::definition::SourceType;
use crate::error::Result;

/// Return the canonical entry for `identifier`, creating it on first use.
///
/// Only labels keep a description; it is ignored for the other kinds and
/// never overwrites the description of an existing label.
pub fn resolve<R: Repository + ?Sized>(
    repo: &R,
    kind: VocabularyKind,
    identifier: &str,
    description: Option<&str>,
) -> Result<VocabularyEntry> {
    let description = match kind {
        VocabularyKind::Label => description,
        VocabularyKind::SupportedOs | VocabularyKind::Source => None,
    };
    repo.find_or_create(kind, identifier, description)
}

/// Number of entries of each vocabulary walked by [`seed`]
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub labels: usize,
    pub supported_os: usize,
    pub sources: usize,
}

/// Resolve every known label, supported OS and source type once.
///
/// Safe to run against an already seeded catalog.
pub fn seed<R: Repository + ?Sized>(repo: &R) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    for (name, desc) in LABELS {
        resolve(repo, VocabularyKind::Label, name, Some(*desc))?;
        summary.labels += 1;
    }

    for os in SUPPORTED_OS {
        resolve(repo, VocabularyKind::SupportedOs, os, None)?;
        summary.supported_os += 1;
    }

    for indicator in SourceType::indicators() {
        resolve(repo, VocabularyKind::Source, indicator, None)?;
        summary.sources += 1;
    }

    info!(
        "Seeded vocabulary: {} labels, {} supported OS, {} source types",
        summary.labels, summary.supported_os, summary.sources
    );
    Ok(summary)
}
