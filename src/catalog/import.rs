use log::{error, info, warn};
use serde::Serialize;

use crate::catalog::models::{Artifact, ArtifactId};
use crate::definition::ArtifactDefinition;
use crate::error::{CatalogError, Result};

/// Outcome of a bulk import, in input order.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    #[serde(rename = "ids")]
    pub succeeded_ids: Vec<ArtifactId>,
    #[serde(rename = "failed")]
    pub failed_names: Vec<String>,
}

impl ImportReport {
    /// True when items were rejected and none were stored.
    pub fn is_total_failure(&self) -> bool {
        self.succeeded_ids.is_empty() && !self.failed_names.is_empty()
    }

    /// Turn an import where every item collided into an error.
    pub fn into_outcome(self) -> Result<Self> {
        if self.is_total_failure() {
            Err(CatalogError::ArtifactAlreadyExists(self.failed_names.join(", ")))
        } else {
            Ok(self)
        }
    }
}

/// Run `upsert` over every definition in order.
///
/// Name collisions are recorded and the batch carries on. Any other error
/// stops the batch and is returned; items stored before it stay stored.
pub fn import_all<'d, I, F>(definitions: I, mut upsert: F) -> Result<ImportReport>
where
    I: IntoIterator<Item = &'d ArtifactDefinition>,
    F: FnMut(&ArtifactDefinition) -> Result<Artifact>,
{
    let mut report = ImportReport::default();

    for definition in definitions {
        match upsert(definition) {
            Ok(artifact) => report.succeeded_ids.push(artifact.id),
            Err(e) if e.is_fatal_for_import() => {
                error!("Import aborted at {}: {}", definition.name, e);
                return Err(e);
            }
            Err(e) => {
                warn!("Skipping {}: {}", definition.name, e);
                report.failed_names.push(definition.name.clone());
            }
        }
    }

    info!(
        "Imported {} artifacts, {} failed",
        report.succeeded_ids.len(),
        report.failed_names.len()
    );
    Ok(report)
}
