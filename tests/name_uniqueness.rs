//! Property test: however a batch of upserts and imports is interleaved,
//! each artifact name is stored at most once.

use std::collections::BTreeSet;

use proptest::prelude::*;

use artifact_catalog::catalog::{ArtifactFilter, Catalog};
use artifact_catalog::definition::{ArtifactDefinition, SourceDefinition, SourceType};

fn definition(name: &str) -> ArtifactDefinition {
    let mut attributes = serde_json::Map::new();
    attributes.insert("paths".to_string(), serde_json::json!(["/tmp/test"]));

    let mut def = ArtifactDefinition::new(name, "Property test artifact");
    def.supported_os.push("Linux".to_string());
    def.sources.push(SourceDefinition::new(SourceType::File, attributes));
    def
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_names_stay_unique(
        names in prop::collection::vec("[A-D]", 1..12),
        replace in any::<bool>(),
    ) {
        let mut catalog = Catalog::open_in_memory().unwrap();
        catalog.initialize("admin", None).unwrap();

        let definitions: Vec<_> = names.iter().map(|name| definition(name)).collect();
        let report = catalog.import_all(&definitions, "admin", replace).unwrap();
        prop_assert_eq!(report.succeeded_ids.len() + report.failed_names.len(), names.len());

        let distinct: BTreeSet<&String> = names.iter().collect();
        let stored = catalog.list(&ArtifactFilter::default()).unwrap();
        let stored_names: BTreeSet<&str> = stored.iter().map(|s| s.name.as_str()).collect();

        prop_assert_eq!(stored.len(), distinct.len());
        prop_assert_eq!(stored_names.len(), stored.len());
        if !replace {
            prop_assert_eq!(report.succeeded_ids.len(), distinct.len());
        }
    }
}
