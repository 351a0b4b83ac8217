use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::constants::DEFINITION_FILE_EXTENSION;
use crate::definition::ArtifactDefinition;
use crate::error::{CatalogError, Result};

/// Read every artifact definition from a multi-document YAML string.
///
/// Empty documents are skipped. Each definition is validated before it is
/// returned, so one bad document rejects the whole input.
pub fn read_yaml_str(content: &str) -> Result<Vec<ArtifactDefinition>> {
    let mut definitions = Vec::new();

    for document in serde_yaml::Deserializer::from_str(content) {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|e| CatalogError::invalid(e.to_string()))?;
        if value.is_null() {
            continue;
        }

        let definition: ArtifactDefinition = serde_yaml::from_value(value)
            .map_err(|e| CatalogError::invalid(e.to_string()))?;
        definition.validate()?;
        definitions.push(definition);
    }

    Ok(definitions)
}

/// Read a single artifact definition from a JSON document.
pub fn read_json_str(content: &str) -> Result<ArtifactDefinition> {
    let definition = ArtifactDefinition::from_canonical_json(content)?;
    definition.validate()?;
    Ok(definition)
}

/// Read all artifact definitions from a YAML file.
pub fn read_yaml_file(path: &Path) -> Result<Vec<ArtifactDefinition>> {
    let content = fs::read_to_string(path)?;
    let definitions = read_yaml_str(&content).map_err(|e| match e {
        CatalogError::InvalidDefinition(message) => {
            CatalogError::invalid(format!("{}: {}", path.display(), message))
        }
        other => other,
    })?;

    debug!("Read {} artifact definitions from {}", definitions.len(), path.display());
    Ok(definitions)
}

/// Read all artifact definitions from the YAML files below a directory,
/// in file name order.
pub fn read_yaml_directory(dir: &Path) -> Result<Vec<ArtifactDefinition>> {
    let mut definitions = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CatalogError::Io(e.into()))?;
        let path = entry.path();
        let is_definition_file = entry.file_type().is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(DEFINITION_FILE_EXTENSION);

        if is_definition_file {
            definitions.extend(read_yaml_file(path)?);
        }
    }

    Ok(definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SourceType;
    use tempfile::TempDir;

    const TWO_DEFINITIONS: &str = r#"
# Test artifacts
name: TestArtifact1
doc: First test artifact.
sources:
- type: FILE
  attributes: {paths: ['/etc/passwd']}
labels: [Software]
supported_os: [Windows, Linux]
---
name: TestArtifact2
doc: Second test artifact.
sources:
- type: COMMAND
  attributes:
    cmd: /bin/ls
    args: ['-la']
supported_os: [Linux]
"#;

    #[test]
    fn test_read_multiple_documents() {
        let definitions = read_yaml_str(TWO_DEFINITIONS).unwrap();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].name, "TestArtifact1");
        assert_eq!(definitions[0].sources[0].type_indicator, SourceType::File);
        assert_eq!(definitions[1].sources[0].type_indicator(), "COMMAND");
        assert_eq!(definitions[1].supported_os, vec!["Linux".to_string()]);
    }

    #[test]
    fn test_skips_empty_documents() {
        let content = format!("---\n{}\n---\n", TWO_DEFINITIONS);
        assert_eq!(read_yaml_str(&content).unwrap().len(), 2);
        assert!(read_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_document_rejected() {
        let content = "name: Broken\ndoc: no sources here\n";
        let err = read_yaml_str(content).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidDefinition(_)));

        let content = "name: Broken\ndoc: d\nsources:\n- type: REKALL_PLUGIN\n";
        assert!(read_yaml_str(content).is_err());
    }

    #[test]
    fn test_read_json() {
        let content = r#"{"name": "TestArtifact4", "doc": "d",
            "sources": [{"type": "REGISTRY_KEY",
                "attributes": {"keys": ["HKEY_LOCAL_MACHINE\\TEST"]}}],
            "labels": ["Software"], "supported_os": ["Darwin", "Linux"]}"#;
        let definition = read_json_str(content).unwrap();
        assert_eq!(definition.name, "TestArtifact4");
        assert_eq!(definition.labels, vec!["Software".to_string()]);
    }

    #[test]
    fn test_read_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.yaml"), TWO_DEFINITIONS).unwrap();
        fs::write(
            temp_dir.path().join("a.yaml"),
            "name: TestArtifact0\ndoc: d\nsources:\n- type: WMI\n  \
             attributes: {query: 'SELECT * FROM Win32_Process'}\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "not yaml").unwrap();

        let definitions = read_yaml_directory(temp_dir.path()).unwrap();
        let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["TestArtifact0", "TestArtifact1", "TestArtifact2"]);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_yaml_file(Path::new("/nonexistent/artifacts.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
