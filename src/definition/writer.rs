use crate::definition::ArtifactDefinition;
use crate::error::{CatalogError, Result};

/// Format definitions as a multi-document YAML string.
pub fn write_yaml(definitions: &[ArtifactDefinition]) -> Result<String> {
    let mut documents = Vec::with_capacity(definitions.len());
    for definition in definitions {
        let yaml = serde_yaml::to_string(definition)
            .map_err(|e| CatalogError::invalid(format!("{}: {}", definition.name, e)))?;
        documents.push(yaml);
    }

    Ok(documents.join("---\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::reader::read_yaml_str;
    use crate::definition::{SourceDefinition, SourceType};
    use serde_json::json;

    fn file_definition(name: &str) -> ArtifactDefinition {
        let mut definition = ArtifactDefinition::new(name, "Some file.");
        let attributes = json!({"paths": ["/var/log/syslog"]});
        definition
            .sources
            .push(SourceDefinition::new(SourceType::File, attributes.as_object().unwrap().clone()));
        definition.labels.push("Logs".to_string());
        definition
    }

    #[test]
    fn test_written_yaml_reads_back() {
        let definitions = vec![file_definition("SysLog"), file_definition("AuthLog")];
        let yaml = write_yaml(&definitions).unwrap();
        assert_eq!(yaml.matches("---").count(), 1);
        assert!(yaml.contains("name: SysLog"));

        assert_eq!(read_yaml_str(&yaml).unwrap(), definitions);
    }

    #[test]
    fn test_write_nothing() {
        assert_eq!(write_yaml(&[]).unwrap(), "");
    }
}
