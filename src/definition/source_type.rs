use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection mechanism of an artifact source
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    ArtifactGroup,
    Command,
    Directory,
    File,
    Path,
    RegistryKey,
    RegistryValue,
    Wmi,
}

impl SourceType {
    pub const ALL: [SourceType; 8] = [
        SourceType::ArtifactGroup,
        SourceType::Command,
        SourceType::Directory,
        SourceType::File,
        SourceType::Path,
        SourceType::RegistryKey,
        SourceType::RegistryValue,
        SourceType::Wmi,
    ];

    /// Type indicator as written in definition files and stored in the catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::ArtifactGroup => "ARTIFACT_GROUP",
            SourceType::Command => "COMMAND",
            SourceType::Directory => "DIRECTORY",
            SourceType::File => "FILE",
            SourceType::Path => "PATH",
            SourceType::RegistryKey => "REGISTRY_KEY",
            SourceType::RegistryValue => "REGISTRY_VALUE",
            SourceType::Wmi => "WMI",
        }
    }

    /// Attributes a source of this type must carry.
    pub fn required_attributes(&self) -> &'static [&'static str] {
        match self {
            SourceType::ArtifactGroup => &["names"],
            SourceType::Command => &["cmd", "args"],
            SourceType::Directory | SourceType::File | SourceType::Path => &["paths"],
            SourceType::RegistryKey => &["keys"],
            SourceType::RegistryValue => &["key_value_pairs"],
            SourceType::Wmi => &["query"],
        }
    }

    /// All type indicators, in catalog seeding order.
    pub fn indicators() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|source_type| source_type.as_str())
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceType::ALL
            .iter()
            .copied()
            .find(|source_type| source_type.as_str() == s)
            .ok_or_else(|| format!("unsupported source type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_serialization() {
        let serialized = serde_json::to_string(&SourceType::RegistryKey).unwrap();
        assert_eq!(serialized, "\"REGISTRY_KEY\"");

        let deserialized: SourceType = serde_json::from_str("\"ARTIFACT_GROUP\"").unwrap();
        assert_eq!(deserialized, SourceType::ArtifactGroup);

        let yaml: SourceType = serde_yaml::from_str("WMI").unwrap();
        assert_eq!(yaml, SourceType::Wmi);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for source_type in SourceType::ALL {
            let serialized = serde_json::to_string(&source_type).unwrap();
            assert_eq!(serialized, format!("\"{}\"", source_type.as_str()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("FILE".parse::<SourceType>().unwrap(), SourceType::File);
        assert_eq!("REGISTRY_VALUE".parse::<SourceType>().unwrap(), SourceType::RegistryValue);
        assert!("file".parse::<SourceType>().is_err());
        assert!("REKALL_PLUGIN".parse::<SourceType>().is_err());
    }

    #[test]
    fn test_required_attributes() {
        assert_eq!(SourceType::Command.required_attributes(), &["cmd", "args"]);
        assert_eq!(SourceType::File.required_attributes(), &["paths"]);
        assert_eq!(SourceType::RegistryKey.required_attributes(), &["keys"]);
    }

    #[test]
    fn test_indicators() {
        let indicators: Vec<_> = SourceType::indicators().collect();
        assert_eq!(indicators.len(), 8);
        assert!(indicators.contains(&"FILE"));
        assert!(indicators.contains(&"REGISTRY_KEY"));
    }
}
