//! Global constants for the artifact catalog.
//!
//! This module centralizes the fixed vocabulary the catalog is seeded with
//! and the default locations used by the command-line front end.

// Reference vocabulary
/// Known artifact labels and their descriptions.
pub const LABELS: &[(&str, &str)] = &[
    ("Antivirus", "Antivirus related artifacts, e.g. quarantine files."),
    ("Authentication", "Authentication artifacts."),
    ("Browser", "Web browser artifacts."),
    ("Cloud Storage", "Cloud storage artifacts."),
    ("Configuration Files", "Configuration files artifacts."),
    ("Execution", "Contain execution events."),
    ("ExternalAccount", "Information about any users' account, e.g. username, account ID, etc."),
    ("ExternalMedia", "Contain external media data / events e.g. USB drives."),
    ("History Files", "History files artifacts e.g. .bash_history."),
    ("IM", "Instant Messaging / Chat applications artifacts."),
    ("iOS", "Artifacts related to iOS devices connected to the system."),
    ("KnowledgeBase", "Artifacts used in knowledgebase generation."),
    ("Logs", "Contain log files."),
    ("Mail", "Mail client applications artifacts."),
    ("Memory", "Artifacts retrieved from memory."),
    ("Network", "Describe networking state."),
    ("Processes", "Describe running processes."),
    ("Software", "Installed software."),
    ("System", "Core system artifacts."),
    ("Users", "Information about users."),
];

/// Operating systems an artifact definition may declare support for.
pub const SUPPORTED_OS: &[&str] = &["Darwin", "Linux", "Windows"];

// Catalog defaults
/// Author used when none is given on the command line or in the config
pub const DEFAULT_AUTHOR: &str = "admin";

/// Default SQLite database file
pub const DEFAULT_DATABASE_PATH: &str = "artifact_catalog.sqlite";

/// Default configuration file
pub const DEFAULT_CONFIG_PATH: &str = "artifact_catalog.yaml";

/// File extension of artifact definition files picked up from a directory
pub const DEFINITION_FILE_EXTENSION: &str = "yaml";

/// Returns the description of a known label.
pub fn label_description(name: &str) -> Option<&'static str> {
    LABELS
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, desc)| *desc)
}

/// Returns true if `name` is one of the known labels.
pub fn is_known_label(name: &str) -> bool {
    label_description(name).is_some()
}

/// Returns true if `name` is one of the supported operating systems.
pub fn is_supported_os(name: &str) -> bool {
    SUPPORTED_OS.contains(&name)
}
