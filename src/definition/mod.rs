// Parsed artifact definitions and their file formats
mod artifact_definition;
mod source_type;
pub mod reader;
pub mod writer;

pub use artifact_definition::{ArtifactDefinition, SourceDefinition};
pub use source_type::SourceType;
