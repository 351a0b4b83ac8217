//! # artifact_catalog
//!
//! A catalog of forensic artifact definitions backed by SQLite.
//!
//! ## Overview
//!
//! Artifact definitions are YAML documents describing where a piece of
//! forensic evidence lives (files, registry keys, commands, WMI queries)
//! together with labels and the operating systems they apply to. The
//! catalog stores each definition as canonical JSON and keeps the labels,
//! supported OS and source types as shared vocabulary linked to it, so
//! artifacts can be queried along any of those dimensions.
//!
//! ## Usage
//!
//! ```no_run
//! use artifact_catalog::catalog::{ArtifactFilter, Catalog};
//! use artifact_catalog::definition::reader;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut catalog = Catalog::open(Path::new("artifact_catalog.sqlite"))?;
//! catalog.initialize("admin", None)?;
//!
//! let definitions = reader::read_yaml_file(Path::new("windows.yaml"))?;
//! let report = catalog.import_all(&definitions, "admin", false)?;
//! println!("Imported {} artifacts", report.succeeded_ids.len());
//!
//! let mut filter = ArtifactFilter::default();
//! filter.supported_os.insert("Windows".to_string());
//! for artifact in catalog.list(&filter)? {
//!     println!("{}", artifact.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`definition`]: artifact definition model, validation and YAML I/O
//! - [`catalog`]: storage, reconciliation, import and queries
//! - [`config`]: YAML configuration file
//! - [`cli`]: command-line interface
//! - [`constants`]: seed vocabulary and defaults
//! - [`error`]: error type of the catalog core

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod definition;
pub mod error;

#[cfg(test)]
mod test_utils;
