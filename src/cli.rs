use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog::repository::ArtifactFilter;
use crate::definition::SourceType;

/// Command-line arguments for the artifact catalog.
///
/// Global options select the configuration file and the database; every
/// catalog operation is a subcommand that prints its result as JSON.
#[derive(Parser, Debug)]
#[clap(name = "artifact-catalog", about = "Catalog of forensic artifact definitions")]
pub struct Args {
    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the configuration
    #[clap(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create the schema, seed the vocabulary and the admin user, and load
    /// the seed definitions
    Init {
        /// Directory of YAML definitions, overrides the configuration
        #[clap(long)]
        seed_dir: Option<PathBuf>,

        /// Password given to a newly created admin user
        #[clap(long, default_value = "admin")]
        admin_password: String,
    },

    /// Register a user
    AddUser {
        name: String,

        #[clap(long)]
        fullname: Option<String>,

        #[clap(long, default_value = "")]
        password: String,
    },

    /// Create an artifact from a YAML definition file
    Create {
        file: PathBuf,

        #[clap(flatten)]
        author: AuthorOpts,

        /// Overwrite an artifact with the same name
        #[clap(long)]
        replace: bool,
    },

    /// Overwrite an artifact from a YAML definition file
    Update {
        id: i64,

        file: PathBuf,

        #[clap(flatten)]
        author: AuthorOpts,
    },

    /// Print one artifact with its definition
    Show { id: i64 },

    /// Delete an artifact
    Delete { id: i64 },

    /// List artifacts matching every given filter
    List(FilterOpts),

    /// List labels with their artifacts
    Labels,

    /// List supported operating systems with their artifacts
    SupportedOs,

    /// List source types with their artifacts
    Sources,

    /// List users with the artifacts they author
    Authors,

    /// Import every definition found in the given YAML files or directories
    Import {
        #[clap(required = true)]
        paths: Vec<PathBuf>,

        #[clap(flatten)]
        author: AuthorOpts,

        /// Overwrite artifacts with the same name
        #[clap(long)]
        replace: bool,
    },

    /// Write artifact definitions as a YAML document stream
    Export {
        #[clap(required = true)]
        ids: Vec<i64>,

        /// Output file (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug, PartialEq)]
pub struct AuthorOpts {
    /// Author of the artifact (default: from the configuration)
    #[clap(short, long)]
    pub author: Option<String>,
}

/// Filters for `list`. Repeat a flag to accept any of several values.
#[derive(ClapArgs, Debug, PartialEq, Default)]
pub struct FilterOpts {
    #[clap(long = "label")]
    pub labels: Vec<String>,

    #[clap(long = "os")]
    pub supported_os: Vec<String>,

    #[clap(long = "author")]
    pub authors: Vec<String>,

    #[clap(long = "source", value_parser = SourceType::from_str)]
    pub source_types: Vec<SourceType>,
}

impl From<&FilterOpts> for ArtifactFilter {
    fn from(opts: &FilterOpts) -> Self {
        ArtifactFilter {
            labels: opts.labels.iter().cloned().collect(),
            supported_os: opts.supported_os.iter().cloned().collect(),
            authors: opts.authors.iter().cloned().collect(),
            source_types: opts.source_types.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }
}
