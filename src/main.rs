use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use serde::Serialize;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use artifact_catalog::catalog::{ArtifactFilter, ArtifactId, Catalog};
use artifact_catalog::cli::{Args, AuthorOpts, Commands};
use artifact_catalog::config::{load_or_create_config, CatalogConfig};
use artifact_catalog::constants::DEFAULT_CONFIG_PATH;
use artifact_catalog::definition::{reader, writer, ArtifactDefinition};

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    let config_path = args.config.clone().or_else(|| {
        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        default_path.exists().then_some(default_path)
    });
    let config = load_or_create_config(config_path.as_deref())?;
    let database = args
        .database
        .clone()
        .unwrap_or_else(|| config.database_path.clone());

    let mut catalog = Catalog::open(&database)
        .context(format!("Failed to open catalog database {}", database.display()))?;

    run(&mut catalog, &config, &args.command)
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

fn run(catalog: &mut Catalog, config: &CatalogConfig, command: &Commands) -> Result<()> {
    match command {
        Commands::Init { seed_dir, admin_password } => {
            let seed_dir = seed_dir.as_ref().or(config.seed_directory.as_ref());
            let summary = catalog.initialize(admin_password, seed_dir.map(PathBuf::as_path))?;
            info!(
                "Catalog ready: {} labels, {} supported OS, {} source types",
                summary.vocabulary.labels,
                summary.vocabulary.supported_os,
                summary.vocabulary.sources
            );
            match summary.import {
                Some(report) => print_json(&report),
                None => Ok(()),
            }
        }
        Commands::AddUser { name, fullname, password } => {
            let fullname = fullname.as_deref().unwrap_or(name);
            print_json(&catalog.add_user(name, fullname, password)?)
        }
        Commands::Create { file, author, replace } => {
            let definition = read_single_definition(file)?;
            let artifact = catalog.upsert(&definition, author_name(author, config), *replace)?;
            print_json(&catalog.show(artifact.id)?)
        }
        Commands::Update { id, file, author } => {
            let definition = read_single_definition(file)?;
            let author = author_name(author, config);
            let artifact = catalog.update(ArtifactId(*id), &definition, author)?;
            print_json(&catalog.show(artifact.id)?)
        }
        Commands::Show { id } => print_json(&catalog.show(ArtifactId(*id))?),
        Commands::Delete { id } => {
            catalog.delete(ArtifactId(*id))?;
            Ok(())
        }
        Commands::List(opts) => print_json(&catalog.list(&ArtifactFilter::from(opts))?),
        Commands::Labels => print_json(&catalog.labels()?),
        Commands::SupportedOs => print_json(&catalog.supported_os()?),
        Commands::Sources => print_json(&catalog.sources()?),
        Commands::Authors => print_json(&catalog.authors()?),
        Commands::Import { paths, author, replace } => {
            let mut definitions = Vec::new();
            for path in paths {
                definitions.extend(read_definitions(path)?);
            }

            let report = catalog.import_all(&definitions, author_name(author, config), *replace)?;
            print_json(&report)?;
            report.into_outcome()?;
            Ok(())
        }
        Commands::Export { ids, output } => {
            let ids: Vec<ArtifactId> = ids.iter().copied().map(ArtifactId).collect();
            let yaml = writer::write_yaml(&catalog.export(&ids)?)?;
            match output {
                Some(path) => {
                    fs::write(path, yaml)
                        .context(format!("Failed to write export to {}", path.display()))?;
                    info!("Exported {} artifacts to {}", ids.len(), path.display());
                }
                None => print!("{}", yaml),
            }
            Ok(())
        }
    }
}

fn author_name<'a>(opts: &'a AuthorOpts, config: &'a CatalogConfig) -> &'a str {
    opts.author.as_deref().unwrap_or(&config.default_author)
}

fn read_definitions(path: &Path) -> Result<Vec<ArtifactDefinition>> {
    let definitions = if path.is_dir() {
        reader::read_yaml_directory(path)?
    } else {
        reader::read_yaml_file(path)?
    };
    Ok(definitions)
}

fn read_single_definition(path: &Path) -> Result<ArtifactDefinition> {
    let mut definitions = reader::read_yaml_file(path)?;
    match definitions.len() {
        1 => definitions.pop().ok_or_else(|| anyhow!("No definition in {}", path.display())),
        0 => bail!("No definition in {}", path.display()),
        n => bail!("Expected one definition in {}, found {}", path.display(), n),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
