mod catalog_config;

pub use catalog_config::{load_or_create_config, CatalogConfig};
