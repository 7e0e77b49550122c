pub mod check;
pub mod validate;

use anyhow::{Context, Result};
use constraints_core::EngineConfig;
use constraints_parser::parse_config_file;
use std::path::Path;

/// Loads the engine configuration, or the defaults when no file is given.
pub(crate) fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => parse_config_file(Path::new(path))
            .with_context(|| format!("Failed to parse config file: {}", path)),
        None => Ok(EngineConfig::default()),
    }
}
