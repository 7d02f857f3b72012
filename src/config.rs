//! Configuration handling for carve runs.
//! An optional configuration file at the target root can set the directive
//! prefix and replace the file patterns. Values given on the command line
//! take precedence over the file.

use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// Supported configuration file names, in lookup order
pub const CONFIG_FILES: [&str; 3] = ["carve.json", "carve.yml", "carve.yaml"];

/// Settings read from the configuration file. Absent keys keep the defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directive prefix, e.g. `@mst`
    pub prefix: Option<String>,
    /// Replaces the default file patterns wholesale
    pub patterns: Option<Vec<String>>,
}

/// Returns the contents of the first configuration file found in `root`.
///
/// # Arguments
/// * `root` - Directory to look in
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the first found configuration file, if any
pub fn load_config<P: AsRef<Path>>(root: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = root.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| Error::file(&config_path, e))?;
            return Ok(Some(content));
        }
    }

    debug!("No configuration file found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
///   for [`Config`]
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {}", e))),
    }
}

/// Loads and parses the configuration for `root`, defaulting when absent.
pub fn get_config<P: AsRef<Path>>(root: P) -> Result<Config> {
    match load_config(root, &CONFIG_FILES)? {
        Some(content) => parse_config(&content),
        None => Ok(Config::default()),
    }
}
