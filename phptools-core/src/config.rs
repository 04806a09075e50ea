//! Configuration loading from phptools.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{IoResultExt, PhptoolsError, PhptoolsResult};

pub const CONFIG_FILE_NAME: &str = "phptools.toml";

/// Main configuration structure for phptools.toml.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct PhptoolsConfig {
    /// Output configuration.
    pub output: Option<OutputConfig>,
    /// Constructor generation settings.
    pub constructor: Option<ConstructorConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Constructor generation settings.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConstructorConfig {
    /// Template file replacing the builtin one.
    pub template: Option<String>,
}

impl PhptoolsConfig {
    /// Whether JSON output was requested.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    /// Template override, resolved against the config file's directory.
    pub fn template_path(&self, root: &Path) -> Option<std::path::PathBuf> {
        self.constructor
            .as_ref()
            .and_then(|c| c.template.as_deref())
            .map(|t| root.join(t))
    }
}

/// Loads configuration from phptools.toml if it exists.
pub fn load_config(root: &Path) -> PhptoolsResult<Option<PhptoolsConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| PhptoolsError::config(&path, format!("Invalid {}: {}", CONFIG_FILE_NAME, e)))?;
    Ok(Some(cfg))
}
