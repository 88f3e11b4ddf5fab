use std::env;
use std::path::{Path, PathBuf};

use crate::config::{CadenceConfig, ConfigError, Result};

pub const CONFIG_FILE: &str = "cadence.toml";

// Precedence: explicit override (must exist), then CADENCE_CONFIG, then the
// nearest cadence.toml walking up from `start`, then defaults.
pub fn resolve_config(
    start: impl AsRef<Path>,
    override_path: Option<PathBuf>,
) -> Result<CadenceConfig> {
    if let Some(path) = override_path {
        return load_config(&path);
    }

    if let Ok(path) = env::var("CADENCE_CONFIG") {
        return load_config(Path::new(&path));
    }

    for ancestor in start.as_ref().ancestors() {
        let candidate = ancestor.join(CONFIG_FILE);
        if candidate.is_file() {
            return load_config(&candidate);
        }
    }

    Ok(CadenceConfig::default())
}

pub fn load_config(path: &Path) -> Result<CadenceConfig> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}
