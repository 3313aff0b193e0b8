//! Configuration file parsing for lava.toml.

use lava_vm_heap::HeapConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Heap size and table probing
    #[serde(default)]
    pub heap: HeapConfig,

    /// What to print after compiling
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Print the constant pool
    #[serde(default)]
    pub dump_pool: bool,

    /// Print the class table entries
    #[serde(default)]
    pub dump_heap: bool,

    /// Print a JSON report instead of text
    #[serde(default)]
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dump_pool: false,
            dump_heap: false,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file or search for default config files.
///
/// An explicit path must exist; a searched one is optional.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::current_dir().ok().and_then(|cwd| find_config_file(&cwd)),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Search for a configuration file in `start` and its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    const CONFIG_NAMES: &[&str] = &["lava.toml", ".lava.toml"];

    let mut dir = Some(start);
    while let Some(current) = dir {
        for name in CONFIG_NAMES {
            let path = current.join(name);
            if path.is_file() {
                return Some(path);
            }
        }
        dir = current.parent();
    }

    None
}
