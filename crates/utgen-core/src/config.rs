// ABOUTME: Configuration for the prompt generator server
// ABOUTME: JSON file first, then PROJECT_PATH / UTGEN_* environment overrides, then validation

use crate::error::{Result, UtgenError};
use crate::paths::{ComponentPathResolver, PROJECT_PATH_ENV};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_PATH_ENV: &str = "UTGEN_CONFIG";
pub const LOG_DIR_ENV: &str = "UTGEN_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "UTGEN_LOG_LEVEL";
pub const DEFAULT_CONFIG_FILE: &str = "utgen-config.json";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UtgenConfig {
    /// Project root; components live under `<root>/src/components`
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to `<log_dir>/utgen.log` instead of stderr
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

impl UtgenConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| UtgenError::io(path, e))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| UtgenError::io(path, e))?;
        Ok(())
    }

    /// Loads from `explicit`, `UTGEN_CONFIG` or `utgen-config.json`, then applies env overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let file = explicit
            .map(Path::to_path_buf)
            .or(env_path)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        let mut config = match file {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        // Empty values count as unset
        if let Some(root) = std::env::var_os(PROJECT_PATH_ENV).filter(|v| !v.is_empty()) {
            self.project_root = Some(PathBuf::from(root));
        }
        if let Some(dir) = std::env::var_os(LOG_DIR_ENV).filter(|v| !v.is_empty()) {
            self.logging.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = std::env::var(LOG_LEVEL_ENV).ok().filter(|v| !v.is_empty()) {
            self.logging.level = level.to_lowercase();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(UtgenError::config(format!(
                "logging.level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if matches!(&self.project_root, Some(root) if root.as_os_str().is_empty()) {
            return Err(UtgenError::config("project_root must not be empty"));
        }

        Ok(())
    }

    pub fn resolver(&self) -> ComponentPathResolver {
        ComponentPathResolver::new(self.project_root.clone())
    }
}
