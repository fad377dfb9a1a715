//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid regex"));

/// Default location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/variantsmith.toml";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        debug!("Loading config from {}", path.display());
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load from an explicit path, else the first default location that
    /// exists, else built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        for candidate in Self::default_locations() {
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Candidate config files in lookup order.
    pub fn default_locations() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("variantsmith").join("config.toml"));
        }
        paths
    }

    /// Expand environment variables in the format `${VAR}` or
    /// `${VAR:-fallback}`. Comment lines are left untouched.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(content.len());

        for (idx, line) in content.lines().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            if line.trim_start().starts_with('#') {
                out.push_str(line);
                continue;
            }

            let mut last = 0;
            for cap in ENV_VAR.captures_iter(line) {
                let Some(whole) = cap.get(0) else { continue };
                let var_name = &cap[1];
                let value = match std::env::var(var_name) {
                    Ok(v) => v,
                    Err(_) => match cap.get(2) {
                        Some(fallback) => fallback.as_str().to_string(),
                        None => return Err(ConfigError::EnvVarNotSet(var_name.to_string())),
                    },
                };
                out.push_str(&line[last..whole.start()]);
                out.push_str(&value);
                last = whole.end();
            }
            out.push_str(&line[last..]);
        }

        if content.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}
