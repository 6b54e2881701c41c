mod api;
mod defaults;
mod validation;

use crate::cli::Args;
use crate::error::{ChatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::{default_state_dir, default_timeout_secs, DEFAULT_API_BASE};
pub use validation::{expand_env_var_in_string, normalize_api_base, parse_flag};

pub const API_BASE_ENV: &str = "IKMS_API_BASE";
pub const TIMEOUT_ENV: &str = "IKMS_REQUEST_TIMEOUT";
pub const STATE_DIR_ENV: &str = "IKMS_STATE_DIR";
pub const VERBOSE_ENV: &str = "IKMS_VERBOSE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub state_dir: Option<String>,
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of an optional `.ikms-chat.{yaml,yml,json}` file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Environment variables that override the config file.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub api_base: Option<String>,
    pub timeout_secs: Option<String>,
    pub state_dir: Option<String>,
    pub verbose: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_base: env::var(API_BASE_ENV).ok(),
            timeout_secs: env::var(TIMEOUT_ENV).ok(),
            state_dir: env::var(STATE_DIR_ENV).ok(),
            verbose: env::var(VERBOSE_ENV).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub timeout_secs: u64,
    pub state_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = FileConfig::load().map_err(|e| ChatError::Config(format!("{:#}", e)))?;
        Self::resolve(args, &EnvOverrides::from_env(), file_config)
    }

    /// Precedence: CLI args > environment > config file > defaults.
    pub fn resolve(args: &Args, env: &EnvOverrides, file: FileConfig) -> Result<Self> {
        let raw_base = args
            .api_base
            .clone()
            .or_else(|| env.api_base.clone().filter(|v| !v.trim().is_empty()))
            .or_else(|| file.api.base_url.as_deref().map(expand_env_var_in_string))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = normalize_api_base(&raw_base)?;

        let timeout_secs = env
            .timeout_secs
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .or(file.api.timeout_secs)
            .unwrap_or_else(default_timeout_secs);

        let state_dir = env
            .state_dir
            .clone()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| file.session.state_dir.as_deref().map(expand_env_var_in_string))
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        let verbose = args.verbose
            || env
                .verbose
                .as_deref()
                .map(parse_flag)
                .or(file.session.verbose)
                .unwrap_or(false);

        Ok(Config {
            api_base,
            timeout_secs,
            state_dir,
            verbose,
        })
    }

    /// `None` disables the client-side timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl FileConfig {
    pub fn load() -> anyhow::Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))?
        };
        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".ikms-chat.yaml"),
            PathBuf::from(".ikms-chat.yml"),
            PathBuf::from(".ikms-chat.json"),
        ];

        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("ikms-chat");
            paths.push(config_dir.join("ikms-chat.yaml"));
            paths.push(config_dir.join("ikms-chat.yml"));
            paths.push(config_dir.join("ikms-chat.json"));
        }

        paths
    }
}
