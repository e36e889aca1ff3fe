// Configuration: built-in defaults, then the JSON config file, then CLI flags

use crate::error::ConfigError;
use crate::evaluate::ScoringPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/audit";
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/auditly/config.json";
pub const DEFAULT_POLICY: &str = "standard";

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub policy: Option<String>,
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub policy: ScoringPolicy,
    pub output_dir: PathBuf,
}

impl Config {
    /// Load the config file (if any) and apply `overrides`.
    ///
    /// An explicitly given `path` must exist. The default path is optional.
    pub fn load(path: Option<&str>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(ConfigFile::read(&expand_path(path))?),
            None => {
                let default_path = expand_path(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Some(ConfigFile::read(&default_path)?)
                } else {
                    debug!("No config file at {}, using defaults", default_path.display());
                    None
                }
            }
        };

        Self::resolve(file.unwrap_or_default(), overrides)
    }

    pub fn resolve(file: ConfigFile, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let endpoint = overrides
            .endpoint
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = match Url::parse(&endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return Err(ConfigError::InvalidEndpoint(endpoint)),
        };

        let policy_name = overrides
            .policy
            .or(file.policy)
            .unwrap_or_else(|| DEFAULT_POLICY.to_string());
        let policy = ScoringPolicy::from_name(&policy_name)
            .ok_or(ConfigError::UnknownPolicy(policy_name))?;

        let output_dir = overrides
            .output_dir
            .or(file.output_dir)
            .map(|dir| expand_path(&dir))
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            endpoint,
            policy,
            output_dir,
        })
    }

    /// Base URL screenshot identifiers are resolved against:
    /// `<endpoint origin>/screenshots/`.
    pub fn screenshot_base(&self) -> Url {
        let mut base = self.endpoint.clone();
        base.set_path("/screenshots/");
        base.set_query(None);
        base.set_fragment(None);
        base
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            policy: ScoringPolicy::standard(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Contents written by `auditly init`.
pub fn default_config_contents() -> String {
    let file = ConfigFile {
        endpoint: Some(DEFAULT_ENDPOINT.to_string()),
        policy: Some(DEFAULT_POLICY.to_string()),
        output_dir: Some(".".to_string()),
    };
    // A struct of plain strings always serializes
    serde_json::to_string_pretty(&file).unwrap_or_default()
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
