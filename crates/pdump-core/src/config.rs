use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::emitter::FileMode;
use crate::error::ConfigError;

/// Settings for one content emitter: what to resolve and where to send it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Template resolved against request placeholders on every invocation. Required.
    #[serde(default)]
    pub content: String,
    /// Template for the destination file path. Lines are appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Octal permission bits used only when the file is created (default "644").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_permissions: Option<String>,
    /// Sub-logger name appended to the handler's base logger name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger_suffix: Option<String>,
}

impl EmitterConfig {
    /// File path template, if set and non-empty.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().filter(|s| !s.is_empty())
    }

    /// Logger suffix, if set and non-empty.
    pub fn logger_suffix(&self) -> Option<&str> {
        self.logger_suffix.as_deref().filter(|s| !s.is_empty())
    }

    /// Parsed permission bits for newly created files.
    pub fn file_mode(&self) -> Result<FileMode, ConfigError> {
        match self.file_permissions.as_deref() {
            None | Some("") => Ok(FileMode::default()),
            Some(raw) => FileMode::parse(raw),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file().is_none() && self.logger_suffix().is_none() {
            return Err(ConfigError::MissingSink);
        }
        if self.content.is_empty() {
            return Err(ConfigError::MissingContent);
        }
        self.file_mode()?;
        Ok(())
    }
}

/// One `[[dump]]` entry: an emitter plus an optional request path matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Only requests whose path starts with this prefix are dumped. None = all requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub emitter: EmitterConfig,
    /// Keys no field claimed. `deny_unknown_fields` does not combine with `flatten`,
    /// so leftovers are collected here and rejected by `validate`.
    #[serde(flatten, skip_serializing)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl DumpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key) = self.unknown.keys().next() {
            return Err(ConfigError::UnknownOption(key.clone()));
        }
        if let Some(path) = &self.path {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPathMatcher(path.clone()));
            }
        }
        self.emitter.validate()
    }
}

/// Terminal responder that answers every request after all dumps have run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondConfig {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
}

fn default_status() -> u16 {
    200
}

impl Default for RespondConfig {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: String::new(),
        }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

/// Global configuration loaded from `~/.config/pdump/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PdumpConfig {
    /// Socket address the host pipeline listens on.
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default)]
    pub respond: RespondConfig,
    /// Handler instances, run in order for every request.
    #[serde(default)]
    pub dump: Vec<DumpConfig>,
}

impl Default for PdumpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            respond: RespondConfig::default(),
            dump: vec![DumpConfig {
                path: None,
                emitter: EmitterConfig {
                    content: "{method} {path}".to_string(),
                    logger_suffix: Some("requests".to_string()),
                    ..EmitterConfig::default()
                },
                unknown: BTreeMap::new(),
            }],
        }
    }
}

impl PdumpConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|_| ConfigError::InvalidListen(self.listen.clone()))
    }

    /// Checks every field that would otherwise fail at startup or at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;
        if !(100..=999).contains(&self.respond.status) {
            return Err(ConfigError::InvalidStatus(self.respond.status));
        }
        for (index, dump) in self.dump.iter().enumerate() {
            dump.validate().map_err(|e| e.in_dump(index))?;
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pdump")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Parse and validate a config file.
pub fn load_from_path(path: &Path) -> Result<PdumpConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let cfg: PdumpConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config: {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PdumpConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PdumpConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
