//! File-based settings for the terminal shell.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command::is_valid_command_name;
use crate::{Error, Result};

/// Settings loaded from a YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TerminalSettings {
    /// Shell settings
    pub terminal: ShellSettings,
    /// Command lookup settings
    pub commands: CommandSettings,
}

impl TerminalSettings {
    /// Load settings from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: TerminalSettings =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings values.
    pub fn validate(&self) -> Result<()> {
        let extension = self.commands.extension.trim();
        if extension.is_empty() {
            return Err(Error::Config(
                "commands.extension cannot be empty".to_string(),
            ));
        }
        if extension.contains('/') || extension.starts_with('.') {
            return Err(Error::Config(format!(
                "commands.extension must be a bare extension, got '{extension}'"
            )));
        }

        for name in &self.commands.allowed {
            if !is_valid_command_name(name) {
                return Err(Error::Config(format!(
                    "commands.allowed contains an invalid command name: '{name}'"
                )));
            }
        }

        if let Some(endpoint) = &self.terminal.worker_endpoint {
            if endpoint.trim().is_empty() {
                return Err(Error::Config(
                    "terminal.worker_endpoint cannot be blank".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ShellSettings {
    /// URL where process workers are launched
    pub worker_endpoint: Option<String>,
    /// Prompt printed before each line
    pub prompt: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            worker_endpoint: None,
            prompt: "$ ".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Command lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CommandSettings {
    /// Directory holding command binaries
    pub directory: PathBuf,
    /// File extension of command binaries
    pub extension: String,
    /// List of allowed commands (empty = allow all)
    pub allowed: Vec<String>,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("commands"),
            extension: "wasm".to_string(),
            allowed: vec![],
        }
    }
}

impl CommandSettings {
    /// Check if a command is allowed.
    ///
    /// Returns true if `allowed` is empty (allow all) or if the command
    /// matches one of the allowed commands.
    pub fn is_command_allowed(&self, command: &str) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        self.allowed.iter().any(|allowed| allowed == command)
    }
}
