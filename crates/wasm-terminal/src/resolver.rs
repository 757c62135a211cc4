//! Command resolver backed by a directory of WASM binaries.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use wasm_terminal_core::command::callback_fn;
use wasm_terminal_core::{
    is_valid_command_name, CommandRequest, CommandResolver, CommandSettings, Error,
    FetchedCommand, Result, SharedCallback,
};

/// Names of the commands every resolver answers without touching the disk.
pub const BUILTIN_COMMANDS: [&str; 3] = ["cat", "echo", "help"];

/// Resolves commands to built-in callbacks or `<directory>/<name>.<extension>`.
///
/// Built-ins shadow binaries of the same name. The allow-list applies to
/// both.
pub struct DirectoryResolver {
    settings: CommandSettings,
    builtins: HashMap<String, SharedCallback>,
}

impl DirectoryResolver {
    /// Create a resolver with the standard built-ins registered.
    pub fn new(settings: CommandSettings) -> Self {
        info!(
            "Command directory: {} (*.{})",
            settings.directory.display(),
            settings.extension
        );
        let mut resolver = Self {
            settings,
            builtins: HashMap::new(),
        };
        resolver.register_builtins();
        resolver
    }

    /// Register an additional callback command.
    pub fn with_builtin(mut self, name: impl Into<String>, callback: SharedCallback) -> Self {
        self.builtins.insert(name.into(), callback);
        self
    }

    /// Path a binary command would be loaded from.
    pub fn binary_path(&self, name: &str) -> PathBuf {
        self.settings
            .directory
            .join(format!("{}.{}", name, self.settings.extension))
    }

    fn register_builtins(&mut self) {
        self.builtins.insert(
            "echo".to_string(),
            callback_fn(|args, _stdin| async move {
                Ok(format!("{}\n", args.get(1..).unwrap_or_default().join(" ")))
            }),
        );

        self.builtins.insert(
            "cat".to_string(),
            callback_fn(|_args, stdin| async move { Ok(stdin) }),
        );

        let directory = self.settings.directory.clone();
        let extension = self.settings.extension.clone();
        self.builtins.insert(
            "help".to_string(),
            callback_fn(move |_args, _stdin| {
                let directory = directory.clone();
                let extension = extension.clone();
                async move {
                    let binaries = list_binaries(&directory, &extension).await;
                    let mut out = format!("Built-in commands: {}\n", BUILTIN_COMMANDS.join(" "));
                    if binaries.is_empty() {
                        out.push_str("No WASM commands installed\n");
                    } else {
                        out.push_str(&format!("WASM commands: {}\n", binaries.join(" ")));
                    }
                    Ok(out)
                }
            }),
        );
    }
}

async fn list_binaries(directory: &Path, extension: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut entries = match tokio::fs::read_dir(directory).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", directory.display(), e);
            return names;
        }
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if is_valid_command_name(stem) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    names
}

#[async_trait]
impl CommandResolver for DirectoryResolver {
    async fn fetch_command(&self, request: &CommandRequest) -> Result<FetchedCommand> {
        let name = request
            .program()
            .ok_or_else(|| Error::InvalidCommand(String::new()))?;

        if !is_valid_command_name(name) {
            warn!("Rejected command name: {:?}", name);
            return Err(Error::InvalidCommand(name.to_string()));
        }

        if !self.settings.is_command_allowed(name) {
            return Err(Error::CommandNotAllowed(name.to_string()));
        }

        if let Some(callback) = self.builtins.get(name) {
            debug!("Resolved '{}' to a built-in", name);
            return Ok(FetchedCommand::Callback(callback.clone()));
        }

        let path = self.binary_path(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Resolved '{}' to {} ({} bytes)", name, path.display(), bytes.len());
                Ok(FetchedCommand::Binary(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::CommandNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
