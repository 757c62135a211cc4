//! Error types for the WASM terminal.

use thiserror::Error;

/// Main error type for WASM terminal operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No configuration record was supplied at all
    #[error("You must provide a config for the Wasm terminal")]
    MissingConfig,

    /// The configuration record has no command resolver
    #[error(
        "You must provide a command resolver for the Wasm terminal config, to handle fetching commands to be run"
    )]
    MissingCommandResolver,

    /// No binary or callback exists for the command
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Command rejected by the allow-list
    #[error("Command not allowed: {0}")]
    CommandNotAllowed(String),

    /// Command name is empty or not a plain file name
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// A callback command reported a failure
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Filesystem path does not exist
    #[error("No such file: {0}")]
    FileNotFound(String),

    /// Path cannot name a file
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The console session stopped accepting messages
    #[error("Console session closed")]
    SessionClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
