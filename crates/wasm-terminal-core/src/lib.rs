//! # wasm-terminal-core
//!
//! Core types for the WASM terminal.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other wasm-terminal crates. It provides:
//!
//! - The command-resolution contract (requests, fetched commands, resolvers)
//! - The virtual filesystem handle and its in-memory default
//! - `TerminalConfig`, the validated configuration for a terminal session
//! - File-based settings
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - the panel and the binary depend on
//! this crate, but this crate depends on no other wasm-terminal crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod settings;

// Re-export commonly used types
pub use command::{
    callback_fn, is_valid_command_name, resolver_fn, CallbackCommand, CommandOptions,
    CommandRequest, CommandResolver, FetchedCommand, SharedCallback, SharedResolver,
};
pub use config::{TerminalConfig, TerminalConfigRecord};
pub use error::{Error, Result};
pub use fs::{MemoryFs, SharedFs, VirtualFs};
pub use settings::{CommandSettings, ShellSettings, TerminalSettings};
