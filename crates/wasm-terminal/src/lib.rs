//! WASM terminal shell library.
//!
//! This library contains the argument parsing, the command resolver and the
//! shell loop.
//! The actual binary is in main.rs.

pub mod cli;
pub mod resolver;
pub mod shell;

// Re-export commonly used types
pub use cli::config_path;
pub use resolver::{DirectoryResolver, BUILTIN_COMMANDS};
pub use shell::{CommandLine, Shell, ShellOutput};
