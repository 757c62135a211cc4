//! Command-resolution contract.
//!
//! A terminal never knows where its programs live. Every time a command is
//! run it asks a [`CommandResolver`] for it, and the resolver answers with
//! one of three shapes (see [`FetchedCommand`]).

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Result;

lazy_static! {
    static ref COMMAND_NAME: Regex = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap();
}

/// Check that a command name is a plain file name (no separators, no `..`).
pub fn is_valid_command_name(name: &str) -> bool {
    COMMAND_NAME.is_match(name) && !name.contains("..")
}

/// A request to resolve a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CommandRequest {
    /// Argument sequence, program name first
    pub args: Vec<String>,
    /// Environment variables visible to the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<HashMap<String, String>>,
}

impl CommandRequest {
    /// Create a request without an environment.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env: None,
        }
    }

    /// Attach an environment mapping.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// The program name (first argument), if any.
    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Structured descriptor telling the execution runtime how to run a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CommandOptions {
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Environment variables
    pub env: HashMap<String, String>,
    /// Compiled or raw WASM module bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<Vec<u8>>,
    /// Standard input fed to the program before the terminal's own
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
}

/// A command implemented as a host function.
///
/// Takes the argument sequence and the full standard input, returns the
/// standard output.
#[async_trait]
pub trait CallbackCommand: Send + Sync {
    /// Run the command.
    async fn call(&self, args: &[String], stdin: &str) -> Result<String>;
}

/// Shared handle to a callback command.
pub type SharedCallback = Arc<dyn CallbackCommand>;

struct FnCallback<F>(F);

#[async_trait]
impl<F, Fut> CallbackCommand for FnCallback<F>
where
    F: Fn(Vec<String>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn call(&self, args: &[String], stdin: &str) -> Result<String> {
        (self.0)(args.to_vec(), stdin.to_string()).await
    }
}

/// Wrap an async closure as a [`CallbackCommand`].
pub fn callback_fn<F, Fut>(f: F) -> SharedCallback
where
    F: Fn(Vec<String>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    Arc::new(FnCallback(f))
}

/// What a resolver hands back for a command.
#[derive(Clone)]
pub enum FetchedCommand {
    /// Raw executable (WASM) bytes
    Binary(Vec<u8>),
    /// Host-implemented command
    Callback(SharedCallback),
    /// Structured descriptor
    Options(CommandOptions),
}

impl FetchedCommand {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchedCommand::Binary(_) => "binary",
            FetchedCommand::Callback(_) => "callback",
            FetchedCommand::Options(_) => "options",
        }
    }
}

impl fmt::Debug for FetchedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchedCommand::Binary(bytes) => f
                .debug_tuple("Binary")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            FetchedCommand::Callback(_) => f.write_str("Callback(..)"),
            FetchedCommand::Options(options) => f.debug_tuple("Options").field(options).finish(),
        }
    }
}

/// Locates the program for a command invocation.
///
/// This is the sole extensibility point for plugging in how commands are
/// found and run. Implementations must be shareable across tasks.
#[async_trait]
pub trait CommandResolver: Send + Sync {
    /// Resolve a command request.
    async fn fetch_command(&self, request: &CommandRequest) -> Result<FetchedCommand>;
}

/// Shared handle to a command resolver.
pub type SharedResolver = Arc<dyn CommandResolver>;

struct FnResolver<F>(F);

#[async_trait]
impl<F, Fut> CommandResolver for FnResolver<F>
where
    F: Fn(CommandRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FetchedCommand>> + Send + 'static,
{
    async fn fetch_command(&self, request: &CommandRequest) -> Result<FetchedCommand> {
        (self.0)(request.clone()).await
    }
}

/// Wrap an async closure as a [`CommandResolver`].
///
/// # Example
/// ```
/// use wasm_terminal_core::{resolver_fn, FetchedCommand};
///
/// let resolver = resolver_fn(|_request| async { Ok(FetchedCommand::Binary(vec![0, 97, 115, 109])) });
/// # let _ = resolver;
/// ```
pub fn resolver_fn<F, Fut>(f: F) -> SharedResolver
where
    F: Fn(CommandRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FetchedCommand>> + Send + 'static,
{
    Arc::new(FnResolver(f))
}
