//! Terminal configuration.
//!
//! [`TerminalConfigRecord`] is what callers fill in, possibly partially.
//! [`TerminalConfig::new`] is the single boundary where that record is
//! checked and turned into a configuration a terminal runtime can rely on.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::{CommandRequest, CommandResolver, FetchedCommand, SharedResolver};
use crate::fs::{MemoryFs, SharedFs, VirtualFs};
use crate::{Error, Result};

/// Caller-supplied configuration for a terminal, every field optional.
#[derive(Clone, Default)]
pub struct TerminalConfigRecord {
    /// Resolver used to fetch commands (required)
    pub command_resolver: Option<SharedResolver>,
    /// URL where process workers are launched
    pub worker_endpoint: Option<String>,
    /// Filesystem shared with the running programs
    pub filesystem: Option<SharedFs>,
}

impl TerminalConfigRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command resolver.
    pub fn command_resolver(mut self, resolver: SharedResolver) -> Self {
        self.command_resolver = Some(resolver);
        self
    }

    /// Set the process worker endpoint.
    pub fn worker_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.worker_endpoint = Some(endpoint.into());
        self
    }

    /// Set the filesystem handle.
    pub fn filesystem(mut self, fs: SharedFs) -> Self {
        self.filesystem = Some(fs);
        self
    }
}

impl fmt::Debug for TerminalConfigRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalConfigRecord")
            .field("command_resolver", &self.command_resolver.is_some())
            .field("worker_endpoint", &self.worker_endpoint)
            .field("filesystem", &self.filesystem.is_some())
            .finish()
    }
}

/// Validated configuration for one terminal session.
///
/// The resolver and the filesystem are fixed for the lifetime of the value.
#[derive(Clone)]
pub struct TerminalConfig {
    command_resolver: SharedResolver,
    worker_endpoint: Option<String>,
    filesystem: SharedFs,
}

impl TerminalConfig {
    /// Validate a configuration record.
    ///
    /// # Errors
    /// * [`Error::MissingConfig`] if `record` is `None`
    /// * [`Error::MissingCommandResolver`] if the record has no resolver
    ///
    /// A missing or blank worker endpoint is only logged as a warning. A missing
    /// filesystem is replaced by a fresh, empty [`MemoryFs`].
    pub fn new(record: Option<TerminalConfigRecord>) -> Result<Self> {
        match record {
            Some(record) => Self::from_record(&record),
            None => Err(Error::MissingConfig),
        }
    }

    /// Validate a borrowed record. The record itself is left untouched.
    pub fn from_record(record: &TerminalConfigRecord) -> Result<Self> {
        let command_resolver = record
            .command_resolver
            .clone()
            .ok_or(Error::MissingCommandResolver)?;

        let worker_endpoint = record
            .worker_endpoint
            .clone()
            .filter(|endpoint| !endpoint.trim().is_empty());
        if worker_endpoint.is_none() {
            warn!(
                "No process worker endpoint configured; programs that need process workers will not work"
            );
        }

        let filesystem = match &record.filesystem {
            Some(fs) => Arc::clone(fs),
            None => {
                debug!("No filesystem supplied, creating an empty in-memory filesystem");
                MemoryFs::shared()
            }
        };

        Ok(Self {
            command_resolver,
            worker_endpoint,
            filesystem,
        })
    }

    /// The command resolver.
    pub fn command_resolver(&self) -> &SharedResolver {
        &self.command_resolver
    }

    /// The process worker endpoint, if configured.
    pub fn worker_endpoint(&self) -> Option<&str> {
        self.worker_endpoint.as_deref()
    }

    /// The filesystem handle.
    pub fn filesystem(&self) -> &SharedFs {
        &self.filesystem
    }

    /// Borrow the filesystem as a trait object.
    pub fn fs(&self) -> &dyn VirtualFs {
        self.filesystem.as_ref()
    }

    /// Whether programs that need process workers can run.
    pub fn supports_process_workers(&self) -> bool {
        self.worker_endpoint.is_some()
    }

    /// Resolve a command through the configured resolver.
    pub async fn fetch_command(&self, request: &CommandRequest) -> Result<FetchedCommand> {
        debug!("Fetching command: args={:?}", request.args);
        self.command_resolver.fetch_command(request).await
    }
}

impl fmt::Debug for TerminalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalConfig")
            .field("worker_endpoint", &self.worker_endpoint)
            .finish_non_exhaustive()
    }
}
