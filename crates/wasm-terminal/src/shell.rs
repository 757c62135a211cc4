//! Line-oriented shell on top of a [`TerminalConfig`].
//!
//! The shell resolves each command through the configured resolver. Callback
//! commands run in-process; binaries and option descriptors are reported as
//! the hand-off the execution runtime would receive.

use std::collections::HashMap;

use tracing::{debug, warn};

use wasm_terminal_core::{
    CallbackCommand, CommandRequest, Error, FetchedCommand, Result, TerminalConfig, VirtualFs,
};

/// A parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    /// Program name followed by its arguments
    pub args: Vec<String>,
    /// Virtual file read as standard input (`< path`)
    pub stdin_path: Option<String>,
    /// Virtual file receiving standard output (`> path`)
    pub stdout_path: Option<String>,
}

impl CommandLine {
    /// Parse a line into arguments and redirections.
    ///
    /// Single and double quotes group words; `<` and `>` must be separate
    /// unquoted words followed by a path.
    pub fn parse(line: &str) -> Result<Self> {
        let words = split_words(line)?;
        let mut parsed = CommandLine::default();
        let mut iter = words.into_iter();

        while let Some((word, quoted)) = iter.next() {
            if quoted || (word != "<" && word != ">") {
                parsed.args.push(word);
                continue;
            }
            let (path, _) = iter
                .next()
                .ok_or_else(|| Error::InvalidCommand(format!("missing path after '{word}'")))?;
            if word == "<" {
                parsed.stdin_path = Some(path);
            } else {
                parsed.stdout_path = Some(path);
            }
        }

        Ok(parsed)
    }

    /// Whether the line has nothing to run.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Split a line into words, flagging those that contained a quote.
fn split_words(line: &str) -> Result<Vec<(String, bool)>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                in_word = true;
                quoted = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push((std::mem::take(&mut current), quoted));
                    in_word = false;
                    quoted = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(Error::InvalidCommand(format!("unterminated quote {q}")));
    }
    if in_word {
        words.push((current, quoted));
    }
    Ok(words)
}

/// What running a line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutput {
    /// Output of a callback command (empty when redirected)
    Text(String),
    /// A WASM binary that the execution runtime would start
    Program {
        /// Program name
        name: String,
        /// Size of the binary
        bytes: usize,
    },
    /// A command-options descriptor for the execution runtime
    Options {
        /// Program name
        name: String,
        /// Arguments from the descriptor
        args: Vec<String>,
        /// Whether the descriptor carries a module
        has_module: bool,
    },
}

impl ShellOutput {
    /// Text to print to the terminal.
    pub fn render(&self) -> String {
        match self {
            ShellOutput::Text(text) => text.clone(),
            ShellOutput::Program { name, bytes } => {
                format!("{name}: {bytes} byte WASM binary ready for the runtime\n")
            }
            ShellOutput::Options {
                name,
                args,
                has_module,
            } => {
                let module = if *has_module { "with" } else { "without" };
                format!("{name}: command options {args:?} {module} module\n")
            }
        }
    }
}

/// Shell session state.
#[derive(Debug)]
pub struct Shell {
    config: TerminalConfig,
    env: HashMap<String, String>,
}

impl Shell {
    /// Create a shell with an empty environment.
    pub fn new(config: TerminalConfig) -> Self {
        Self {
            config,
            env: HashMap::new(),
        }
    }

    /// Set an environment variable passed with every request.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }

    /// The configuration this shell runs with.
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Run one line. Returns `None` for blank lines.
    pub async fn execute(&self, line: &str) -> Result<Option<ShellOutput>> {
        let command = CommandLine::parse(line)?;
        if command.is_empty() {
            return Ok(None);
        }

        let fs = self.config.fs();
        let stdin = match &command.stdin_path {
            Some(path) => String::from_utf8_lossy(&fs.read_file(path)?).into_owned(),
            None => String::new(),
        };

        let mut request = CommandRequest::new(command.args.clone());
        if !self.env.is_empty() {
            request = request.with_env(self.env.clone());
        }

        let fetched = self.config.fetch_command(&request).await?;
        debug!("'{}' resolved to {}", command.args[0], fetched.kind());
        let name = command.args[0].clone();

        let output = match fetched {
            FetchedCommand::Callback(callback) => {
                let out = callback.call(&command.args, &stdin).await?;
                ShellOutput::Text(out)
            }
            FetchedCommand::Binary(bytes) => {
                self.warn_without_workers(&name);
                ShellOutput::Program {
                    name,
                    bytes: bytes.len(),
                }
            }
            FetchedCommand::Options(options) => {
                self.warn_without_workers(&name);
                ShellOutput::Options {
                    name,
                    args: options.args,
                    has_module: options.module.is_some(),
                }
            }
        };

        match &command.stdout_path {
            Some(path) => {
                fs.write_file(path, output.render().as_bytes())?;
                Ok(Some(ShellOutput::Text(String::new())))
            }
            None => Ok(Some(output)),
        }
    }

    fn warn_without_workers(&self, name: &str) {
        if !self.config.supports_process_workers() {
            warn!(
                "'{}' may need process workers, but no worker endpoint is configured",
                name
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_words() {
        let line = CommandLine::parse("  echo  hello world ").unwrap();
        assert_eq!(line.args, vec!["echo", "hello", "world"]);
        assert_eq!(line.stdin_path, None);
        assert_eq!(line.stdout_path, None);
    }

    #[test]
    fn test_parse_quotes() {
        let line = CommandLine::parse(r#"echo "hello world" 'a "b"' """#).unwrap();
        assert_eq!(line.args, vec!["echo", "hello world", "a \"b\"", ""]);
    }

    #[test]
    fn test_parse_redirections() {
        let line = CommandLine::parse("cat < /in.txt > /out.txt").unwrap();
        assert_eq!(line.args, vec!["cat"]);
        assert_eq!(line.stdin_path.as_deref(), Some("/in.txt"));
        assert_eq!(line.stdout_path.as_deref(), Some("/out.txt"));
    }

    #[test]
    fn test_parse_quoted_operators_are_arguments() {
        let line = CommandLine::parse(r#"echo "<" x '>' y"#).unwrap();
        assert_eq!(line.args, vec!["echo", "<", "x", ">", "y"]);
        assert_eq!(line.stdin_path, None);
        assert_eq!(line.stdout_path, None);

        let line = CommandLine::parse(r#"cat < "my file""#).unwrap();
        assert_eq!(line.args, vec!["cat"]);
        assert_eq!(line.stdin_path.as_deref(), Some("my file"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CommandLine::parse("echo 'oops").is_err());
        assert!(CommandLine::parse("echo >").is_err());
    }

    #[test]
    fn test_parse_blank() {
        assert!(CommandLine::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_render_program() {
        let out = ShellOutput::Program {
            name: "cowsay".to_string(),
            bytes: 42,
        };
        assert_eq!(out.render(), "cowsay: 42 byte WASM binary ready for the runtime\n");
    }
}
