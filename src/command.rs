use std::io::Write;
use std::process::{Command, Stdio};

use crate::entry::Entry;
use crate::error::WalkError;
use crate::traits::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandToken {
    Text(String),
    /// Replaced with the entry's path.
    Placeholder,
}

/// A parsed `! cmd` template.
///
/// An unescaped `%` is replaced by the entry's path, `\%` becomes a literal
/// `%`. Every other character, backslashes included, is copied verbatim.
///
/// ```rust
/// use pwalk::CommandTemplate;
///
/// assert_eq!(CommandTemplate::parse("echo %").expand("a/b"), "echo a/b");
/// assert_eq!(CommandTemplate::parse(r"echo \%").expand("a/b"), "echo %");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<CommandToken>,
}

#[derive(Clone, Copy)]
enum LexState {
    Normal,
    Backslash,
}

impl CommandTemplate {
    pub fn parse(template: &str) -> Self {
        let mut tokens = Vec::new();
        let mut text = String::new();
        let mut state = LexState::Normal;

        for c in template.chars() {
            state = match (state, c) {
                (LexState::Normal, '%') => {
                    if !text.is_empty() {
                        tokens.push(CommandToken::Text(std::mem::take(&mut text)));
                    }
                    tokens.push(CommandToken::Placeholder);
                    LexState::Normal
                }
                (LexState::Normal, '\\') => LexState::Backslash,
                (LexState::Normal, c) => {
                    text.push(c);
                    LexState::Normal
                }
                (LexState::Backslash, '%') => {
                    text.push('%');
                    LexState::Normal
                }
                // An escaped backslash cannot escape what follows it.
                (LexState::Backslash, '\\') => {
                    text.push_str("\\\\");
                    LexState::Normal
                }
                (LexState::Backslash, c) => {
                    text.push('\\');
                    text.push(c);
                    LexState::Normal
                }
            };
        }
        if let LexState::Backslash = state {
            text.push('\\');
        }
        if !text.is_empty() {
            tokens.push(CommandToken::Text(text));
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[CommandToken] {
        &self.tokens
    }

    /// Substitute `path` for every placeholder.
    pub fn expand(&self, path: &str) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                CommandToken::Text(text) => out.push_str(text),
                CommandToken::Placeholder => out.push_str(path),
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// CommandRunner
// ---------------------------------------------------------------------------

#[cfg(unix)]
const SHELL: (&str, &str) = ("/bin/sh", "-c");

#[cfg(not(unix))]
const SHELL: (&str, &str) = ("cmd", "/C");

/// Runs the expanded template through the system shell once per entry.
///
/// The command's stdout is captured and copied to the walk's output sink;
/// stderr goes straight through. Stdin is `/dev/null`.
pub struct CommandRunner {
    template: CommandTemplate,
    shell:    (String, String),
}

impl CommandRunner {
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            shell: (SHELL.0.to_string(), SHELL.1.to_string()),
        }
    }

    /// Use a different shell, e.g. `("bash", "-c")`.
    pub fn with_shell(mut self, program: impl Into<String>, flag: impl Into<String>) -> Self {
        self.shell = (program.into(), flag.into());
        self
    }
}

impl Action for CommandRunner {
    fn apply(&mut self, entry: &Entry, out: &mut dyn Write) -> Result<(), WalkError> {
        let command = self.template.expand(&entry.path.to_string_lossy());

        let output = Command::new(&self.shell.0)
            .arg(&self.shell.1)
            .arg(&command)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| WalkError::CommandLaunch {
                command: command.clone(),
                source,
            })?;

        // Whatever the command printed before failing is still forwarded.
        out.write_all(&output.stdout)
            .map_err(|source| WalkError::Io {
                path: entry.path.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(WalkError::CommandFailed {
                command,
                status: output.status,
            })
        }
    }
}
