use std::{io, path::PathBuf};

use nix::unistd::Pid;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellError>;

/// Everything that can go wrong between reading a line and reaping its children.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Segment with no tokens. Never printed.
    #[error("empty command")]
    EmptyCommand,

    #[error("too many arguments: {count} given, at most {max} allowed")]
    TooManyArguments { count: usize, max: usize },

    #[error("chdir failed: {}: {source}", path.display())]
    ChangeDirectory { path: PathBuf, source: io::Error },

    #[error("chdir failed: missing directory operand")]
    MissingDirectory,

    #[error("exec failed: {program}: {source}")]
    Exec { program: String, source: io::Error },

    #[error("fork failed: {program}: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("wait failed for process {pid}: {source}")]
    Wait { pid: Pid, source: io::Error },

    #[error("unable to start watcher for background process {pid}: {source}")]
    Watcher { pid: Pid, source: io::Error },

    #[error("Unable to read command line: {0}")]
    ReadLine(#[source] io::Error),

    #[error("Failed to open input file {}: {source}", path.display())]
    InputOpen { path: PathBuf, source: io::Error },

    #[error("Failed to set new file as input {}: {source}", path.display())]
    InputRedirect { path: PathBuf, source: io::Error },

    #[error("usage: mysh [input-file]")]
    Usage,

    #[error("could not read config {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("could not parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ShellError {
    /// Environment-level faults that end the interpreter instead of a single command.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Spawn { .. }
                | ShellError::Watcher { .. }
                | ShellError::ReadLine(_)
                | ShellError::InputOpen { .. }
                | ShellError::InputRedirect { .. }
                | ShellError::Usage
        )
    }

    /// Process exit code used when this error terminates the interpreter.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShellError::InputOpen { .. } => 1,
            ShellError::InputRedirect { .. } => 2,
            ShellError::ReadLine(_) => 2,
            ShellError::Usage => 64,
            _ => 1,
        }
    }
}
