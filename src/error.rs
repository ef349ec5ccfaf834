use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalkError {
    // Usage
    #[error("invalid range {0:?}")]
    InvalidRange(String),

    #[error("{0}")]
    Usage(String),

    // Roots
    #[error("{}: path not found", .0.display())]
    NotFound(PathBuf),

    #[error("{}: invalid source", .0.display())]
    InvalidSource(PathBuf),

    // Traversal
    #[error("{}: permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: symlink loop", .0.display())]
    SymlinkLoop(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Dispatch
    #[error("{command}: could not start shell: {source}")]
    CommandLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {status}")]
    CommandFailed { command: String, status: ExitStatus },

    // Third-party extensibility
    #[error("source error: {0}")]
    Source(String),
}

impl WalkError {
    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::InvalidSource(p)
            | Self::SymlinkLoop(p)
            | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether the walk can continue after this error.
    ///
    /// Recoverable errors skip a subtree, an entry or one command run and are
    /// collected into [`Results::errors`](crate::Results::errors).
    ///
    /// Usage errors and root-level failures (missing or unusable root) are
    /// not recoverable and make the binary exit nonzero.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_)
                | Self::SymlinkLoop(_)
                | Self::Io { .. }
                | Self::CommandLaunch { .. }
                | Self::CommandFailed { .. }
                | Self::Source(_)
        )
    }
}
