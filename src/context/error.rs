use super::ContextType;
use std::{io, path::PathBuf};
use thiserror::Error;

pub type ContextResult<T> = Result<T, ContextError>;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Unable to determine configuration directory")]
    MissingConfigDir,
    #[error("could not find context \"{0}\"")]
    NotFound(String),
    /// Message shape used by removal, kept distinct from [`ContextError::NotFound`].
    #[error("context {0} not found")]
    RemoveNotFound(String),
    #[error("context \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("no current context set for type \"{0}\"")]
    NoCurrentContext(ContextType),
    #[error("invalid context \"{name}\": {reason}")]
    InvalidContext { name: String, reason: String },
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write config file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("failed to lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContextError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::RemoveNotFound(_))
    }
}
