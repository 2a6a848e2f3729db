use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Fatal at load time: the store or config cannot be served safely.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Bad per-request input; never reaches the embedder.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The embedding function failed or returned malformed output.
    #[error("Embedding failed: {0}")]
    Dependency(String),

    #[error("Store I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Stable classification reported to callers instead of raw error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConfigurationError,
    ValidationError,
    DependencyError,
    IoError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigurationError => "configuration_error",
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::DependencyError => "dependency_error",
            ErrorKind::IoError => "io_error",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::ConfigurationError,
            Error::Validation(_) => ErrorKind::ValidationError,
            Error::Dependency(_) => ErrorKind::DependencyError,
            Error::Io { .. } => ErrorKind::IoError,
        }
    }

    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io { path: path.display().to_string(), source }
    }

    /// Wrap an embedder failure, keeping the whole `anyhow` context chain.
    pub fn dependency(err: anyhow::Error) -> Self {
        Error::Dependency(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
