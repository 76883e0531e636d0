use std::fmt;

use thiserror::Error;

/// Unified error type for buoy operations
#[derive(Error, Debug)]
pub enum BuoyError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("no domain provided")]
    NoDomain,

    #[error("invalid ruleset, please select one of: [{}]", crate::domain::RulesetType::names().join(", "))]
    InvalidRuleset,

    #[error("invalid go.work: {0}")]
    InvalidGowork(String),

    #[error("invalid go.mod: {0}")]
    InvalidGomod(String),

    #[error("no go.mod found from {0}")]
    NoGomod(String),

    #[error("Import resolution failed: {0}")]
    Import(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

/// Convenience type alias for Results in buoy
pub type Result<T> = std::result::Result<T, BuoyError>;

/// Coarse classification of a [`BuoyError`].
///
/// Callers match on the kind instead of the message, so "not ready yet" can be
/// told apart from "something broke".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed manifest, version or configuration
    Parse,
    /// Network, git remote or filesystem failure
    Io,
    /// Missing or invalid domain/ruleset input
    Input,
    /// No workspace descriptor could be used
    Workspace,
    /// Dependencies are present but not resolvable under the ruleset
    Dependency,
}

impl BuoyError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BuoyError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        BuoyError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        BuoyError::Manifest(msg.into())
    }

    /// Create an import resolution error with context
    pub fn import(msg: impl Into<String>) -> Self {
        BuoyError::Import(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        BuoyError::Remote(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BuoyError::Config(_) | BuoyError::Version(_) | BuoyError::Manifest(_) => {
                ErrorKind::Parse
            }
            BuoyError::Git(_)
            | BuoyError::Http(_)
            | BuoyError::Io(_)
            | BuoyError::Import(_)
            | BuoyError::Remote(_) => ErrorKind::Io,
            BuoyError::NoDomain | BuoyError::InvalidRuleset => ErrorKind::Input,
            BuoyError::InvalidGowork(_) | BuoyError::InvalidGomod(_) | BuoyError::NoGomod(_) => {
                ErrorKind::Workspace
            }
            BuoyError::Dependency(_) => ErrorKind::Dependency,
        }
    }

    /// Whether this error reports dependencies that are not ready for a release.
    pub fn is_dependency_error(&self) -> bool {
        self.kind() == ErrorKind::Dependency
    }

    /// The readiness report carried by this error, if any.
    pub fn as_dependency_error(&self) -> Option<&DependencyError> {
        match self {
            BuoyError::Dependency(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of a failed readiness check: the module and every dependency that
/// has no usable ref under the requested ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyError {
    pub module: String,
    pub dependencies: Vec<String>,
}

impl fmt::Display for DependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} not ready for release because of the following dependencies [{}]",
            self.module,
            self.dependencies.join(", ")
        )
    }
}

impl std::error::Error for DependencyError {}
