use thiserror::Error;

/// Unified result type for the shortcut shell crate.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors surfaced by the ordering engine and its runtime.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("item key must not be empty")]
    EmptyKey,
    #[error("item `{0}` registered more than once")]
    DuplicateKey(String),
    #[error("item `{0}` not found")]
    UnknownItem(String),
    #[error("navigation entry `{0}` not found")]
    UnknownNavEntry(String),
    #[error("commit rejected: {0}")]
    CommitMismatch(String),
    #[error("item `{0}` cannot be opened right now")]
    NotSelectable(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
