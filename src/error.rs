//! Error types for the view layer

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by post views
///
/// Missing records are never errors: accessors return `None` and an unresolved
/// view simply has no status. Only host failures and template failures end up here.
#[derive(Debug, Error)]
pub enum ViewError {
    /// A host store call failed
    #[error("Host error: {0}")]
    Host(#[from] anyhow::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<tera::Error> for ViewError {
    fn from(e: tera::Error) -> Self {
        // Tera nests the useful message in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        ViewError::Template(message)
    }
}

pub type ViewResult<T> = Result<T, ViewError>;
