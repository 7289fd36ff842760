//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by the quiz flow service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlowError {
    #[error("no session for token")]
    SessionNotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
