//! Error types for account operations.

use gameshelf_store::StoreError;

/// Errors produced by [`AccountBook`](crate::AccountBook) operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    #[error("please enter both username and password")]
    MissingCredentials,

    #[error("username and password may not contain ','")]
    DelimiterInCredentials,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountsError {
    /// Returns `true` if the request was refused because of its input.
    pub fn is_validation(&self) -> bool {
        match self {
            AccountsError::Store(e) => e.is_validation(),
            _ => true,
        }
    }
}
