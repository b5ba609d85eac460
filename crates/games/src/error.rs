//! Error types for game collection operations.

use gameshelf_store::StoreError;

use crate::types::Platform;

/// Errors produced by [`GameLibrary`](crate::GameLibrary) operations.
#[derive(Debug, thiserror::Error)]
pub enum GamesError {
    #[error("game name required")]
    EmptyName,

    #[error("game not found: {name} ({platform})")]
    NotFound { name: String, platform: Platform },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GamesError {
    /// Returns `true` if the operation was refused because of its input.
    ///
    /// These are reported to the user; anything else is an I/O failure.
    pub fn is_validation(&self) -> bool {
        match self {
            GamesError::EmptyName | GamesError::NotFound { .. } => true,
            GamesError::Store(e) => e.is_validation(),
        }
    }
}
