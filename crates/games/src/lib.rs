//! Game collection: the `games` table and the operations the collection
//! views need.
//!
//! # Operations
//!
//! - **List**: all games, or those on one platform
//! - **Save**: append a game (name must be non-empty)
//! - **Delete**: remove every entry with a given name and platform

pub mod error;
pub mod library;
pub mod types;

// Re-export primary types for convenience.
pub use error::GamesError;
pub use library::GameLibrary;
pub use types::{Format, GameRecord, Platform, PlatformFilter};
