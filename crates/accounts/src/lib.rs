//! Local accounts: the `users` table, registration and the login check.
//!
//! A successful login yields a [`Session`] value. Callers keep it for as
//! long as the user is logged in and pass it to whatever needs the
//! username; there is no global login state.

pub mod book;
pub mod error;
pub mod types;

// Re-export primary types for convenience.
pub use book::AccountBook;
pub use error::AccountsError;
pub use types::{Session, UserRecord};
