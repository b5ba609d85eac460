//! Account book: registration and login over the `users` table.
//!
//! This is a local, single-user gate: passwords are compared in plaintext,
//! case-sensitively, with an ordinary string comparison. Usernames are
//! unique only because [`AccountBook::register`] checks before appending;
//! the table itself does not enforce it.

use std::path::{Path, PathBuf};

use gameshelf_store::line::DELIMITER;
use gameshelf_store::{SchemaStatus, Table};
use tracing::{debug, info};

use crate::error::AccountsError;
use crate::types::{Session, UserRecord};

/// Registered users, backed by one table file.
#[derive(Debug, Clone)]
pub struct AccountBook {
    table: Table<UserRecord>,
}

impl AccountBook {
    /// Opens the account book stored at `path`. The file is not read until used.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            table: Table::new(path),
        }
    }

    /// Path of the backing table file.
    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// Creates the table or repairs its header.
    pub fn ensure_schema(&self) -> Result<SchemaStatus, AccountsError> {
        Ok(self.table.ensure_schema()?)
    }

    /// Checks credentials against the table.
    ///
    /// Surrounding whitespace is trimmed from both inputs. Succeeds on the
    /// first row where username and password both match exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Session, AccountsError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AccountsError::MissingCredentials);
        }

        let found = self
            .table
            .find_first(|user| user.username == username && user.password == password)?;

        match found {
            Some(user) => {
                info!(username = %user.username, "logged in");
                Ok(Session::new(user.username))
            }
            None => {
                debug!(username, "login rejected");
                Err(AccountsError::InvalidCredentials)
            }
        }
    }

    /// Registers a new user.
    ///
    /// Inputs are trimmed. All three must be non-empty, neither username nor
    /// password may contain the field delimiter, `password` must equal
    /// `confirm`, and no existing row may carry the same username. On any
    /// failure the table is left untouched.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), AccountsError> {
        let username = username.trim();
        let password = password.trim();
        let confirm = confirm.trim();
        if username.is_empty() || password.is_empty() || confirm.is_empty() {
            return Err(AccountsError::MissingCredentials);
        }
        if username.contains(DELIMITER) || password.contains(DELIMITER) {
            return Err(AccountsError::DelimiterInCredentials);
        }
        if password != confirm {
            return Err(AccountsError::PasswordMismatch);
        }

        if self
            .table
            .find_first(|user| user.username == username)?
            .is_some()
        {
            return Err(AccountsError::DuplicateUsername(username.to_string()));
        }

        self.table.append(&UserRecord::new(username, password))?;
        info!(username, "registered user");
        Ok(())
    }

    /// Number of readable user rows.
    pub fn user_count(&self) -> Result<usize, AccountsError> {
        Ok(self.table.list_all()?.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> (tempfile::TempDir, AccountBook) {
        let tmp = tempfile::tempdir().unwrap();
        let book = AccountBook::open(tmp.path().join("users.csv"));
        book.ensure_schema().unwrap();
        (tmp, book)
    }

    #[test]
    fn alice_scenario() {
        let (_tmp, book) = book();

        book.register("alice", "pw1", "pw1").unwrap();
        assert!(matches!(
            book.register("alice", "pw2", "pw2"),
            Err(AccountsError::DuplicateUsername(name)) if name == "alice"
        ));

        let session = book.authenticate("alice", "pw1").unwrap();
        assert_eq!(session.username(), "alice");

        assert!(matches!(
            book.authenticate("alice", "pw2"),
            Err(AccountsError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_registration_leaves_table_unchanged() {
        let (_tmp, book) = book();
        book.register("alice", "pw1", "pw1").unwrap();
        let before = std::fs::read_to_string(book.path()).unwrap();

        assert!(book.register("alice", "other", "other").is_err());

        assert_eq!(book.user_count().unwrap(), 1);
        assert_eq!(std::fs::read_to_string(book.path()).unwrap(), before);
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let (_tmp, book) = book();
        book.register("alice", "pw1", "pw1").unwrap();
        book.register("Alice", "pw2", "pw2").unwrap();

        assert_eq!(book.user_count().unwrap(), 2);
        assert!(book.authenticate("ALICE", "pw1").is_err());
        assert_eq!(book.authenticate("Alice", "pw2").unwrap().username(), "Alice");
    }

    #[test]
    fn register_requires_all_fields() {
        let (_tmp, book) = book();
        for (u, p, c) in [("", "pw", "pw"), ("bob", "", "pw"), ("bob", "pw", "  ")] {
            assert!(matches!(
                book.register(u, p, c),
                Err(AccountsError::MissingCredentials)
            ));
        }
        assert_eq!(book.user_count().unwrap(), 0);
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let (_tmp, book) = book();
        let err = book.register("bob", "pw1", "pw2").unwrap_err();
        assert!(matches!(err, AccountsError::PasswordMismatch));
        assert!(err.is_validation());
        assert_eq!(book.user_count().unwrap(), 0);
    }

    #[test]
    fn inputs_are_trimmed() {
        let (_tmp, book) = book();
        book.register("  carol ", " secret", "secret ").unwrap();
        assert_eq!(
            std::fs::read_to_string(book.path()).unwrap(),
            "Username,Password\ncarol,secret\n"
        );
        assert!(book.authenticate(" carol", "secret  ").is_ok());
    }

    #[test]
    fn register_rejects_delimiter_in_credentials() {
        let (_tmp, book) = book();
        for (u, p) in [("alice", "p,w"), ("al,ice", "pw")] {
            let err = book.register(u, p, p).unwrap_err();
            assert!(matches!(err, AccountsError::DelimiterInCredentials));
            assert!(err.is_validation());
        }
        assert_eq!(
            std::fs::read_to_string(book.path()).unwrap(),
            "Username,Password\n"
        );
    }

    #[test]
    fn wide_user_row_never_authenticates() {
        let (_tmp, book) = book();
        std::fs::write(book.path(), "Username,Password\nalice,p,w\n").unwrap();

        assert!(matches!(
            book.authenticate("alice", "p"),
            Err(AccountsError::InvalidCredentials)
        ));
        assert!(matches!(
            book.authenticate("alice", "p,w"),
            Err(AccountsError::InvalidCredentials)
        ));
        assert_eq!(book.user_count().unwrap(), 0);
    }

    #[test]
    fn authenticate_requires_both_fields() {
        let (_tmp, book) = book();
        assert!(matches!(
            book.authenticate("alice", " "),
            Err(AccountsError::MissingCredentials)
        ));
    }

    #[test]
    fn authenticate_unknown_user_fails() {
        let (_tmp, book) = book();
        assert!(matches!(
            book.authenticate("nobody", "pw"),
            Err(AccountsError::InvalidCredentials)
        ));
    }

    #[test]
    fn authenticate_uses_first_matching_row() {
        let (_tmp, book) = book();
        std::fs::write(
            book.path(),
            "Username,Password\ndave,old\ndave,new\n",
        )
        .unwrap();

        assert!(book.authenticate("dave", "old").is_ok());
        assert!(book.authenticate("dave", "new").is_ok());
        assert!(matches!(
            book.register("dave", "x", "x"),
            Err(AccountsError::DuplicateUsername(_))
        ));
    }

    #[test]
    fn missing_table_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let book = AccountBook::open(tmp.path().join("users.csv"));
        let err = book.authenticate("alice", "pw1").unwrap_err();
        assert!(matches!(err, AccountsError::Store(_)));
        assert!(!err.is_validation());
    }
}
