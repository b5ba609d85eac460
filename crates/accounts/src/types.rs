//! User rows and the login session.

use std::fmt;

use gameshelf_store::{Record, RecordError, Schema};

/// One row of the `users` table. The password is stored in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Record for UserRecord {
    const SCHEMA: Schema = Schema {
        name: "users",
        columns: &["Username", "Password"],
        required: &["Username", "Password"],
    };

    fn fields(&self) -> Vec<&str> {
        vec![self.username.as_str(), self.password.as_str()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordError> {
        Ok(Self::new(fields[0], fields[1]))
    }
}

/// An authenticated user, held by the caller until logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    /// Name the user logged in with.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Ends the session, returning the username.
    pub fn logout(self) -> String {
        tracing::info!(username = %self.username, "logged out");
        self.username
    }
}
