//! Startup: open the tables, run the schema migration once, hand over to
//! the menus.

use std::io;

use gameshelf_accounts::AccountBook;
use gameshelf_games::GameLibrary;
use gameshelf_store::SchemaStatus;

use crate::config::Config;
use crate::menu::Menu;

/// The tables the menus operate on.
#[derive(Debug, Clone)]
pub struct Shelf {
    pub games: GameLibrary,
    /// `None` when the login gate is disabled.
    pub accounts: Option<AccountBook>,
}

impl Shelf {
    /// Builds table handles from the configuration. Touches nothing on disk.
    pub fn open(config: &Config) -> Self {
        let accounts = config
            .require_login
            .then(|| AccountBook::open(config.users_path()));
        Self {
            games: GameLibrary::open(config.games_path()),
            accounts,
        }
    }

    /// Creates missing tables and repairs wrong headers.
    ///
    /// Returns the outcome per table name.
    pub fn migrate(&self) -> anyhow::Result<Vec<(&'static str, SchemaStatus)>> {
        let mut report = vec![("games", self.games.ensure_schema()?)];
        if let Some(accounts) = &self.accounts {
            report.push(("users", accounts.ensure_schema()?));
        }

        for (table, status) in &report {
            match status {
                SchemaStatus::Valid => tracing::debug!(table, %status, "schema check"),
                _ => tracing::info!(table, %status, "schema check"),
            }
        }
        Ok(report)
    }
}

/// Runs the application on the process's stdin/stdout.
pub fn run(config: Config) -> anyhow::Result<()> {
    let shelf = Shelf::open(&config);
    shelf.migrate()?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Menu::new(&shelf, stdin, stdout).run()
}
