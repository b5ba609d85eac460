//! Game library: save, list and delete over the `games` table.

use std::path::{Path, PathBuf};

use gameshelf_store::{SchemaStatus, Table};
use tracing::{debug, info};

use crate::error::GamesError;
use crate::types::{Format, GameRecord, Platform, PlatformFilter};

/// The game collection, backed by one table file.
#[derive(Debug, Clone)]
pub struct GameLibrary {
    table: Table<GameRecord>,
}

impl GameLibrary {
    /// Opens the library stored at `path`. The file is not read until used.
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
    pub fn ensure_schema(&self) -> Result<SchemaStatus, GamesError> {
        Ok(self.table.ensure_schema()?)
    }

    /// Returns every game on the selected platform(s), in file order.
    pub fn list(&self, filter: PlatformFilter) -> Result<Vec<GameRecord>, GamesError> {
        let games: Vec<GameRecord> = self
            .table
            .list_where(|game| filter.accepts(game))?
            .collect();
        debug!(?filter, count = games.len(), "listed games");
        Ok(games)
    }

    /// Adds a game to the collection.
    ///
    /// The name is stored exactly as given; only an empty name is refused.
    pub fn save(
        &self,
        name: &str,
        platform: Platform,
        format: Format,
    ) -> Result<GameRecord, GamesError> {
        if name.is_empty() {
            return Err(GamesError::EmptyName);
        }

        let game = GameRecord::new(name, platform, format);
        self.table.append(&game)?;
        info!(%platform, %format, "saved game");
        Ok(game)
    }

    /// Deletes every entry with this name on this platform.
    ///
    /// Duplicates are removed together. Returns how many rows went away, or
    /// [`GamesError::NotFound`] if none matched.
    pub fn delete(&self, name: &str, platform: Platform) -> Result<usize, GamesError> {
        let removed = self
            .table
            .delete_matching(|game| game.is(name, platform))?;

        if removed == 0 {
            return Err(GamesError::NotFound {
                name: name.to_string(),
                platform,
            });
        }
        Ok(removed)
    }
}
