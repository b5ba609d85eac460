//! Domain types for the game collection.

use std::fmt;
use std::str::FromStr;

use gameshelf_store::{Record, RecordError, Schema};
use serde::{Deserialize, Serialize};

/// Platform a game is owned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "PC")]
    Pc,
    Xbox,
    PlayStation,
    Nintendo,
    Other,
}

impl Platform {
    /// All platforms, in menu order.
    pub const ALL: [Platform; 5] = [
        Platform::Pc,
        Platform::Xbox,
        Platform::PlayStation,
        Platform::Nintendo,
        Platform::Other,
    ];

    /// Value as stored in the `Platform` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::Xbox => "Xbox",
            Platform::PlayStation => "PlayStation",
            Platform::Nintendo => "Nintendo",
            Platform::Other => "Other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RecordError;

    /// Parses a stored value. Matching is exact, as in the file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| RecordError::InvalidValue {
                column: "Platform",
                value: s.into(),
            })
    }
}

/// Whether a copy is on a disc/cartridge or a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Physical,
    Digital,
}

impl Format {
    /// All formats, in menu order.
    pub const ALL: [Format; 2] = [Format::Physical, Format::Digital];

    /// Value as stored in the `Format` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Physical => "Physical",
            Format::Digital => "Digital",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| RecordError::InvalidValue {
                column: "Format",
                value: s.into(),
            })
    }
}

/// One row of the `games` table.
///
/// There is no id: `(name, platform)` identifies a row for deletion and is
/// not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub name: String,
    pub platform: Platform,
    pub format: Format,
}

impl GameRecord {
    pub fn new(name: impl Into<String>, platform: Platform, format: Format) -> Self {
        Self {
            name: name.into(),
            platform,
            format,
        }
    }

    /// Returns `true` if this row is identified by `(name, platform)`.
    pub fn is(&self, name: &str, platform: Platform) -> bool {
        self.name == name && self.platform == platform
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.name, self.platform, self.format)
    }
}

impl Record for GameRecord {
    const SCHEMA: Schema = Schema {
        name: "games",
        columns: &["Name", "Platform", "Format"],
        required: &["Name"],
    };

    fn fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.platform.as_str(), self.format.as_str()]
    }

    fn from_fields(fields: &[&str]) -> Result<Self, RecordError> {
        Ok(Self {
            name: fields[0].to_string(),
            platform: fields[1].parse()?,
            format: fields[2].parse()?,
        })
    }
}

/// Platform selection for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    /// Returns `true` if `game` passes the filter.
    pub fn accepts(&self, game: &GameRecord) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(platform) => game.platform == *platform,
        }
    }
}

impl From<Platform> for PlatformFilter {
    fn from(platform: Platform) -> Self {
        PlatformFilter::Only(platform)
    }
}
