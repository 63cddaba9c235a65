//! Configuration file handling.
//!
//! Loads `.typed_cursor.json` from the current directory. Both sections are
//! optional:
//!
//! ```json
//! {
//!   "database": { "type": "sqlite", "path": "./rows.sqlite" },
//!   "conversion": { "encoding": "utf-16le", "byte_order": "little-endian" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::ConverterConfig;
use crate::db::DatabaseConfig;

pub const CONFIG_FILE_NAME: &str = ".typed_cursor.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfigFile>,

    /// Settings for the type converter used by every cursor the app opens.
    #[serde(default)]
    pub conversion: ConverterConfig,
}

/// Database section, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfigFile {
    Sqlite { path: PathBuf },
    Memory,
}

impl From<&DatabaseConfigFile> for DatabaseConfig {
    fn from(file: &DatabaseConfigFile) -> Self {
        match file {
            DatabaseConfigFile::Sqlite { path } => DatabaseConfig::Sqlite { path: path.clone() },
            DatabaseConfigFile::Memory => DatabaseConfig::Memory,
        }
    }
}

impl ConfigFile {
    /// Load `.typed_cursor.json` from the current directory, if present.
    pub fn load() -> Result<Option<Self>, Box<dyn Error>> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    /// Load a configuration file. A missing file is `Ok(None)`; an unreadable
    /// or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>, Box<dyn Error>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
        Ok(Some(config))
    }
}

/// Pick the database to open.
///
/// Priority: explicit `--db` value > config file > `DATABASE_URL` > default file.
pub fn resolve_database(
    explicit: Option<&str>,
    config: Option<&ConfigFile>,
) -> Result<DatabaseConfig, Box<dyn Error>> {
    if let Some(url) = explicit {
        return Ok(DatabaseConfig::from_url(url)?);
    }

    if let Some(database) = config.and_then(|c| c.database.as_ref()) {
        return Ok(database.into());
    }

    if let Some(from_env) = DatabaseConfig::from_env()? {
        return Ok(from_env);
    }

    Ok(DatabaseConfig::default())
}
