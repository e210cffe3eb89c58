use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// Names of the key-value slots used by each part of the app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub expenses: String,
    pub monthly_goal: String,
    pub savings_goal: String,
    pub family: String,
    pub snapshots: String,
    pub users: String,
    pub session: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            expenses: "meus_gastos_v1".into(),
            monthly_goal: "meta_mensal_v1".into(),
            savings_goal: "meta_poupanca_v1".into(),
            family: "familia_financas_v1".into(),
            snapshots: "familia_snapshots_v1".into(),
            users: "ff_users_v1".into(),
            session: "ff_logged_v1".into(),
        }
    }
}

impl StorageKeys {
    /// Every slot key, for up-front validation against a store.
    pub fn all(&self) -> [&str; 7] {
        [
            self.expenses.as_str(),
            self.monthly_goal.as_str(),
            self.savings_goal.as_str(),
            self.family.as_str(),
            self.snapshots.as_str(),
            self.users.as_str(),
            self.session.as_str(),
        ]
    }
}

/// Native database mirror settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    pub enabled: bool,
    /// SQLite file name, relative to the data directory
    pub database_file: String,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            database_file: "familia_financeira.db".into(),
        }
    }
}

/// Argon2id parameters for password hashing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 19456 = 19 MB)
    pub memory_cost: u32,
    /// Number of iterations (default: 2)
    pub time_cost: u32,
    /// Degree of parallelism (default: 1)
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// Application settings, read from a JSON file. Every field has a default,
/// so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the key-value files (and the mirror database)
    pub data_dir: Option<PathBuf>,

    pub keys: StorageKeys,

    pub mirror: MirrorSettings,

    pub kdf: KdfParams,

    /// How many expenses "recent" listings show
    pub recent_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            keys: StorageKeys::default(),
            mirror: MirrorSettings::default(),
            kdf: KdfParams::default(),
            recent_limit: 5,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings as pretty JSON, creating parent directories.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize settings: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
