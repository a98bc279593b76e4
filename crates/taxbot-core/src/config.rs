use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_PREFIX: &str = "-";

/// The persisted bot configuration.
///
/// On disk this is a single JSON object:
/// `{ "token": "...", "prefix": "-", "taxChannels": { "<chatId>": true } }`.
/// A chat id is a tax channel iff it is present in the map; there is no third
/// state. The sorted map keeps rewrites deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    pub tax_channels: BTreeMap<String, bool>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            tax_channels: BTreeMap::new(),
        }
    }
}

impl BotConfig {
    pub fn is_tax_channel(&self, channel_id: &str) -> bool {
        self.tax_channels.get(channel_id).copied().unwrap_or(false)
    }

    pub fn tax_channel_ids(&self) -> impl Iterator<Item = &str> {
        self.tax_channels.keys().map(String::as_str)
    }
}

/// Owns the configuration and its on-disk location.
///
/// Single-process, single-writer: every mutation rewrites the whole file
/// before the operation is considered complete, so memory and disk never
/// disagree across a restart.
pub struct ConfigStore {
    path: PathBuf,
    config: BotConfig,
}

/// Result of the startup load gate.
pub enum LoadOutcome {
    Loaded(ConfigStore),
    /// No config file existed; defaults were written so an operator can fill
    /// in the token. The process should print guidance and exit.
    Initialized(PathBuf),
}

impl ConfigStore {
    /// Load the config file, or write a default one if it does not exist.
    ///
    /// A file that exists but does not parse is an error, not a first run.
    pub fn load_or_init(path: &Path) -> Result<LoadOutcome> {
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                config: BotConfig::default(),
            };
            store.save()?;
            return Ok(LoadOutcome::Initialized(store.path));
        }

        let raw = fs::read_to_string(path)?;
        let config: BotConfig = serde_json::from_str(&raw)?;
        Ok(LoadOutcome::Loaded(Self {
            path: path.to_path_buf(),
            config,
        }))
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full in-memory config and overwrite the file.
    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.config)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    /// Register a chat as a tax channel and persist. Idempotent.
    pub fn set_tax_channel(&mut self, channel_id: &str) -> Result<()> {
        self.config
            .tax_channels
            .insert(channel_id.to_string(), true);
        self.save()
    }

    /// Unregister a chat and persist. Returns `false` (and skips the write)
    /// if it was not registered.
    pub fn clear_tax_channel(&mut self, channel_id: &str) -> Result<bool> {
        if self.config.tax_channels.remove(channel_id).is_none() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }
}

/// Config file location: `TAXBOT_CONFIG`, or `config.json` in the working
/// directory.
pub fn config_path() -> PathBuf {
    env::var_os("TAXBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"))
}
