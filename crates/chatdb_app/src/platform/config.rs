//! Client configuration, read from a RON file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock setup: upload to the local endpoint, all page elements mounted,
//! overlapping requests resolved last-wins, no chat replies.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chatdb_core::{ElementId, OverlapPolicy, PageLayout};
use chatdb_engine::{ClientSettings, DEFAULT_API_BASE, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "chatdb.ron";
pub const DEFAULT_LOG_FILENAME: &str = "chatdb.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: Box<ron::error::SpannedError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapSetting {
    #[default]
    LastResolvedWins,
    LatestRequestWins,
}

impl From<OverlapSetting> for OverlapPolicy {
    fn from(setting: OverlapSetting) -> Self {
        match setting {
            OverlapSetting::LastResolvedWins => OverlapPolicy::LastResolvedWins,
            OverlapSetting::LatestRequestWins => OverlapPolicy::LatestRequestWins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Upload endpoint.
    pub endpoint: String,
    /// Prefix of the JSON routes: chat, explore, nl_to_sql, execute_query.
    pub api_base: String,
    /// Send every chat message to the chat route and show the bot's reply.
    pub chat_replies: bool,
    pub overlap: OverlapSetting,
    /// Page element ids to leave out, e.g. `["query-list"]`.
    pub unmounted: Vec<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: PathBuf,
    pub log_to_terminal: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            chat_replies: false,
            overlap: OverlapSetting::default(),
            unmounted: Vec::new(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILENAME),
            log_to_terminal: true,
        }
    }
}

impl AppConfig {
    /// Reads the config at `path`. A missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
        };
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path,
            source: Box::new(source),
        })
    }

    /// Builds the page layout, returning any unrecognized element ids.
    pub fn page_layout(&self) -> (PageLayout, Vec<String>) {
        let mut layout = PageLayout::full();
        let mut unknown = Vec::new();
        for id in &self.unmounted {
            match ElementId::from_dom_id(id) {
                Some(element) => layout = layout.without(element),
                None => unknown.push(id.clone()),
            }
        }
        (layout, unknown)
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            api_base: self.api_base.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ClientSettings::default()
        }
    }
}
