//! Application-level configuration loading, including gameplay limits.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MEMORY_MATCH_CONFIG_PATH";

const DEFAULT_MAX_LEVEL: u32 = 100;
const DEFAULT_MAX_CARDS: usize = 128;
const DEFAULT_GAMES_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Highest level a progress save may claim.
    pub max_level: u32,
    /// Longest accepted card sequence in a progress save.
    pub max_cards: usize,
    /// Cap on one page of the completed-games listing.
    pub games_page_size: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        max_level = app_config.max_level,
                        max_cards = app_config.max_cards,
                        "loaded gameplay limits from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            max_cards: DEFAULT_MAX_CARDS,
            games_page_size: DEFAULT_GAMES_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    max_level: Option<u32>,
    max_cards: Option<usize>,
    games_page_size: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            max_level: value.max_level.unwrap_or(defaults.max_level),
            max_cards: value.max_cards.unwrap_or(defaults.max_cards),
            games_page_size: value.games_page_size.unwrap_or(defaults.games_page_size),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
