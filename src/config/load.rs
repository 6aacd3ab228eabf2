use std::env;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

/// Prefix for overrides such as `SWITCHTUNE__INPUT__PIN=27`.
const ENV_PREFIX: &str = "SWITCHTUNE";
/// Points at a config file outside the XDG location.
const CONFIG_PATH_VAR: &str = "SWITCHTUNE_CONFIG_PATH";

impl Settings {
    /// Read the config file (if any), then apply `SWITCHTUNE__` environment
    /// overrides. Missing keys keep their defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(resolve_config_path().as_deref())
    }

    pub(super) fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = file.map(|p| File::from(p).required(false));
        Config::builder()
            .add_source(file_source.into_iter().collect::<Vec<_>>())
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            (
                self.playback.poll_interval_ms == 0,
                "playback.poll_interval_ms must be >= 1",
            ),
            (self.input.sample_ms == 0, "input.sample_ms must be >= 1"),
            (
                self.library
                    .extensions
                    .iter()
                    .all(|e| e.trim().trim_start_matches('.').is_empty()),
                "library.extensions must name at least one extension",
            ),
        ];
        match checks.iter().find(|(failed, _)| *failed) {
            Some((_, msg)) => Err((*msg).to_string()),
            None => Ok(()),
        }
    }
}

/// The file named by `SWITCHTUNE_CONFIG_PATH`, else the XDG default.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `$XDG_CONFIG_HOME/switchtune/config.toml`, or under `~/.config` without it.
pub fn default_config_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))
        .map(|dir| dir.join("switchtune").join("config.toml"))
}
