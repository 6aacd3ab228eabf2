use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/switchtune/config.toml` or `~/.config/switchtune/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SWITCHTUNE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub input: InputSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Root directory scanned for audio files. A leading `~` expands to `$HOME`.
    pub directory: String,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Only keep files whose contents the format prober recognizes.
    pub probe_content: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            directory: "~/Music/parents".to_string(),
            extensions: ["mp3", "wav", "ogg", "flac", "m4a", "aac"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
            probe_content: false,
        }
    }
}

impl LibrarySettings {
    /// `directory` with a leading `~` expanded against `$HOME`.
    pub fn resolved_directory(&self) -> PathBuf {
        expand_home(&self.directory, std::env::var_os("HOME").map(PathBuf::from))
    }
}

pub(crate) fn expand_home(raw: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(raw);
    };
    if raw == "~" {
        home
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the player is checked for end of track while playing (milliseconds).
    pub poll_interval_ms: u64,
    /// Fixed seed for the shuffle RNG. Unset means OS entropy.
    pub shuffle_seed: Option<u64>,
    /// After a reshuffle, never start the new cycle with the track that just played.
    pub avoid_immediate_repeat: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            shuffle_seed: None,
            avoid_immediate_repeat: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when shutting down (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    /// Physical switch on a Raspberry Pi GPIO line.
    Gpio,
    /// Lines on stdin: `on`, `off`, or empty to toggle.
    #[serde(alias = "stdin", alias = "keyboard")]
    Console,
}

impl Default for InputKind {
    fn default() -> Self {
        if cfg!(feature = "gpio") {
            Self::Gpio
        } else {
            Self::Console
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub kind: InputKind,
    /// BCM pin number of the switch line.
    pub pin: u8,
    /// The switch pulls the line to ground when ON (internal pull-up enabled).
    pub active_low: bool,
    /// A level must hold this long before it counts (milliseconds).
    pub debounce_ms: u64,
    /// Sampling period of the line (milliseconds).
    pub sample_ms: u64,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            kind: InputKind::default(),
            pin: 17,
            active_low: true,
            debounce_ms: 20,
            sample_ms: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
