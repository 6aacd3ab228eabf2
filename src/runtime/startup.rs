use std::path::{Path, PathBuf};

use crate::config::{self, LibrarySettings};
use crate::library::load_playlist;
use crate::playlist::ShuffledPlaylist;

/// The directory to scan: the command-line override if given, else the configured one.
pub fn music_dir(library: &LibrarySettings, arg: Option<String>) -> PathBuf {
    match arg {
        Some(dir) => LibrarySettings {
            directory: dir,
            ..library.clone()
        }
        .resolved_directory(),
        None => library.resolved_directory(),
    }
}

/// Scan `dir` and shuffle the result into the startup playlist.
pub fn build_playlist(settings: &config::Settings, dir: &Path) -> ShuffledPlaylist {
    let tracks = load_playlist(dir, &settings.library);
    let mut playlist = ShuffledPlaylist::new(settings.playback.shuffle_seed)
        .with_avoid_immediate_repeat(settings.playback.avoid_immediate_repeat);
    playlist.rebuild(tracks);
    playlist
}
