use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::LibraryError;
use super::model::Track;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_audio_file(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn probe_ok(path: &Path) -> bool {
    match lofty::read_from_path(path) {
        Ok(_) => true,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping file that failed the content probe");
            false
        }
    }
}

/// Walk `dir` and collect every file whose extension is in `settings.extensions`.
///
/// Paths are absolute. Order follows the walk and carries no meaning.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Track>, LibraryError> {
    if !dir.is_dir() {
        return Err(LibraryError::DirectoryNotFound(dir.to_path_buf()));
    }
    let root = dir
        .canonicalize()
        .map_err(|_| LibraryError::DirectoryNotFound(dir.to_path_buf()))?;

    let exts = normalized_extensions(settings);
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(&root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_dir()
            && path.is_file()
            && is_audio_file(path, &exts)
            && (!settings.probe_content || probe_ok(path))
        {
            tracks.push(Track::new(path));
        }
    }

    Ok(tracks)
}

/// Scan the library for the startup playlist. A missing directory yields an empty list.
pub fn load_playlist(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    info!(dir = %dir.display(), "scanning for audio files");
    match scan(dir, settings) {
        Ok(tracks) if tracks.is_empty() => {
            warn!(dir = %dir.display(), "no audio files found");
            tracks
        }
        Ok(tracks) => {
            info!(count = tracks.len(), "found audio files");
            tracks
        }
        Err(e) => {
            warn!(error = %e, "continuing with an empty playlist");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn names(tracks: &[Track]) -> BTreeSet<String> {
        tracks.iter().map(Track::name).collect()
    }

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = normalized_extensions(&LibrarySettings::default());
        for name in ["a.mp3", "a.MP3", "a.flac", "a.wav", "a.Ogg", "a.m4a", "a.AAC"] {
            assert!(is_audio_file(Path::new(name), &exts), "{name}");
        }
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/mp3"), &exts));
    }

    #[test]
    fn extension_list_tolerates_dots_and_case() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), "  ".into(), " opus ".into()],
            ..LibrarySettings::default()
        };
        assert_eq!(normalized_extensions(&settings), vec!["mp3", "opus"]);
    }

    #[test]
    fn scan_keeps_only_audio_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("b.txt"), b"ignore me").unwrap();
        fs::write(dir.path().join("c.flac"), b"not a real flac").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(
            names(&tracks),
            BTreeSet::from(["a.mp3".to_string(), "c.flac".to_string()])
        );
    }

    #[test]
    fn scan_recurses_and_returns_absolute_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("x").join("album.flac");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("top.WAV"), b"").unwrap();
        fs::write(nested.join("deep.m4a"), b"").unwrap();
        fs::write(nested.join("cover.jpg"), b"").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default()).unwrap();
        assert_eq!(
            names(&tracks),
            BTreeSet::from(["top.WAV".to_string(), "deep.m4a".to_string()])
        );
        // Directory names that look like audio files never show up.
        assert!(tracks.iter().all(|t| t.path().is_absolute() && t.path().is_file()));
    }

    #[test]
    fn scan_missing_directory_is_directory_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        match scan(&missing, &LibrarySettings::default()) {
            Err(LibraryError::DirectoryNotFound(p)) => assert_eq!(p, missing),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn load_playlist_absorbs_missing_directory() {
        let tracks = load_playlist(
            &PathBuf::from("/definitely/not/here/switchtune"),
            &LibrarySettings::default(),
        );
        assert!(tracks.is_empty());
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings).unwrap();
        assert_eq!(names(&tracks), BTreeSet::from(["visible.mp3".to_string()]));
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings).unwrap();
        assert_eq!(names(&tracks), BTreeSet::from(["root.mp3".to_string()]));
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"").unwrap();
        fs::write(d1.join("one.mp3"), b"").unwrap();
        fs::write(d2.join("two.mp3"), b"").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings).unwrap();
        assert_eq!(
            names(&tracks),
            BTreeSet::from(["root.mp3".to_string(), "one.mp3".to_string()])
        );
    }
}
