use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_switchtune_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SWITCHTUNE_CONFIG_PATH", "/tmp/switchtune-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/switchtune-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("switchtune")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("switchtune")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_reference_setup() {
    let s = Settings::default();
    assert_eq!(s.library.directory, "~/Music/parents");
    assert_eq!(
        s.library.extensions,
        vec!["mp3", "wav", "ogg", "flac", "m4a", "aac"]
    );
    assert!(s.library.recursive);
    assert_eq!(s.playback.poll_interval_ms, 500);
    assert!(!s.playback.avoid_immediate_repeat);
    assert_eq!(s.input.pin, 17);
    assert!(s.input.active_low);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert!(s.validate().is_ok());
}

#[test]
fn expand_home_handles_tilde_forms() {
    let home = Some(PathBuf::from("/home/pi"));
    assert_eq!(
        expand_home("~/Music/parents", home.clone()),
        PathBuf::from("/home/pi/Music/parents")
    );
    assert_eq!(expand_home("~", home.clone()), PathBuf::from("/home/pi"));
    assert_eq!(expand_home("/srv/music", home.clone()), PathBuf::from("/srv/music"));
    assert_eq!(expand_home("~other/x", home), PathBuf::from("~other/x"));
    assert_eq!(expand_home("~/x", None), PathBuf::from("~/x"));
}

#[test]
fn validate_rejects_zero_intervals_and_empty_extensions() {
    let mut s = Settings::default();
    s.playback.poll_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.input.sample_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec![" . ".to_string(), String::new()];
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[library]
directory = "/srv/music"
extensions = ["mp3", "opus"]
recursive = false
include_hidden = false
follow_links = false
probe_content = true

[playback]
poll_interval_ms = 250
shuffle_seed = 42
avoid_immediate_repeat = true

[audio]
quit_fade_out_ms = 300

[input]
kind = "stdin"
pin = 27
active_low = false
debounce_ms = 50

[log]
filter = "switchtune=debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SWITCHTUNE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SWITCHTUNE__PLAYBACK__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.library.directory, "/srv/music");
    assert_eq!(s.library.extensions, vec!["mp3".to_string(), "opus".to_string()]);
    assert!(!s.library.recursive);
    assert!(!s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert!(s.library.probe_content);
    assert_eq!(s.playback.poll_interval_ms, 250);
    assert_eq!(s.playback.shuffle_seed, Some(42));
    assert!(s.playback.avoid_immediate_repeat);
    assert_eq!(s.audio.quit_fade_out_ms, 300);
    assert_eq!(s.input.kind, InputKind::Console);
    assert_eq!(s.input.pin, 27);
    assert!(!s.input.active_low);
    assert_eq!(s.input.debounce_ms, 50);
    assert_eq!(s.input.sample_ms, 5);
    assert_eq!(s.log.filter, "switchtune=debug");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SWITCHTUNE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SWITCHTUNE__PLAYBACK__POLL_INTERVAL_MS", "1000");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.poll_interval_ms, 1000);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let _lock = env_lock();
    let _g = EnvGuard::remove("SWITCHTUNE__PLAYBACK__POLL_INTERVAL_MS");

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(s.playback.poll_interval_ms, 500);
    assert_eq!(s.library.directory, "~/Music/parents");

    let s = Settings::load_from(None).unwrap();
    assert_eq!(s.input.pin, 17);
}
