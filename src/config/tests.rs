use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
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
fn resolve_config_path_prefers_staccato_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("STACCATO_CONFIG_PATH", "/tmp/staccato-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/staccato-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("staccato")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("staccato")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 123
fade_out_steps = 5

[ui]
header_text = "hello"
drop_hint_text = "drop here"
now_playing_time_fields = ["elapsed", "remaining"]
now_playing_time_separator = " | "

[ingest]
picker_dir = "/tmp/music"
include_hidden = true
picker_max_entries = 50
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("STACCATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("STACCATO__AUDIO__QUIT_FADE_OUT_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.audio.fade_out_steps, 5);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.drop_hint_text, "drop here");
    assert_eq!(s.ui.now_playing_time_fields.len(), 2);
    assert!(matches!(s.ui.now_playing_time_fields[0], TimeField::Elapsed));
    assert!(matches!(s.ui.now_playing_time_fields[1], TimeField::Remaining));
    assert_eq!(s.ui.now_playing_time_separator, " | ");
    assert_eq!(s.ingest.picker_dir.as_deref(), Some("/tmp/music"));
    assert!(s.ingest.include_hidden);
    assert_eq!(s.ingest.picker_max_entries, 50);
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("STACCATO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("STACCATO__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}

#[test]
fn untouched_sections_keep_their_defaults() {
    let s: Settings = toml::from_str(
        r#"
[ui]
header_text = "just the header"
"#,
    )
    .unwrap();

    assert_eq!(s.ui.header_text, "just the header");
    assert_eq!(s.audio.quit_fade_out_ms, 500);
    assert_eq!(s.audio.fade_out_steps, 20);
    assert!(s.ingest.picker_dir.is_none());
    assert!(!s.ingest.include_hidden);
}

#[test]
fn validate_rejects_zero_step_and_zero_cap() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.fade_out_steps = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ingest.picker_max_entries = 0;
    assert!(s.validate().is_err());
}
