use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/staccato/config.toml` or `~/.config/staccato/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `STACCATO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub ingest: IngestSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio: AudioSettings::default(),
            ui: UiSettings::default(),
            ingest: IngestSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Number of steps used to fade the volume (higher = smoother, more CPU).
    pub fade_out_steps: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
            fade_out_steps: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top "staccato" header box.
    pub header_text: String,

    /// Hint shown in the drop zone while the path-entry line is closed.
    pub drop_hint_text: String,

    /// Which time fields to show next to the now-playing name, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ short and detached: one track at a time ~ ".to_string(),
            drop_hint_text:
                "Drag an audio file onto this terminal, press [a] to type a path, or [o] to browse"
                    .to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Directory the picker opens in; defaults to the current directory.
    pub picker_dir: Option<String>,
    /// Whether the picker lists hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Cap on entries listed per directory in the picker.
    pub picker_max_entries: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            picker_dir: None,
            include_hidden: false,
            picker_max_entries: 500,
        }
    }
}
