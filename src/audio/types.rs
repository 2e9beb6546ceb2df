//! Audio-related small types and handles.
//!
//! This module defines the command enum sent to the audio thread and the
//! shared playback info the UI reads back.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::TrackId;

#[derive(Debug)]
pub enum AudioCmd {
    /// Bind the playback surface to a payload and start output at `start_at`.
    /// Every bind derives a fresh source, including resume-from-pause.
    Play {
        track_id: TrackId,
        path: PathBuf,
        start_at: Duration,
    },
    /// Suspend output, keeping the surface bound.
    Pause,
    /// Stop output and clear the surface (delete, remote stop).
    Reset,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Track currently bound to the surface (if any).
    pub track_id: Option<TrackId>,
    /// Elapsed playback time for the bound track.
    pub elapsed: Duration,
    /// Whether output is currently running.
    pub playing: bool,
    /// Most recent bind failure, waiting to be taken by the UI.
    pub error: Option<String>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            track_id: None,
            elapsed: Duration::ZERO,
            playing: false,
            error: None,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
