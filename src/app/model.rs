//! Application model types: `App`, `PlayerState` and the picker overlay.
//!
//! The `App` struct owns the ordered track list and the playback state
//! machine; every user-visible behavior (row affordances, the error banner,
//! the now-playing indicator) is derived from it.

use std::path::PathBuf;
use std::time::Duration;

use crate::audio::{PlaybackHandle, PlaybackInfo};
use crate::library::{self, Batch, PickerEntry, Track, TrackId};

/// Playback state of the shared surface, as the component sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No active track.
    Idle,
    /// Output running for the active track.
    Playing { track: TrackId },
    /// Output suspended. `resume_at` is the last known position, captured at
    /// pause time and refreshed from the audio thread while the same track
    /// stays bound.
    Paused { track: TrackId, resume_at: Duration },
}

/// A bind order for the audio thread, produced by a Play transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindRequest {
    pub track_id: TrackId,
    pub path: PathBuf,
    pub start_at: Duration,
}

/// State of the file-picker overlay.
pub struct PickerState {
    pub dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub selected: usize,
}

impl PickerState {
    pub fn new(dir: PathBuf, entries: Vec<PickerEntry>) -> Self {
        Self {
            dir,
            entries,
            selected: 0,
        }
    }

    /// Move the picker cursor down (clamped).
    pub fn next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Move the picker cursor up (clamped).
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_entry(&self) -> Option<&PickerEntry> {
        self.entries.get(self.selected)
    }
}

/// The main application model.
pub struct App {
    /// Ingested tracks, in insertion order.
    pub tracks: Vec<Track>,
    pub selected: usize,
    pub state: PlayerState,
    /// Ingestion error banner; set by a rejection, cleared by the next
    /// successful ingestion.
    pub error: Option<String>,
    /// Most recent playback failure, shown on the status line until the next
    /// play.
    pub playback_alert: Option<String>,
    pub playback_handle: Option<PlaybackHandle>,

    /// Path-entry line in the drop zone.
    pub entry_mode: bool,
    pub entry: String,

    /// File-picker overlay; `None` while closed.
    pub picker: Option<PickerState>,

    /// A bind sent to the audio thread but not yet observed; guards against
    /// misreading an unbound surface as a natural end.
    pending_bind: Option<TrackId>,

    next_track_id: u64,
}

impl App {
    /// Create a new `App` with an empty track list.
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            selected: 0,
            state: PlayerState::Idle,
            error: None,
            playback_alert: None,
            playback_handle: None,
            entry_mode: false,
            entry: String::new(),
            picker: None,
            pending_bind: None,
            next_track_id: 1,
        }
    }

    /// Attach a `PlaybackHandle` used to observe the audio thread.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Return true if the list contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Id of the active track (the one bound to the surface), if any.
    pub fn active_track_id(&self) -> Option<TrackId> {
        match self.state {
            PlayerState::Idle => None,
            PlayerState::Playing { track } | PlayerState::Paused { track, .. } => Some(track),
        }
    }

    /// The active track; the now-playing indicator shows exactly while this
    /// is `Some`.
    pub fn now_playing(&self) -> Option<&Track> {
        self.active_track_id().and_then(|id| self.track(id))
    }

    pub fn selected_track_id(&self) -> Option<TrackId> {
        self.tracks.get(self.selected).map(|t| t.id)
    }

    /// Ingest a classified batch.
    ///
    /// With at least one accepted entry, a track built from the first one is
    /// appended (the rest are ignored) and the error banner is cleared. With
    /// no accepted but at least one rejected entry, the banner is replaced
    /// with a rejection message naming the first rejected entry's declared
    /// type. An empty batch changes nothing.
    pub fn ingest(&mut self, batch: Batch) -> Option<TrackId> {
        if let Some(first) = batch.accepted.into_iter().next() {
            let id = self.alloc_track_id();
            let probe = library::probe(&first.path);
            self.tracks.push(Track {
                id,
                path: first.path,
                // Accepted entries always carry a declared audio type.
                mime: first.mime.unwrap_or("audio/*"),
                name: first.name,
                title: probe.title,
                duration: probe.duration,
            });
            self.error = None;
            return Some(id);
        }

        if let Some(first) = batch.rejected.first() {
            self.error = Some(format!(
                "Invalid file type '{}'. Only audio files are accepted.",
                first.mime.unwrap_or("")
            ));
        }
        None
    }

    fn alloc_track_id(&mut self) -> TrackId {
        let id = TrackId(self.next_track_id);
        self.next_track_id += 1;
        id
    }

    /// Play the given row's track: a fresh bind at zero, or a re-bind at the
    /// captured offset when resuming the paused track. Returns the bind
    /// order for the audio thread, or `None` when the id is not in the list.
    pub fn play(&mut self, id: TrackId) -> Option<BindRequest> {
        let track = self.track(id)?;
        let path = track.path.clone();

        let start_at = match self.state {
            PlayerState::Paused { track, resume_at } if track == id => resume_at,
            _ => Duration::ZERO,
        };

        self.state = PlayerState::Playing { track: id };
        self.pending_bind = Some(id);
        self.playback_alert = None;
        Some(BindRequest {
            track_id: id,
            path,
            start_at,
        })
    }

    /// Pause the active track, capturing `position` (the last known playback
    /// position) as the resume offset. No-op unless playing.
    pub fn pause(&mut self, position: Duration) {
        if let PlayerState::Playing { track } = self.state {
            self.state = PlayerState::Paused {
                track,
                resume_at: position,
            };
        }
    }

    /// The media layer finished the active track on its own.
    pub fn natural_end(&mut self) {
        if matches!(self.state, PlayerState::Playing { .. }) {
            self.state = PlayerState::Idle;
            self.pending_bind = None;
        }
    }

    /// Delete a track by id. Removing an id that is not in the list leaves
    /// the list untouched, but playback resets to idle either way; the
    /// caller must also reset the audio surface.
    pub fn delete(&mut self, id: TrackId) {
        self.tracks.retain(|t| t.id != id);
        if self.selected >= self.tracks.len() {
            self.selected = self.tracks.len().saturating_sub(1);
        }
        self.reset_playback();
    }

    /// Force the machine to idle (the delete and remote-stop effect).
    pub fn reset_playback(&mut self) {
        self.state = PlayerState::Idle;
        self.pending_bind = None;
    }

    /// A bind failure reported by the audio thread: the surface is no longer
    /// bound, so the machine idles and the failure is shown on the status
    /// line until the next play.
    pub fn playback_failed(&mut self, message: String) {
        self.state = PlayerState::Idle;
        self.pending_bind = None;
        self.playback_alert = Some(message);
    }

    /// Play is disabled exactly while this row's track is playing.
    pub fn play_enabled(&self, id: TrackId) -> bool {
        !matches!(self.state, PlayerState::Playing { track } if track == id)
    }

    /// Pause is disabled exactly while this row's track is not playing.
    pub fn pause_enabled(&self, id: TrackId) -> bool {
        matches!(self.state, PlayerState::Playing { track } if track == id)
    }

    /// Reconcile the machine with what the audio thread reports: clear the
    /// pending-bind guard once the bind shows up, map a drained surface to a
    /// natural end, and refresh a paused offset to the exact position the
    /// thread paused at.
    pub fn observe_playback(&mut self, info: &PlaybackInfo) {
        if let Some(pending) = self.pending_bind {
            if info.track_id == Some(pending) {
                self.pending_bind = None;
            }
        }

        match self.state {
            PlayerState::Playing { .. } => {
                if self.pending_bind.is_none() && info.track_id.is_none() && !info.playing {
                    self.natural_end();
                }
            }
            PlayerState::Paused { track, resume_at } => {
                if info.track_id == Some(track) && !info.playing && info.elapsed != resume_at {
                    self.state = PlayerState::Paused {
                        track,
                        resume_at: info.elapsed,
                    };
                }
            }
            PlayerState::Idle => {}
        }
    }

    /// Move the cursor to the next row (clamped).
    pub fn next(&mut self) {
        if self.selected + 1 < self.tracks.len() {
            self.selected += 1;
        }
    }

    /// Move the cursor to the previous row (clamped).
    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Set the selected row index (clamped to the list).
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.tracks.len().saturating_sub(1));
    }

    /// Move the cursor to the newest row; selection follows ingestion.
    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Open the path-entry line in the drop zone.
    pub fn enter_entry_mode(&mut self) {
        self.entry_mode = true;
        self.entry.clear();
    }

    /// Close the path-entry line, discarding its content.
    pub fn exit_entry_mode(&mut self) {
        self.entry_mode = false;
        self.entry.clear();
    }

    /// Append a character to the entry line.
    pub fn push_entry_char(&mut self, c: char) {
        self.entry.push(c);
    }

    /// Remove the last character from the entry line.
    pub fn pop_entry_char(&mut self) {
        self.entry.pop();
    }

    /// Take the entry line's content for submission, closing the line.
    pub fn take_entry(&mut self) -> String {
        self.entry_mode = false;
        std::mem::take(&mut self.entry)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
