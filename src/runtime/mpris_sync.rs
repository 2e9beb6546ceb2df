use crate::app::{App, PlayerState};
use crate::mpris::{MprisHandle, PlaybackStatus};

/// Push the app's playback state and active-track metadata to MPRIS.
pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let status = match app.state {
        PlayerState::Idle => PlaybackStatus::Stopped,
        PlayerState::Playing { .. } => PlaybackStatus::Playing,
        PlayerState::Paused { .. } => PlaybackStatus::Paused,
    };

    mpris.set_track_metadata(app.active_track_id(), app.now_playing());
    mpris.set_playback(status);
}
