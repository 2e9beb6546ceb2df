use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PickerState, PlayerState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::{self, Candidate, TrackId, classify, parse_drop_text};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_state: PlayerState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_state: app.state,
        }
    }
}

/// Main terminal event loop: handles input (keys and pasted drops), UI
/// drawing, sync with the audio thread and MPRIS. Returns `Ok(())` when
/// shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Reconcile with the audio thread: bind failures, natural ends and
        // exact pause positions all surface here.
        sync_playback(app);

        // Keep MPRIS in sync even when playback changes come from the audio
        // thread rather than a key press.
        if app.state != state.last_mpris_state {
            update_mpris(mpris, app);
            state.last_mpris_state = app.state;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(key, settings, app, audio_player, mpris, state)? {
                        break;
                    }
                }
                // Terminal drag-and-drop arrives as a bracketed paste of the
                // dropped paths.
                Event::Paste(text) => {
                    state.pending_gg = false;
                    if app.entry_mode {
                        for c in text.chars().filter(|c| !c.is_control()) {
                            app.push_entry_char(c);
                        }
                    } else {
                        ingest_text(app, &text);
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Pull the audio thread's published state into the app model.
fn sync_playback(app: &mut App) {
    // Clone the Arc handle to avoid borrowing `app` immutably across mutations.
    let Some(handle) = app.playback_handle.as_ref().cloned() else {
        return;
    };
    let (failure, snapshot) = match handle.lock() {
        Ok(mut info) => (info.error.take(), info.clone()),
        Err(_) => return,
    };

    if let Some(message) = failure {
        app.playback_failed(message);
        return;
    }
    app.observe_playback(&snapshot);
}

/// Parse dropped or typed text into candidates and ingest them; the cursor
/// follows a successful ingestion.
fn ingest_text(app: &mut App, text: &str) {
    let batch = classify(parse_drop_text(text));
    if batch.is_empty() {
        return;
    }
    if app.ingest(batch).is_some() {
        app.select_last();
    }
}

/// Run a Play transition for `id` and hand the resulting bind order to the
/// audio thread.
fn dispatch_play(app: &mut App, audio_player: &AudioPlayer, id: TrackId) {
    if let Some(req) = app.play(id) {
        let _ = audio_player.send(AudioCmd::Play {
            track_id: req.track_id,
            path: req.path,
            start_at: req.start_at,
        });
    }
}

/// Run a Pause transition, capturing the last published position as the
/// resume offset. The offset is refreshed to the exact position once the
/// audio thread acknowledges the pause.
fn dispatch_pause(app: &mut App, audio_player: &AudioPlayer) {
    let position = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|info| info.elapsed))
        .unwrap_or(Duration::ZERO);
    app.pause(position);
    let _ = audio_player.send(AudioCmd::Pause);
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match app.state {
            PlayerState::Paused { track, .. } => {
                dispatch_play(app, audio_player, track);
                update_mpris(mpris, app);
            }
            PlayerState::Idle => {
                if let Some(id) = app.selected_track_id() {
                    dispatch_play(app, audio_player, id);
                    update_mpris(mpris, app);
                }
            }
            PlayerState::Playing { .. } => {}
        },
        ControlCmd::Pause => {
            if matches!(app.state, PlayerState::Playing { .. }) {
                dispatch_pause(app, audio_player);
                update_mpris(mpris, app);
            }
        }
        ControlCmd::PlayPause => {
            match app.state {
                PlayerState::Playing { .. } => dispatch_pause(app, audio_player),
                PlayerState::Paused { track, .. } => dispatch_play(app, audio_player, track),
                PlayerState::Idle => {
                    if let Some(id) = app.selected_track_id() {
                        dispatch_play(app, audio_player, id);
                    }
                }
            }
            update_mpris(mpris, app);
        }
        ControlCmd::Stop => {
            app.reset_playback();
            let _ = audio_player.send(AudioCmd::Reset);
            update_mpris(mpris, app);
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.picker.is_some() {
        state.pending_gg = false;
        handle_picker_key(key, settings, app);
        return Ok(false);
    }

    if app.entry_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.exit_entry_mode(),
            KeyCode::Backspace => app.pop_entry_char(),
            KeyCode::Enter => {
                let text = app.take_entry();
                ingest_text(app, &text);
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_entry_char(c);
                }
            }
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('a') => {
            state.pending_gg = false;
            app.enter_entry_mode();
        }
        KeyCode::Char('o') => {
            state.pending_gg = false;
            open_picker(app, picker_start_dir(settings), &settings.ingest);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.set_selected(0);
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter | KeyCode::Char('p') => {
            state.pending_gg = false;
            if let Some(id) = app.selected_track_id() {
                if app.play_enabled(id) {
                    dispatch_play(app, audio_player, id);
                    update_mpris(mpris, app);
                }
            }
        }
        KeyCode::Char(' ') => {
            state.pending_gg = false;
            if let Some(id) = app.selected_track_id() {
                if app.pause_enabled(id) {
                    dispatch_pause(app, audio_player);
                    update_mpris(mpris, app);
                }
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            state.pending_gg = false;
            if let Some(id) = app.selected_track_id() {
                app.delete(id);
                // Delete always resets the shared surface, active or not.
                let _ = audio_player.send(AudioCmd::Reset);
                update_mpris(mpris, app);
            }
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}

/// Directory the picker opens in: configured, else the working directory.
fn picker_start_dir(settings: &config::Settings) -> PathBuf {
    settings
        .ingest
        .picker_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn open_picker(app: &mut App, dir: PathBuf, settings: &config::IngestSettings) {
    let entries = library::list_dir(&dir, settings);
    app.picker = Some(PickerState::new(dir, entries));
}

fn handle_picker_key(key: KeyEvent, settings: &config::Settings, app: &mut App) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('o') => {
            app.picker = None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(p) = app.picker.as_mut() {
                p.next();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(p) = app.picker.as_mut() {
                p.prev();
            }
        }
        KeyCode::Backspace | KeyCode::Char('h') => {
            let parent = app
                .picker
                .as_ref()
                .and_then(|p| p.dir.parent().map(|d| d.to_path_buf()));
            if let Some(dir) = parent {
                open_picker(app, dir, &settings.ingest);
            }
        }
        KeyCode::Enter | KeyCode::Char('l') => {
            let Some(entry) = app.picker.as_ref().and_then(|p| p.selected_entry()).cloned() else {
                return;
            };
            if entry.is_dir {
                open_picker(app, entry.path, &settings.ingest);
            } else {
                app.picker = None;
                let batch = classify(vec![Candidate::from_path(entry.path)]);
                if app.ingest(batch).is_some() {
                    app.select_last();
                }
            }
        }
        _ => {}
    }
}
