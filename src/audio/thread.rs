use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        // The single shared surface: at most one sink, serially re-bound.
        let mut sink: Option<Sink> = None;
        let mut paused = true;

        // Track start time and accumulated elapsed when paused.
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        fn do_stop(
            sink: &mut Option<Sink>,
            paused: &mut bool,
            started_at: &mut Option<Instant>,
            accumulated: &mut Duration,
            playback_info: &PlaybackHandle,
        ) {
            if let Some(s) = sink.as_ref() {
                s.stop();
            }
            *sink = None;
            *paused = true;
            *started_at = None;
            *accumulated = Duration::ZERO;
            if let Ok(mut info) = playback_info.lock() {
                info.track_id = None;
                info.elapsed = Duration::ZERO;
                info.playing = false;
            }
        }

        fn fade_out_sink(sink: &Sink, fade_out_ms: u64, steps: u64) {
            if fade_out_ms == 0 {
                sink.set_volume(0.0);
                return;
            }
            let steps = steps.max(1);
            let step_ms = (fade_out_ms / steps).max(1);
            sink.set_volume(1.0);
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                sink.set_volume(1.0 - t);
                thread::sleep(Duration::from_millis(step_ms));
            }
            sink.set_volume(0.0);
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play {
                        track_id,
                        path,
                        start_at,
                    } => {
                        // Last-writer-wins on the shared surface.
                        if let Some(s) = sink.take() {
                            s.stop();
                        }

                        match create_sink_at(&stream, &path, start_at) {
                            Ok(new_sink) => {
                                new_sink.set_volume(1.0);
                                new_sink.play();
                                sink = Some(new_sink);
                                paused = false;
                                started_at = Some(Instant::now());
                                accumulated = start_at;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.track_id = Some(track_id);
                                    info.elapsed = start_at;
                                    info.playing = true;
                                }
                            }
                            Err(e) => {
                                do_stop(
                                    &mut sink,
                                    &mut paused,
                                    &mut started_at,
                                    &mut accumulated,
                                    &playback_info,
                                );
                                if let Ok(mut info) = playback_info.lock() {
                                    info.error = Some(e.to_string());
                                }
                            }
                        }
                    }

                    AudioCmd::Pause => {
                        if let Some(ref s) = sink {
                            if !paused {
                                s.pause();
                                if let Some(st) = started_at.take() {
                                    accumulated += st.elapsed();
                                }
                                paused = true;
                                if let Ok(mut info) = playback_info.lock() {
                                    info.playing = false;
                                    // Exact pause position; the UI refreshes its
                                    // captured resume offset from this.
                                    info.elapsed = accumulated;
                                }
                            }
                        }
                    }

                    AudioCmd::Reset => {
                        do_stop(
                            &mut sink,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                    }

                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = sink {
                            // Fade out gently before stopping.
                            fade_out_sink(s, fade_out_ms, audio_settings.fade_out_steps);
                            s.stop();
                        }
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        if let Ok(mut info) = playback_info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    // Periodic tick: detect the natural end of the bound source
                    // and keep the shared elapsed exact.
                    if sink.is_none() || paused {
                        continue;
                    }
                    let ended = sink.as_ref().map(|s| s.empty()).unwrap_or(false);
                    if ended {
                        do_stop(
                            &mut sink,
                            &mut paused,
                            &mut started_at,
                            &mut accumulated,
                            &playback_info,
                        );
                    } else {
                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        if let Ok(mut info) = playback_info.lock() {
                            info.elapsed = elapsed;
                        }
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
