//! Deriving playable sources and sinks from track payloads.
//!
//! A decoded source is a one-shot resource: appending it to a `Sink`
//! consumes it, so every bind (first play, track switch, resume) derives a
//! fresh source from the payload on disk. `open_source` is that derivation
//! step and the only fallible part of a bind.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

/// A bind failure, reported back to the UI instead of tearing anything down.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot decode '{path}': {source}")]
    Decode {
        path: String,
        source: rodio::decoder::DecoderError,
    },
}

/// Derive a fresh one-shot source for `path`, skipped to `start_at`.
pub(super) fn open_source(
    path: &Path,
    start_at: Duration,
) -> Result<impl Source + Send + 'static, PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.display().to_string(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    // `skip_duration` is our positioning primitive; even Duration::ZERO is fine.
    Ok(decoder.skip_duration(start_at))
}

/// Create a paused `Sink` bound to a fresh source for `path` at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, PlaybackError> {
    let source = open_source(path, start_at)?;
    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
