//! The playback surface: one rodio sink on a dedicated thread, re-bound to a
//! fresh one-shot source on every play.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use sink::PlaybackError;
pub use types::*;
