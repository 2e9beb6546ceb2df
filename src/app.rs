//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track list, the
//! playback state machine and the widget state driving the page.

mod model;

pub use model::*;
