//! Track ingestion: the track model, media-type filtering and input parsing.
//!
//! Tracks enter the list through user-initiated drops (paths pasted onto the
//! terminal), the typed path entry line, or the picker overlay. This module
//! owns the `Track` type and everything needed to turn raw input into
//! classified ingestion batches.

mod ingest;
mod mime;
mod model;
mod picker;

pub use ingest::*;
pub use model::*;
pub use picker::*;

#[cfg(test)]
mod tests;
