use std::path::PathBuf;
use std::time::Duration;

/// Identifier of an ingested track, assigned when the track enters the list.
/// Allocation is monotonic, so ids are never reused after a delete.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    /// Declared media type, derived from the file extension at ingest time.
    pub mime: &'static str,
    /// Display name: the file name including its extension.
    pub name: String,
    /// Tag title when the payload had readable tags; rows always show `name`.
    pub title: Option<String>,
    pub duration: Option<Duration>,
}
