//! Turning user input into ingestion batches.
//!
//! A drop onto the terminal arrives as pasted text: one or more paths,
//! usually shell-quoted by the terminal emulator, sometimes as `file://`
//! URIs. `parse_drop_text` splits that text into candidate entries and
//! `classify` applies the audio-only media-type filter, producing the
//! accepted/rejected batch the app ingests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;

use super::mime;

/// One dropped, typed or picked file entry before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Display name: the file name including its extension, or the raw token
    /// when the path has no final component.
    pub name: String,
    /// Declared media type; `None` means no usable type (always rejected).
    pub mime: Option<&'static str>,
}

impl Candidate {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime::from_path(&path);
        Self { path, name, mime }
    }
}

/// A classified ingestion batch.
#[derive(Debug, Default)]
pub struct Batch {
    pub accepted: Vec<Candidate>,
    pub rejected: Vec<Candidate>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

/// Split dropped or pasted text into candidate entries.
///
/// Handles the quoting conventions terminals use when a file is dragged onto
/// them: whitespace-separated tokens, single or double quotes around paths
/// with spaces, backslash-escaped spaces, and `file://` URIs with `%XX`
/// escapes.
pub fn parse_drop_text(text: &str) -> Vec<Candidate> {
    tokenize(text)
        .into_iter()
        .map(|tok| Candidate::from_path(PathBuf::from(tok)))
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                } else {
                    current.push(c);
                }
            }
            None => match c {
                '\'' | '"' => quote = Some(c),
                '\\' => {
                    // Escaped character, typically a space in an unquoted path.
                    if let Some(&next) = chars.peek() {
                        current.push(next);
                        chars.next();
                    }
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens.iter().map(|t| strip_file_uri(t)).collect()
}

/// Reduce a `file://` URI to a plain path, decoding `%XX` escapes. Non-URI
/// tokens pass through unchanged.
fn strip_file_uri(token: &str) -> String {
    let Some(rest) = token.strip_prefix("file://") else {
        return token.to_string();
    };
    // Drop an authority component ("file://localhost/...").
    let path = match rest.find('/') {
        Some(0) | None => rest,
        Some(i) => &rest[i..],
    };
    percent_decode(path)
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Apply the media-type filter: accepted entries have a declared type whose
/// first `/`-segment is `audio`; everything else, including entries with no
/// usable declared type, is rejected.
pub fn classify(candidates: Vec<Candidate>) -> Batch {
    let mut batch = Batch::default();
    for cand in candidates {
        if cand.mime.map(mime::is_audio).unwrap_or(false) {
            batch.accepted.push(cand);
        } else {
            batch.rejected.push(cand);
        }
    }
    batch
}

/// Tag information probed from an accepted payload.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub title: Option<String>,
    pub duration: Option<Duration>,
}

/// Read title and duration tags from the payload. Failing to read tags is
/// not an ingestion failure; the track simply carries no probed metadata.
pub fn probe(path: &Path) -> Probe {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return Probe::default();
    };

    let duration = Some(tagged.properties().duration());
    let title = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .and_then(|tag| tag.get_string(ItemKey::TrackTitle))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Probe { title, duration }
}
