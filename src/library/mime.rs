//! Declared media types.
//!
//! Browsers hand drop targets a declared MIME type per file; a terminal hands
//! us a path. The table here re-derives the declared type from the file
//! extension, the same way user agents populate it. Acceptance is decided on
//! the first `/`-segment of the declared type, never on the extension itself.

use std::path::Path;

/// Look up the declared media type for a path by its extension.
///
/// Returns `None` when the extension is missing or unknown; such entries
/// carry no usable declared type and are rejected upstream.
pub fn from_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|s| s.to_str())?;
    from_extension(&ext.to_ascii_lowercase())
}

fn from_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "wma" => "audio/x-ms-wma",
        "aif" | "aiff" => "audio/aiff",
        "mka" => "audio/x-matroska",
        "mid" | "midi" => "audio/midi",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",

        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",

        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "toml" => "application/toml",
        _ => return None,
    };
    Some(mime)
}

/// True when the declared type's first `/`-segment is exactly `audio`.
pub fn is_audio(mime: &str) -> bool {
    mime.split('/').next() == Some("audio")
}
