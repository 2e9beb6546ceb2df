use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::*;
use crate::config::IngestSettings;

#[test]
fn mime_lookup_maps_known_extensions_case_insensitive() {
    assert_eq!(mime::from_path(Path::new("/tmp/a.mp3")), Some("audio/mpeg"));
    assert_eq!(mime::from_path(Path::new("/tmp/a.MP3")), Some("audio/mpeg"));
    assert_eq!(mime::from_path(Path::new("/tmp/a.flac")), Some("audio/flac"));
    assert_eq!(mime::from_path(Path::new("/tmp/a.png")), Some("image/png"));
    assert_eq!(mime::from_path(Path::new("/tmp/a.weird")), None);
    assert_eq!(mime::from_path(Path::new("/tmp/noext")), None);
}

#[test]
fn is_audio_checks_the_first_segment_only() {
    assert!(mime::is_audio("audio/mpeg"));
    assert!(mime::is_audio("audio/x-matroska"));
    assert!(!mime::is_audio("video/mp4"));
    assert!(!mime::is_audio("image/png"));
    assert!(!mime::is_audio(""));
}

#[test]
fn parse_drop_text_splits_whitespace_separated_tokens() {
    let cands = parse_drop_text("/tmp/a.mp3  /tmp/b.flac\n/tmp/c.png");
    assert_eq!(cands.len(), 3);
    assert_eq!(cands[0].path, Path::new("/tmp/a.mp3"));
    assert_eq!(cands[0].name, "a.mp3");
    assert_eq!(cands[0].mime, Some("audio/mpeg"));
    assert_eq!(cands[2].mime, Some("image/png"));
}

#[test]
fn parse_drop_text_handles_quoted_paths_with_spaces() {
    let cands = parse_drop_text("'/tmp/my song.mp3' \"/tmp/other file.png\"");
    assert_eq!(cands.len(), 2);
    assert_eq!(cands[0].path, Path::new("/tmp/my song.mp3"));
    assert_eq!(cands[0].name, "my song.mp3");
    assert_eq!(cands[1].path, Path::new("/tmp/other file.png"));
}

#[test]
fn parse_drop_text_handles_backslash_escaped_spaces() {
    let cands = parse_drop_text(r"/tmp/my\ song.mp3");
    assert_eq!(cands.len(), 1);
    assert_eq!(cands[0].path, Path::new("/tmp/my song.mp3"));
}

#[test]
fn parse_drop_text_decodes_file_uris() {
    let cands = parse_drop_text("file:///tmp/my%20song.mp3");
    assert_eq!(cands.len(), 1);
    assert_eq!(cands[0].path, Path::new("/tmp/my song.mp3"));
    assert_eq!(cands[0].name, "my song.mp3");
    assert_eq!(cands[0].mime, Some("audio/mpeg"));

    let cands = parse_drop_text("file://localhost/tmp/b.flac");
    assert_eq!(cands[0].path, Path::new("/tmp/b.flac"));
}

#[test]
fn parse_drop_text_of_blank_input_is_empty() {
    assert!(parse_drop_text("").is_empty());
    assert!(parse_drop_text("   \n  ").is_empty());
}

#[test]
fn classify_partitions_on_declared_type() {
    let batch = classify(parse_drop_text("/tmp/a.mp3 /tmp/b.png /tmp/c.flac /tmp/d"));
    assert_eq!(batch.accepted.len(), 2);
    assert_eq!(batch.rejected.len(), 2);
    assert_eq!(batch.accepted[0].name, "a.mp3");
    assert_eq!(batch.accepted[1].name, "c.flac");
    assert_eq!(batch.rejected[0].mime, Some("image/png"));
    // No usable declared type at all.
    assert_eq!(batch.rejected[1].mime, None);
}

#[test]
fn classify_of_nothing_is_empty() {
    assert!(classify(Vec::new()).is_empty());
    assert!(!classify(parse_drop_text("/tmp/a.mp3")).is_empty());
}

#[test]
fn probe_fails_soft_on_unreadable_payloads() {
    let p = probe(Path::new("/nonexistent/file.mp3"));
    assert!(p.title.is_none());
    assert!(p.duration.is_none());
}

#[test]
fn list_dir_sorts_dirs_first_and_filters_hidden() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("zsub")).unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();

    let settings = IngestSettings::default();
    let entries = list_dir(dir.path(), &settings);
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_dir);
    assert_eq!(entries[0].name, "zsub");
    assert_eq!(entries[1].name, "a.mp3");

    let settings = IngestSettings {
        include_hidden: true,
        ..IngestSettings::default()
    };
    assert_eq!(list_dir(dir.path(), &settings).len(), 3);
}

#[test]
fn list_dir_caps_the_listing() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        fs::write(dir.path().join(format!("f{i}.mp3")), b"x").unwrap();
    }

    let settings = IngestSettings {
        picker_max_entries: 3,
        ..IngestSettings::default()
    };
    assert_eq!(list_dir(dir.path(), &settings).len(), 3);
}
