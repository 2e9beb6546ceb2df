//! Directory listing for the file-picker overlay.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::IngestSettings;

/// One row in the picker overlay.
#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// List one directory level for the picker: directories first, then files,
/// both sorted case-insensitively. Hidden entries are filtered per settings
/// and the listing is capped at `picker_max_entries`.
pub fn list_dir(dir: &Path, settings: &IngestSettings) -> Vec<PickerEntry> {
    let mut entries: Vec<PickerEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| settings.include_hidden || !is_hidden(e.path()))
        .map(|e| {
            let path = e.path().to_path_buf();
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let is_dir = e.file_type().is_dir();
            PickerEntry { path, name, is_dir }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    entries.truncate(settings.picker_max_entries);
    entries
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
