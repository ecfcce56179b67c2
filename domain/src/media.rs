//! Extension-based media classification.
//!
//! This is the single definition of what counts as a qualifying file; both
//! the snapshot listing and the live watch loop go through [`classify`] so
//! the allow-lists never drift apart.

use events::MediaKind;
use std::path::Path;

/// Image extensions recognized by the watch server, matched case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Video container extensions recognized by the watch server.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// Classify a path by its extension. Returns `None` for paths without an
/// extension or with an extension outside the allow-lists.
pub fn classify(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_str()?.to_lowercase();

    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Returns true for dotfiles, which the watch loop and snapshot listing
/// always skip (editor swap files, .DS_Store and friends).
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
