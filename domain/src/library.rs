//! The watched media library: snapshot listings of qualifying files already
//! on disk and the public URLs they are served under.

use crate::error::{Error, MediaErrorKind};
use crate::media;
use log::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem root of the served media folders plus the base URL they are
/// mounted under. Cheap to clone; handlers and the watch loop each hold one.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    files_root: PathBuf,
    public_base_url: String,
}

impl MediaLibrary {
    pub fn new(files_root: PathBuf, public_base_url: String) -> Self {
        Self {
            files_root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Root directory the `/files` static mount serves from.
    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    /// Absolute path of a named sub-folder under the files root.
    pub fn folder_path(&self, folder: &str) -> PathBuf {
        self.files_root.join(folder)
    }

    /// Create the named folder (and parents) if missing. Idempotent: an
    /// already-existing folder is not an error. A real filesystem failure
    /// (permissions, disk) surfaces as `MediaErrorKind::DirectoryCreate`.
    pub fn ensure_directory(&self, folder: &str) -> Result<PathBuf, Error> {
        let path = self.folder_path(folder);
        if !path.exists() {
            fs::create_dir_all(&path)
                .map_err(|e| Error::media(MediaErrorKind::DirectoryCreate, e))?;
            info!("Created folder: {}", path.display());
        }
        Ok(path)
    }

    /// Snapshot the qualifying files already present in the named folder,
    /// returned as public URLs in directory-listing order. A missing folder
    /// is created empty and yields an empty list; only real I/O failures
    /// surface as `MediaErrorKind::DirectoryAccess`.
    pub fn list_media(&self, folder: &str) -> Result<Vec<String>, Error> {
        let path = self.ensure_directory(folder)?;

        let entries =
            fs::read_dir(&path).map_err(|e| Error::media(MediaErrorKind::DirectoryAccess, e))?;

        let mut urls = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::media(MediaErrorKind::DirectoryAccess, e))?;
            let file_path = entry.path();

            if media::is_hidden(&file_path) || media::classify(&file_path).is_none() {
                continue;
            }

            if let Some(file_name) = file_path.file_name().and_then(|n| n.to_str()) {
                urls.push(self.public_url(folder, file_name));
            }
        }

        debug!("Found {} media file(s) in folder {folder}", urls.len());
        Ok(urls)
    }

    /// Public URL of a file under the static `/files` mount.
    pub fn public_url(&self, folder: &str, file_name: &str) -> String {
        format!("{}/files/{folder}/{file_name}", self.public_base_url)
    }
}
