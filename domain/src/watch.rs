//! The folder watch loop: filesystem creation events in, domain events out.

use crate::error::Error;
use crate::library::MediaLibrary;
use crate::media;
use events::{DomainEvent, EventPublisher};
use log::*;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Watches a single folder under the media library root for newly created
/// files. Qualifying files are published as [`DomainEvent::MediaDiscovered`];
/// hidden files and non-media files are logged and skipped. The loop never
/// terminates on a per-file error.
///
/// Dropping the watcher stops the filesystem watch.
pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
}

impl FolderWatcher {
    /// Start watching `folder`, creating it first if missing. Fails only on
    /// a filesystem or watch-backend setup error; the running loop is
    /// fatal-free.
    pub fn start(
        library: &MediaLibrary,
        folder: &str,
        publisher: EventPublisher,
    ) -> Result<Self, Error> {
        let watch_path = library.ensure_directory(folder)?;
        let (tx, rx) = mpsc::unbounded_channel::<PathBuf>();

        // The notify callback runs on the backend's own thread; it only
        // forwards created paths onto the async loop below.
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                match res {
                    Ok(event) => {
                        if let EventKind::Create(_) = event.kind {
                            for path in event.paths {
                                // A closed receiver means shutdown; drop the event.
                                let _ = tx.send(path);
                            }
                        }
                    }
                    Err(e) => error!("Folder watch error: {e}"),
                }
            })?;
        watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;
        info!("Monitoring folder: {}", watch_path.display());

        tokio::spawn(classify_loop(
            rx,
            library.clone(),
            folder.to_string(),
            publisher,
        ));

        Ok(Self { _watcher: watcher })
    }
}

/// Classify created paths and publish discoveries until the watcher is
/// dropped and the channel drains.
async fn classify_loop(
    mut rx: mpsc::UnboundedReceiver<PathBuf>,
    library: MediaLibrary,
    folder: String,
    publisher: EventPublisher,
) {
    while let Some(path) = rx.recv().await {
        if media::is_hidden(&path) {
            debug!("Skipping hidden file {}", path.display());
            continue;
        }

        let Some(kind) = media::classify(&path) else {
            debug!("Skipping non-media file {}", path.display());
            continue;
        };

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()).map(String::from)
        else {
            warn!("Discovered file has no usable name: {}", path.display());
            continue;
        };

        let url = library.public_url(&folder, &file_name);
        info!("New {kind} file discovered: {}", path.display());

        publisher
            .publish(DomainEvent::MediaDiscovered {
                file_name,
                kind,
                url,
            })
            .await;
    }
}
