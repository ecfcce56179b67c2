//! Domain logic for the inkdrop watch server: media classification, the
//! watched media library (snapshot listing + public URLs), and the folder
//! watch loop that turns filesystem creation events into domain events.

// Re-export the shared leaf type so consumers of `domain` do not need to
// depend on the `events` crate directly for classification results.
pub use events::MediaKind;

pub mod error;
pub mod library;
pub mod media;
pub mod watch;

pub use error::Error;
pub use library::MediaLibrary;
pub use watch::FolderWatcher;
