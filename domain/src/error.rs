//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in this layer.
/// The `source` field holds the original error that caused the domain error.
/// The various `error_kind`s are ultimately used by `web` to return
/// appropriate HTTP status codes and messages to the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the
/// `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Media(MediaErrorKind),
    Watch(WatchErrorKind),
    Internal(InternalErrorKind),
}

/// Enum representing the kinds of errors that can occur while accessing the
/// watched media library on disk. A missing folder is not an error (it is
/// created on demand); these kinds cover real filesystem failures.
#[derive(Debug, PartialEq)]
pub enum MediaErrorKind {
    /// The watched directory exists but could not be read.
    DirectoryAccess,
    /// The watched directory is missing and could not be created.
    DirectoryCreate,
}

/// Enum representing the kinds of errors that can occur while establishing
/// the filesystem watch. Once the watch loop is running it is fatal-free;
/// these kinds only surface at startup.
#[derive(Debug, PartialEq)]
pub enum WatchErrorKind {
    Setup,
}

/// Enum representing the various kinds of internal errors that can occur in
/// the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Config,
    Other(String),
}

impl Error {
    /// Wrap a lower-level error with a media access kind.
    pub fn media(kind: MediaErrorKind, source: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: DomainErrorKind::Media(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `notify` watcher backend to the
// `domain` layer. Watch errors only occur while establishing the watch.
impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Watch(WatchErrorKind::Setup),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "I/O error".to_string(),
            )),
        }
    }
}
