//! Client-side folder monitoring for the inkdrop watch server.
//!
//! [`FolderMonitor`] gives the requesting application a single call that
//! resolves exactly once with a media URL. A session prefers artifacts that
//! already exist (snapshot listing) over waiting for new ones (SSE
//! subscription), and degrades to a timed local fallback when the watch
//! server is unreachable, so the caller is never left waiting forever.
//!
//! Session lifecycle:
//!
//! 1. `start_monitoring(callback)` queries `GET /api/images/{folder}`; any
//!    existing qualifying file resolves the session immediately with the
//!    most-recently-listed entry, without opening a subscription.
//! 2. Otherwise the session subscribes to `GET /api/events` and waits for
//!    the first discovery payload.
//! 3. If the subscription cannot be opened or its channel fails, a one-shot
//!    timer fires after the fallback delay with a placeholder URL.
//!
//! The callback fires at most once per session. `stop_monitoring` cancels
//! from any state without invoking the callback and is idempotent; starting
//! a new session supersedes (and silences) the previous one.

use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

mod error;

use error::MonitorError;

/// How long a session in fallback mode waits before synthesizing a result.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_secs(5);

/// Placeholder media URL delivered when the watch server never resolves the
/// session. Matches the stand-in artwork the demo UI shows in that case.
pub const DEFAULT_FALLBACK_URL: &str =
    "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?q=80&w=1064";

type OnMediaFound = Box<dyn FnOnce(String) + Send + 'static>;
type SharedCallback = Arc<Mutex<Option<OnMediaFound>>>;

/// One in-flight "wait for artifact" request.
struct Session {
    notified: Arc<AtomicBool>,
    callback: SharedCallback,
    handle: JoinHandle<()>,
}

/// Everything a session task needs, detached from the monitor so the caller
/// can drop or restart the monitor while the task unwinds.
#[derive(Clone)]
struct SessionConfig {
    server_url: String,
    folder: String,
    fallback_delay: Duration,
    fallback_url: String,
}

/// Monitors a watch-server folder for a generated media artifact.
///
/// Requires a running tokio runtime; sessions execute as spawned tasks.
pub struct FolderMonitor {
    config: SessionConfig,
    session: Option<Session>,
}

impl FolderMonitor {
    pub fn new(server_url: impl Into<String>, folder: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            config: SessionConfig {
                server_url: server_url.trim_end_matches('/').to_string(),
                folder: folder.into(),
                fallback_delay: DEFAULT_FALLBACK_DELAY,
                fallback_url: DEFAULT_FALLBACK_URL.to_string(),
            },
            session: None,
        }
    }

    /// Override the fallback delay (tests use milliseconds).
    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.config.fallback_delay = delay;
        self
    }

    /// Override the placeholder URL delivered on fallback.
    pub fn with_fallback_url(mut self, url: impl Into<String>) -> Self {
        self.config.fallback_url = url.into();
        self
    }

    /// Begin a monitoring session. The callback fires at most once, with a
    /// resolvable media URL. Any session still in flight is superseded: its
    /// resources are released and its callback will never fire.
    pub fn start_monitoring<F>(&mut self, on_media_found: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        self.stop_monitoring();
        debug!("Starting to monitor folder {}", self.config.folder);

        let notified = Arc::new(AtomicBool::new(false));
        let callback: SharedCallback = Arc::new(Mutex::new(Some(Box::new(on_media_found))));

        let handle = tokio::spawn(run_session(
            self.config.clone(),
            notified.clone(),
            callback.clone(),
        ));

        self.session = Some(Session {
            notified,
            callback,
            handle,
        });
    }

    /// Cancel the current session, if any, without invoking its callback.
    /// Safe to call from any state and repeatedly; a stopped or resolved
    /// session is a no-op.
    pub fn stop_monitoring(&mut self) {
        if let Some(session) = self.session.take() {
            session.notified.store(true, Ordering::SeqCst);
            if let Ok(mut guard) = session.callback.lock() {
                guard.take();
            }
            session.handle.abort();
            debug!("Stopped monitoring folder {}", self.config.folder);
        }
    }

    /// True while a session has been started and not yet stopped. The
    /// session may already have resolved; resolution does not clear it.
    pub fn is_monitoring(&self) -> bool {
        self.session.is_some()
    }
}

impl Drop for FolderMonitor {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotResponse {
    images: Vec<String>,
}

/// Drive one session through snapshot, subscription, and fallback.
async fn run_session(config: SessionConfig, notified: Arc<AtomicBool>, callback: SharedCallback) {
    match check_existing_media(&config).await {
        Ok(Some(url)) => {
            debug!("Found existing media in folder {}", config.folder);
            deliver(&notified, &callback, url);
            return;
        }
        Ok(None) => debug!("No existing media in folder {}", config.folder),
        Err(e) => warn!("{e}; opening live subscription anyway"),
    }

    match wait_for_discovery(&config).await {
        Ok(url) => deliver(&notified, &callback, url),
        Err(e) => {
            warn!("{e}; scheduling fallback notification");
            tokio::time::sleep(config.fallback_delay).await;
            deliver(&notified, &callback, config.fallback_url.clone());
        }
    }
}

/// Snapshot check: any already-present qualifying file satisfies the session
/// immediately. The most-recently-listed entry wins.
async fn check_existing_media(config: &SessionConfig) -> Result<Option<String>, MonitorError> {
    let url = format!("{}/api/images/{}", config.server_url, config.folder);
    let mut response = reqwest::get(&url)
        .await?
        .error_for_status()?
        .json::<SnapshotResponse>()
        .await?;

    Ok(response.images.pop())
}

/// Open a push subscription and wait for the first discovery payload.
/// Comment frames (keep-alives) are ignored; a transport failure or end of
/// stream maps to an error the caller turns into the fallback path.
async fn wait_for_discovery(config: &SessionConfig) -> Result<String, MonitorError> {
    let url = format!("{}/api/events", config.server_url);
    let client = es::ClientBuilder::for_url(&url)
        .map_err(MonitorError::SubscriptionOpen)?
        .reconnect(es::ReconnectOptions::reconnect(false).build())
        .build();

    let mut stream = client.stream();

    loop {
        match stream.next().await {
            Some(Ok(es::SSE::Event(event))) => {
                if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&event.data) {
                    if let Some(image_url) = payload.get("imageUrl").and_then(|v| v.as_str()) {
                        debug!("New media discovered via subscription: {image_url}");
                        return Ok(image_url.to_string());
                    }
                }
            }
            Some(Ok(es::SSE::Comment(_))) => {
                // Ignore comments (keep-alive)
            }
            Some(Err(e)) => {
                warn!("SSE transport error: {e}");
                return Err(MonitorError::SubscriptionTransport);
            }
            None => {
                return Err(MonitorError::SubscriptionTransport);
            }
        }
    }
}

/// Invoke the registered callback, at most once per session. The guard also
/// absorbs the race between a snapshot result and a simultaneously-arriving
/// push event, and any duplicate events after resolution.
fn deliver(notified: &AtomicBool, callback: &SharedCallback, url: String) {
    if notified.swap(true, Ordering::SeqCst) {
        debug!("Session already notified; suppressing duplicate");
        return;
    }

    if let Some(on_media_found) = callback.lock().ok().and_then(|mut guard| guard.take()) {
        info!("Media found in monitored folder");
        on_media_found(url);
    }
}
