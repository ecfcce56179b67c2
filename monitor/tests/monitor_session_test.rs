//! End-to-end tests for the monitor session state machine, run against real
//! ephemeral HTTP servers speaking the watch server's wire protocol.

use axum::response::sse::{Event, Sse};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream::{self, Stream, StreamExt};
use monitor::FolderMonitor;
use serde_json::json;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Poll the callback channel until a URL arrives or the timeout elapses.
async fn recv_within(rx: &mpsc::Receiver<String>, timeout: Duration) -> Option<String> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Ok(url) = rx.try_recv() {
            return Some(url);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn empty_snapshot() -> Json<serde_json::Value> {
    Json(json!({ "images": [] }))
}

fn sse_pending() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(stream::pending::<Result<Event, Infallible>>())
}

/// An event stream that pushes one discovery payload after a delay, then
/// stays open.
fn sse_discovery_after(
    delay: Duration,
    url: &'static str,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let events = stream::once(async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(Event::default().data(json!({ "imageUrl": url }).to_string()))
    })
    .chain(stream::pending());
    Sse::new(events)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_existing_snapshot_resolves_without_subscribing() {
    let subscription_opens = std::sync::Arc::new(AtomicUsize::new(0));
    let opens_in_handler = subscription_opens.clone();

    let app = Router::new()
        .route(
            "/api/images/:folder",
            get(|| async {
                Json(json!({ "images": ["http://files/a.png", "http://files/b.png"] }))
            }),
        )
        .route(
            "/api/events",
            get(move || {
                let opens = opens_in_handler.clone();
                async move {
                    opens.fetch_add(1, Ordering::SeqCst);
                    sse_pending()
                }
            }),
        );
    let server = spawn_server(app).await;

    let (tx, rx) = mpsc::channel();
    let mut monitor = FolderMonitor::new(server, "Mock");
    monitor.start_monitoring(move |url| {
        tx.send(url).unwrap();
    });

    let url = recv_within(&rx, Duration::from_secs(2))
        .await
        .expect("callback should resolve from the snapshot");
    assert_eq!(url, "http://files/b.png", "most-recently-listed entry wins");
    assert_eq!(
        subscription_opens.load(Ordering::SeqCst),
        0,
        "no subscription should be opened when the snapshot satisfies the request"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_live_event_resolves_exactly_once() {
    let app = Router::new()
        .route("/api/images/:folder", get(empty_snapshot))
        .route(
            "/api/events",
            get(|| async {
                let events = stream::iter(vec![
                    Ok::<_, Infallible>(
                        Event::default().data(json!({ "imageUrl": "X" }).to_string()),
                    ),
                    Ok(Event::default().data(json!({ "imageUrl": "Y" }).to_string())),
                ])
                .chain(stream::pending());
                Sse::new(events)
            }),
        );
    let server = spawn_server(app).await;

    let (tx, rx) = mpsc::channel();
    let mut monitor = FolderMonitor::new(server, "Mock");
    monitor.start_monitoring(move |url| {
        tx.send(url).unwrap();
    });

    let url = recv_within(&rx, Duration::from_secs(2))
        .await
        .expect("callback should resolve from the live event");
    assert_eq!(url, "X");

    // The second event must be ignored post-resolution.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(rx.try_recv().is_err(), "callback fired more than once");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_resolves_via_fallback() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (tx, rx) = mpsc::channel();
    let mut monitor = FolderMonitor::new(format!("http://{addr}"), "Mock")
        .with_fallback_delay(Duration::from_millis(100))
        .with_fallback_url("http://placeholder/fallback.png");
    monitor.start_monitoring(move |url| {
        tx.send(url).unwrap();
    });

    let url = recv_within(&rx, Duration::from_secs(5))
        .await
        .expect("fallback should resolve the session");
    assert_eq!(url, "http://placeholder/fallback.png");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stop_monitoring_prevents_late_resolution() {
    let app = Router::new()
        .route("/api/images/:folder", get(empty_snapshot))
        .route(
            "/api/events",
            get(|| async { sse_discovery_after(Duration::from_millis(300), "http://late.png") }),
        );
    let server = spawn_server(app).await;

    let (tx, rx) = mpsc::channel();
    let mut monitor = FolderMonitor::new(server, "Mock");
    monitor.start_monitoring(move |url| {
        tx.send(url).unwrap();
    });

    // Let the session reach its waiting state, then cancel before the
    // server-side event fires.
    tokio::time::sleep(Duration::from_millis(100)).await;
    monitor.stop_monitoring();
    monitor.stop_monitoring(); // second call is a no-op

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(
        rx.try_recv().is_err(),
        "callback fired after stop_monitoring"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_session_supersedes_pending_one() {
    let app = Router::new()
        .route("/api/images/:folder", get(empty_snapshot))
        .route(
            "/api/events",
            get(|| async { sse_discovery_after(Duration::from_millis(300), "http://fresh.png") }),
        );
    let server = spawn_server(app).await;

    let (tx1, rx1) = mpsc::channel();
    let (tx2, rx2) = mpsc::channel();

    let mut monitor = FolderMonitor::new(server, "Mock");
    monitor.start_monitoring(move |url| {
        tx1.send(url).unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    monitor.start_monitoring(move |url| {
        tx2.send(url).unwrap();
    });

    let url = recv_within(&rx2, Duration::from_secs(2))
        .await
        .expect("second session should resolve");
    assert_eq!(url, "http://fresh.png");
    assert!(
        rx1.try_recv().is_err(),
        "superseded session's callback must never fire"
    );
}
