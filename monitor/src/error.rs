use std::error::Error as StdError;
use std::fmt;

/// Failures a monitoring session can hit on its way to resolution. None of
/// these ever surface to the caller; every one degrades into the fallback
/// path so the registered callback always eventually fires.
#[derive(Debug)]
pub(crate) enum MonitorError {
    /// The snapshot listing query failed; the session proceeds to a live
    /// subscription instead.
    SnapshotQuery(reqwest::Error),
    /// The push subscription could not be established.
    SubscriptionOpen(eventsource_client::Error),
    /// The push channel failed or ended after being open.
    SubscriptionTransport,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MonitorError::SnapshotQuery(e) => write!(f, "snapshot query failed: {e}"),
            MonitorError::SubscriptionOpen(e) => {
                write!(f, "subscription could not be established: {e}")
            }
            MonitorError::SubscriptionTransport => write!(f, "subscription channel failed"),
        }
    }
}

impl StdError for MonitorError {}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::SnapshotQuery(err)
    }
}
