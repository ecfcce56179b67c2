use events::MediaKind;
use serde::Serialize;

/// Trait for getting the SSE event type name, used for logging.
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Wire events pushed to subscribers.
///
/// Serialized untagged: the browser side consumes plain `message` frames via
/// `EventSource.onmessage`, so the payload is the bare JSON body, e.g.
/// `{"imageUrl": "http://localhost:3001/files/Mock/comic.png"}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Event {
    MediaDiscovered {
        #[serde(rename = "imageUrl")]
        image_url: String,
        #[serde(rename = "mediaKind")]
        media_kind: MediaKind,
    },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::MediaDiscovered { .. } => "media_discovered",
        }
    }
}
