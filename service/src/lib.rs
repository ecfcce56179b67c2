use config::Config;
use domain::MediaLibrary;
use events::EventPublisher;
use sse::domain_event_handler::SseDomainEventHandler;
use sse::Manager;
use std::sync::Arc;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sse_manager: Arc<Manager>,
    pub library: Arc<MediaLibrary>,
    pub event_publisher: EventPublisher,
}

impl AppState {
    /// Build the shared application state from config: the media library,
    /// the SSE subscriber manager, and an event publisher already wired to
    /// broadcast discoveries over SSE.
    pub fn new(config: Config) -> Self {
        let sse_manager = Arc::new(Manager::new());
        let library = Arc::new(MediaLibrary::new(
            config.files_root().clone(),
            config.public_base_url(),
        ));
        let event_publisher = EventPublisher::new()
            .with_handler(Arc::new(SseDomainEventHandler::new(sse_manager.clone())));

        Self {
            config,
            sse_manager,
            library,
            event_publisher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_app_state_wires_library_from_config() {
        let config = Config::parse_from(["inkdrop", "--files-root", "/tmp/inkdrop-files"]);
        let state = AppState::new(config);

        assert_eq!(
            state.library.public_url("Mock", "comic.png"),
            "http://localhost:3001/files/Mock/comic.png"
        );
    }
}
