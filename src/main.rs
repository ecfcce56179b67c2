use domain::FolderWatcher;
use log::{error, info};
use service::{config::Config, logging::Logger, AppState};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let app_state = AppState::new(config.clone());

    // The watcher handle must stay alive for the lifetime of the process;
    // dropping it stops the filesystem watch.
    let _watcher = match FolderWatcher::start(
        &app_state.library,
        &config.watch_folder,
        app_state.event_publisher.clone(),
    ) {
        Ok(watcher) => watcher,
        Err(e) => {
            error!("Failed to start watching folder {}: {e}", config.watch_folder);
            std::process::exit(1);
        }
    };

    info!(
        "Place media files in {} to see them in your app",
        app_state.library.folder_path(&config.watch_folder).display()
    );

    if let Err(e) = web::init_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
