use crate::controller::{health_check_controller, images_controller};
use crate::{sse, AppState};
use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Inkdrop Watch Server API"
        ),
        paths(
            images_controller::index,
            health_check_controller::health_check,
        ),
        tags(
            (name = "inkdrop", description = "Folder watch-and-notify API for generated comic media")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(image_routes(app_state.clone()))
        .merge(event_routes(app_state.clone()))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .nest_service("/files", static_routes(&app_state))
}

fn image_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/images/:folder", get(images_controller::index))
        .with_state(app_state)
}

fn event_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(sse::handler::events_handler))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn static_routes(app_state: &AppState) -> ServeDir {
    ServeDir::new(app_state.library.files_root())
}
