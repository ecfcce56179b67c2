use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::{AppState, Error};
use log::*;

/// GET a snapshot listing of the qualifying media files already present in
/// a folder. A folder that does not exist yet is created empty, so the only
/// error a caller can see is a real directory-access failure.
#[utoipa::path(
    get,
    path = "/api/images/{folder}",
    params(
        ("folder" = String, Path, description = "Name of the media folder under the files root")
    ),
    responses(
        (status = 200, description = "Public URLs of the qualifying files, in directory-listing order"),
        (status = 500, description = "Directory access failure")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Path(folder): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET images snapshot for folder {folder}");

    let images = app_state.library.list_media(&folder)?;

    Ok(Json(json!({ "images": images })))
}
