//! Route table and the small JSON endpoints

use crate::{error::Result, AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

use super::stream::handle_stream;

pub const ROOT_MESSAGE: &str = "Music streaming server is running!";

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/search", get(handle_search))
        .route("/stream/:filename", get(handle_stream))
}

async fn handle_root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": ROOT_MESSAGE }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<String>>> {
    debug!("Search query: {}", params.q);

    let songs = state.catalog.list(&params.q).await.inspect_err(|e| {
        tracing::error!(query = %params.q, "Error during search: {}", e);
    })?;

    debug!("Found {} songs matching the query", songs.len());
    Ok(Json(songs))
}
