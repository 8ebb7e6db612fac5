//! HTTP adapter for article visibility.

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};
use serde::Serialize;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::publishing::RepublishArticlesCommand;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepublishResponse {
    pub republished_articles: Vec<String>,
}

/// POST /api/articles/republish - Re-publish locked articles (paid only)
pub async fn republish_articles(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .republish_handler()
        .handle(RepublishArticlesCommand { user_id: user.id })
        .await?;

    Ok(Json(RepublishResponse {
        republished_articles: result.republished.iter().map(ToString::to_string).collect(),
    }))
}

/// Article routes, mounted at `/api/articles`.
pub fn publishing_routes() -> Router<AppState> {
    Router::new().route("/republish", post(republish_articles))
}
