use axum::{extract::State, http::StatusCode, routing::get, Router};
use tracing::instrument;
use uuid::Uuid;

use super::{dto::CreatePreferenceRequest, repo_types::Preference, services};
use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    extract::{Json, Path},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/preferences", get(list_preferences).post(create_preference))
        .route(
            "/preferences/:id",
            get(get_preference).delete(delete_preference),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Preference>>, AppError> {
    let prefs = state.preferences.list_for_user(user.id).await?;
    Ok(Json(prefs))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_preference(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreatePreferenceRequest>,
) -> Result<(StatusCode, Json<Preference>), AppError> {
    let pref = services::create_preference(state.preferences.as_ref(), &user, payload).await?;
    Ok((StatusCode::CREATED, Json(pref)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_preference(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Preference>, AppError> {
    let pref = services::get_preference(state.preferences.as_ref(), &user, id).await?;
    Ok(Json(pref))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_preference(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_preference(state.preferences.as_ref(), &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
