use axum::{extract::State, routing::get, Router};
use tracing::instrument;
use uuid::Uuid;

use super::dto::Pagination;
use crate::{
    auth::{dto::PublicUser, extractors::CurrentUser},
    db::Page,
    error::AppError,
    extract::{Json, Path, Query},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

#[instrument(skip(state, _caller))]
pub async fn list_users(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let page = Page::new(p.skip, p.limit)?;
    let users = state.users.list(page).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}
