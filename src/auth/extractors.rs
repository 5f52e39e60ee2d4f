use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};

use super::{jwt::JwtKeys, repo_types::User, services};
use crate::{error::AppError, state::AppState};

/// The authenticated, active user behind the request's bearer token.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(CurrentUser(user.clone()));
        }

        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthenticated)?;
        let keys = JwtKeys::from_ref(state);
        let user = services::resolve(state.users.as_ref(), &keys, token).await?;

        parts.extensions.insert(user.clone());
        Ok(CurrentUser(user))
    }
}

/// Reads `Authorization: Bearer <token>`; the scheme is case-insensitive.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
