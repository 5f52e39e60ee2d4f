use axum::{extract::State, routing::get, Router};
use tracing::instrument;

use super::dto::{GeocodeQuery, GeocodeResult, NearbyPlace, NearbyQuery, PlaceDetails};
use crate::{
    auth::extractors::CurrentUser,
    error::AppError,
    extract::{Json, Path, Query},
    state::AppState,
};

const RADIUS_RANGE: std::ops::RangeInclusive<u32> = 100..=50_000;
const MIN_ADDRESS_LEN: usize = 3;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/maps/nearby", get(nearby))
        .route("/maps/place/:place_id", get(place_details))
        .route("/maps/geocode", get(geocode))
}

pub(crate) fn validate_nearby(q: &NearbyQuery) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&q.latitude) {
        return Err(AppError::Validation("latitude must be between -90 and 90".into()));
    }
    if !(-180.0..=180.0).contains(&q.longitude) {
        return Err(AppError::Validation("longitude must be between -180 and 180".into()));
    }
    if !RADIUS_RANGE.contains(&q.radius) {
        return Err(AppError::Validation(format!(
            "radius must be between {} and {}",
            RADIUS_RANGE.start(),
            RADIUS_RANGE.end()
        )));
    }
    Ok(())
}

#[instrument(skip(state, _caller))]
pub async fn nearby(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Query(q): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyPlace>>, AppError> {
    validate_nearby(&q)?;
    let places = state.maps.nearby_places(&q).await?;
    Ok(Json(places))
}

#[instrument(skip(state, _caller))]
pub async fn place_details(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetails>, AppError> {
    let place = state
        .maps
        .place_details(&place_id)
        .await?
        .ok_or(AppError::NotFound("Place"))?;
    Ok(Json(place))
}

#[instrument(skip(state, _caller))]
pub async fn geocode(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Query(q): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResult>, AppError> {
    let address = q.address.trim();
    if address.chars().count() < MIN_ADDRESS_LEN {
        return Err(AppError::Validation(format!(
            "address must be at least {MIN_ADDRESS_LEN} characters"
        )));
    }
    let result = state
        .maps
        .geocode(address)
        .await?
        .ok_or(AppError::NotFound("Address"))?;
    Ok(Json(result))
}
