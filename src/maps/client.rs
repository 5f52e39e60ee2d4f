use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use super::dto::{
    ApiItem, ApiList, GeocodeResult, NearbyPlace, NearbyQuery, PlaceDetails, RawGeocode, RawPlace,
};
use crate::{config::MapsConfig, error::AppError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("maps request failed: {0}")]
    Transport(reqwest::Error),
    #[error("maps api returned {status}: {message}")]
    Api { status: String, message: String },
}

impl From<reqwest::Error> for MapsError {
    fn from(e: reqwest::Error) -> Self {
        // the url carries the api key
        MapsError::Transport(e.without_url())
    }
}

impl From<MapsError> for AppError {
    fn from(e: MapsError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

/// Outbound places/geocoding lookups, already re-shaped for our API.
#[async_trait]
pub trait MapsClient: Send + Sync {
    async fn nearby_places(&self, query: &NearbyQuery) -> Result<Vec<NearbyPlace>, MapsError>;
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, MapsError>;
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, MapsError>;
}

#[derive(Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(config: &MapsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&str, String)>,
    ) -> Result<T, MapsError> {
        params.push(("key", self.api_key.clone()));
        let body = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl MapsClient for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn nearby_places(&self, query: &NearbyQuery) -> Result<Vec<NearbyPlace>, MapsError> {
        let mut params = vec![
            ("location", format!("{},{}", query.latitude, query.longitude)),
            ("radius", query.radius.to_string()),
        ];
        if let Some(t) = &query.place_type {
            params.push(("type", t.clone()));
        }
        if let Some(k) = &query.keyword {
            params.push(("keyword", k.clone()));
        }

        let resp: ApiList<RawPlace> = self.get("/maps/api/place/nearbysearch/json", params).await?;
        let places = list_results(resp)?;
        debug!(count = places.len(), "nearby places fetched");
        Ok(places.into_iter().map(NearbyPlace::from).collect())
    }

    #[instrument(skip(self))]
    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>, MapsError> {
        let params = vec![("place_id", place_id.to_string())];
        let resp: ApiItem<RawPlace> = self.get("/maps/api/place/details/json", params).await?;
        Ok(item_result(resp)?.map(PlaceDetails::from))
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, MapsError> {
        let params = vec![("address", address.to_string())];
        let resp: ApiList<RawGeocode> = self.get("/maps/api/geocode/json", params).await?;
        Ok(list_results(resp)?.into_iter().next().map(GeocodeResult::from))
    }
}

fn api_error(status: String, message: Option<String>) -> MapsError {
    MapsError::Api {
        status,
        message: message.unwrap_or_default(),
    }
}

/// `ZERO_RESULTS` is an empty list, not a failure.
fn list_results<T>(resp: ApiList<T>) -> Result<Vec<T>, MapsError> {
    if matches!(resp.status.as_str(), "OK" | "ZERO_RESULTS") {
        Ok(resp.results)
    } else {
        Err(api_error(resp.status, resp.error_message))
    }
}

/// Unknown or unusable ids come back as `None`.
fn item_result<T>(resp: ApiItem<T>) -> Result<Option<T>, MapsError> {
    if resp.status == "OK" {
        Ok(resp.result)
    } else if matches!(resp.status.as_str(), "ZERO_RESULTS" | "NOT_FOUND" | "INVALID_REQUEST") {
        Ok(None)
    } else {
        Err(api_error(resp.status, resp.error_message))
    }
}
