//! Upstream (Google web service) payloads and the compact shapes we return.

use serde::{Deserialize, Serialize};

pub const MAX_PHOTOS: usize = 3;
pub const MAX_REVIEWS: usize = 5;

// ---- responses ----

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub location: LatLng,
    pub open_now: Option<bool>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub types: Vec<String>,
    pub location: LatLng,
    pub opening_hours: Option<Vec<String>>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: Option<String>,
    pub location: LatLng,
    pub place_id: Option<String>,
}

// ---- requests ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
    pub place_type: Option<String>,
    pub keyword: Option<String>,
}

fn default_radius() -> u32 {
    1000
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

// ---- upstream payloads ----

#[derive(Debug, Deserialize)]
pub struct ApiList<T> {
    pub status: String,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiItem<T> {
    pub status: String,
    pub result: Option<T>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct RawPhoto {
    pub photo_reference: String,
}

#[derive(Debug, Deserialize)]
pub struct RawOpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct RawReview {
    pub author_name: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlace {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    pub price_level: Option<u8>,
    pub geometry: RawGeometry,
    pub opening_hours: Option<RawOpeningHours>,
    #[serde(default)]
    pub photos: Vec<RawPhoto>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeocode {
    pub formatted_address: Option<String>,
    pub geometry: RawGeometry,
    pub place_id: Option<String>,
}

impl From<RawPlace> for NearbyPlace {
    fn from(p: RawPlace) -> Self {
        Self {
            place_id: p.place_id,
            name: p.name,
            address: p.vicinity,
            types: p.types,
            rating: p.rating,
            user_ratings_total: p.user_ratings_total,
            location: p.geometry.location,
            open_now: p.opening_hours.and_then(|h| h.open_now),
            photos: p
                .photos
                .into_iter()
                .take(MAX_PHOTOS)
                .map(|ph| ph.photo_reference)
                .collect(),
        }
    }
}

impl From<RawPlace> for PlaceDetails {
    fn from(p: RawPlace) -> Self {
        Self {
            place_id: p.place_id,
            name: p.name,
            formatted_address: p.formatted_address,
            phone: p.formatted_phone_number,
            website: p.website,
            rating: p.rating,
            user_ratings_total: p.user_ratings_total,
            price_level: p.price_level,
            types: p.types,
            location: p.geometry.location,
            opening_hours: p.opening_hours.and_then(|h| h.weekday_text),
            reviews: p
                .reviews
                .into_iter()
                .take(MAX_REVIEWS)
                .map(|r| Review {
                    author: r.author_name,
                    rating: r.rating,
                    text: r.text,
                    time: r.time,
                })
                .collect(),
        }
    }
}

impl From<RawGeocode> for GeocodeResult {
    fn from(g: RawGeocode) -> Self {
        Self {
            formatted_address: g.formatted_address,
            location: g.geometry.location,
            place_id: g.place_id,
        }
    }
}
