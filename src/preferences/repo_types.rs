use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::services::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,              // restaurants, museums, parks, ...
    pub subcategory: Option<String>,   // italian food, modern art, ...
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Owned for Preference {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug)]
pub struct NewPreference<'a> {
    pub user_id: Uuid,
    pub category: &'a str,
    pub subcategory: Option<&'a str>,
}
