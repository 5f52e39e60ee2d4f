use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repo::{PgUserStore, UserStore};
use crate::config::AppConfig;
use crate::db;
use crate::maps::client::{GoogleMapsClient, MapsClient};
use crate::preferences::repo::{PgPreferenceStore, PreferenceStore};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub maps: Arc<dyn MapsClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config).await?;

        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let preferences = Arc::new(PgPreferenceStore::new(db.clone())) as Arc<dyn PreferenceStore>;
        let maps = Arc::new(GoogleMapsClient::new(&config.maps)?) as Arc<dyn MapsClient>;

        Ok(Self::from_parts(db, config, users, preferences, maps))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        preferences: Arc<dyn PreferenceStore>,
        maps: Arc<dyn MapsClient>,
    ) -> Self {
        Self {
            db,
            config,
            users,
            preferences,
            maps,
        }
    }

    /// In-memory stores and a canned maps client; the pool never connects.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::testing::{lazy_pool, test_config, FakeMaps, InMemoryPreferences, InMemoryUsers};

        Self::from_parts(
            lazy_pool(),
            Arc::new(test_config()),
            Arc::new(InMemoryUsers::default()),
            Arc::new(InMemoryPreferences::default()),
            Arc::new(FakeMaps),
        )
    }
}
