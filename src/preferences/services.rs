use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CreatePreferenceRequest,
    repo::PreferenceStore,
    repo_types::{NewPreference, Preference},
};
use crate::{
    auth::{repo_types::User, services::authorize_owned},
    db::DuplicateField,
    error::AppError,
};

const MAX_CATEGORY_LEN: usize = 100;
const NOT_FOUND: &str = "Preference";

pub async fn create_preference(
    store: &dyn PreferenceStore,
    user: &User,
    payload: CreatePreferenceRequest,
) -> Result<Preference, AppError> {
    let category = payload.category.trim();
    let subcategory = payload
        .subcategory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if category.is_empty() || category.chars().count() > MAX_CATEGORY_LEN {
        return Err(AppError::Validation(format!(
            "category must be between 1 and {MAX_CATEGORY_LEN} characters"
        )));
    }
    if subcategory.is_some_and(|s| s.chars().count() > MAX_CATEGORY_LEN) {
        return Err(AppError::Validation(format!(
            "subcategory must be at most {MAX_CATEGORY_LEN} characters"
        )));
    }

    if store.exists(user.id, category, subcategory).await? {
        warn!(user_id = %user.id, category, "duplicate preference");
        return Err(AppError::Duplicate(DuplicateField::Preference));
    }

    let pref = store
        .create(NewPreference {
            user_id: user.id,
            category,
            subcategory,
        })
        .await?;
    info!(user_id = %user.id, preference_id = %pref.id, "preference created");
    Ok(pref)
}

pub async fn get_preference(
    store: &dyn PreferenceStore,
    user: &User,
    id: Uuid,
) -> Result<Preference, AppError> {
    let found = store.find_owned(id, user.id).await?;
    authorize_owned(user, found, NOT_FOUND)
}

pub async fn delete_preference(
    store: &dyn PreferenceStore,
    user: &User,
    id: Uuid,
) -> Result<(), AppError> {
    let pref = get_preference(store, user, id).await?;
    if !store.delete_owned(pref.id, user.id).await? {
        // removed concurrently between the lookup and the delete
        return Err(AppError::NotFound(NOT_FOUND));
    }
    info!(user_id = %user.id, preference_id = %id, "preference deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_user, InMemoryPreferences};

    fn req(category: &str, subcategory: Option<&str>) -> CreatePreferenceRequest {
        CreatePreferenceRequest {
            category: category.into(),
            subcategory: subcategory.map(Into::into),
        }
    }

    #[tokio::test]
    async fn create_trims_and_drops_blank_subcategory() {
        let store = InMemoryPreferences::default();
        let user = test_user("a@x.com", "a");
        let pref = create_preference(&store, &user, req("  museums ", Some("   ")))
            .await
            .unwrap();
        assert_eq!(pref.category, "museums");
        assert_eq!(pref.subcategory, None);
        assert_eq!(pref.user_id, user.id);
    }

    #[tokio::test]
    async fn create_validates_category() {
        let store = InMemoryPreferences::default();
        let user = test_user("a@x.com", "a");
        let err = create_preference(&store, &user, req("  ", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let long = "c".repeat(101);
        let err = create_preference(&store, &user, req(&long, None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicates_are_per_user() {
        let store = InMemoryPreferences::default();
        let a = test_user("a@x.com", "a");
        let b = test_user("b@x.com", "b");

        create_preference(&store, &a, req("restaurants", Some("italian"))).await.unwrap();
        let err = create_preference(&store, &a, req("restaurants", Some("italian")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(DuplicateField::Preference)));

        // different subcategory, or none at all, is a different preference
        create_preference(&store, &a, req("restaurants", None)).await.unwrap();
        create_preference(&store, &a, req("restaurants", Some("thai"))).await.unwrap();
        let err = create_preference(&store, &a, req("restaurants", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate(DuplicateField::Preference)));

        create_preference(&store, &b, req("restaurants", Some("italian"))).await.unwrap();
        assert_eq!(store.list_for_user(a.id).await.unwrap().len(), 3);
        assert_eq!(store.list_for_user(b.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn strangers_see_not_found() {
        let store = InMemoryPreferences::default();
        let owner = test_user("a@x.com", "a");
        let stranger = test_user("b@x.com", "b");
        let pref = create_preference(&store, &owner, req("parks", None)).await.unwrap();

        let got = get_preference(&store, &owner, pref.id).await.unwrap();
        assert_eq!(got.id, pref.id);

        let err = get_preference(&store, &stranger, pref.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Preference")));
        let err = get_preference(&store, &owner, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Preference")));
    }

    #[tokio::test]
    async fn delete_is_owner_only() {
        let store = InMemoryPreferences::default();
        let owner = test_user("a@x.com", "a");
        let stranger = test_user("b@x.com", "b");
        let pref = create_preference(&store, &owner, req("parks", None)).await.unwrap();

        let err = delete_preference(&store, &stranger, pref.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Preference")));
        assert_eq!(store.list_for_user(owner.id).await.unwrap().len(), 1);

        delete_preference(&store, &owner, pref.id).await.unwrap();
        assert!(store.list_for_user(owner.id).await.unwrap().is_empty());

        let err = delete_preference(&store, &owner, pref.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound("Preference")));
    }
}
