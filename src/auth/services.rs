use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::RegisterRequest,
        jwt::JwtKeys,
        password::{burn_dummy_verification, hash_password, verify_password},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    db::DuplicateField,
    error::AppError,
};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_USERNAME_LEN: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(users: &dyn UserStore, payload: RegisterRequest) -> Result<User, AppError> {
    let email = normalize_email(&payload.email);
    let username = payload.username.trim();

    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    let username_len = username.chars().count();
    if username_len == 0 || username_len > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be between 1 and {MAX_USERNAME_LEN} characters"
        )));
    }
    let password_len = payload.password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
        return Err(AppError::Validation(format!(
            "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!("registration with taken email");
        return Err(AppError::Duplicate(DuplicateField::Email));
    }
    if users.find_by_username(username).await?.is_some() {
        warn!("registration with taken username");
        return Err(AppError::Duplicate(DuplicateField::Username));
    }

    let hash = hash_password(&payload.password)?;

    // A concurrent registration can still win the race; the unique
    // constraints decide and `create` reports it as a duplicate.
    let user = users
        .create(NewUser {
            email: &email,
            username,
            password_hash: &hash,
        })
        .await?;

    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Unknown email and wrong password are the same failure to the caller.
pub async fn authenticate(
    users: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let email = normalize_email(email);

    let Some(user) = users.find_by_email(&email).await? else {
        burn_dummy_verification(password);
        warn!("login with unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login to inactive account");
        return Err(AppError::InactiveAccount);
    }

    Ok(user)
}

/// Turns a bearer token into the acting user. Every failure is `Unauthenticated`.
pub async fn resolve(users: &dyn UserStore, keys: &JwtKeys, token: &str) -> Result<User, AppError> {
    let email = keys.verify(token).map_err(|e| {
        debug!(reason = %e, "bearer token rejected");
        AppError::Unauthenticated
    })?;

    let user = users.find_by_email(&email).await?.ok_or_else(|| {
        debug!("token subject no longer exists");
        AppError::Unauthenticated
    })?;

    if !user.is_active {
        debug!(user_id = %user.id, "token for inactive user");
        return Err(AppError::Unauthenticated);
    }
    Ok(user)
}

/// Rows that belong to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Absent and not-owned look the same: both are `NotFound`.
pub fn authorize_owned<T: Owned>(
    user: &User,
    resource: Option<T>,
    what: &'static str,
) -> Result<T, AppError> {
    match resource {
        Some(r) if r.owner_id() == user.id => Ok(r),
        _ => Err(AppError::NotFound(what)),
    }
}
