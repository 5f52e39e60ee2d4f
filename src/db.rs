use std::fmt;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{config::AppConfig, error::AppError};

pub const MAX_PAGE_SIZE: i64 = 100;

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Which uniqueness rule a write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
    Preference,
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateField::Email => f.write_str("Email already registered"),
            DuplicateField::Username => f.write_str("Username already taken"),
            DuplicateField::Preference => f.write_str("Preference already exists"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(DuplicateField),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Turns a unique-constraint violation into `Duplicate`, using the
    /// constraint names declared in the migrations.
    pub fn from_write(err: sqlx::Error) -> Self {
        let field = err
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .and_then(|db| db.constraint().and_then(field_for_constraint));
        match field {
            Some(field) => StoreError::Duplicate(field),
            None => StoreError::Database(err),
        }
    }
}

fn field_for_constraint(name: &str) -> Option<DuplicateField> {
    match name {
        "users_email_key" => Some(DuplicateField::Email),
        "users_username_key" => Some(DuplicateField::Username),
        "preferences_owner_category_key" => Some(DuplicateField::Preference),
        _ => None,
    }
}

/// Validated offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub fn new(skip: i64, limit: i64) -> Result<Self, AppError> {
        if skip < 0 {
            return Err(AppError::Validation("skip must be >= 0".into()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { skip, limit })
    }
}
