//! User Aggregate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::address::validate_mobile;

/// Registered customer. The password hash is kept apart in [`UserCredentials`]
/// so a `User` can always be serialised safely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub email: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user row together with its stored password hash.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1, max = 32))]
    pub gender: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom = "validate_mobile")]
    pub phone_number: Option<String>,
}

impl User {
    pub fn create(full_name: String, date_of_birth: NaiveDate, gender: String, email: String, phone_number: String) -> Self {
        let now = Utc::now();
        Self { id: Uuid::now_v7(), full_name, date_of_birth, gender, email, phone_number, created_at: now, updated_at: now }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.full_name { self.full_name = v; }
        if let Some(v) = patch.date_of_birth { self.date_of_birth = v; }
        if let Some(v) = patch.gender { self.gender = v; }
        if let Some(v) = patch.email { self.email = v.to_lowercase(); }
        if let Some(v) = patch.phone_number { self.phone_number = v; }
        self.updated_at = Utc::now();
    }
}
