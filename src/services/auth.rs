//! Phone/password accounts and bearer tokens.
//!
//! Passwords are hashed with Argon2id on the blocking pool. Tokens are HS256
//! JWTs carrying `{role, id, iat, exp}`; only the `user` role is accepted.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::address::validate_mobile;
use crate::domain::{AccountEvent, DomainEvent, PhoneNumber, User};
use crate::services::EventPublisher;
use crate::store::Store;
use crate::{EcommerceError, Result};

pub const USER_ROLE: &str = "user";

/// Login failures share one message so callers cannot tell which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid phone number or password";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub role: String,
    pub id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[validate(length(min = 1, max = 100, message = "full name is required"))]
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 32, message = "gender is required"))]
    pub gender: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(custom = "validate_mobile")]
    pub phone_number: String,
    #[validate(length(min = 1, max = 128, message = "password is required"))]
    pub password: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    events: EventPublisher,
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, events: EventPublisher, secret: &SecretString, token_ttl: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();
        Self {
            store, events,
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            token_ttl,
        }
    }

    pub async fn register(&self, input: Registration) -> Result<User> {
        input.validate()?;
        let phone = PhoneNumber::parse(input.phone_number)
            .map_err(|e| EcommerceError::Validation(e.to_string()))?
            .into_inner();
        let email = input.email.trim().to_lowercase();

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(EcommerceError::Conflict("This email is already registered.".into()));
        }
        if self.store.find_user_by_phone(&phone).await?.is_some() {
            return Err(EcommerceError::Conflict("This phone number is already registered.".into()));
        }

        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| EcommerceError::Internal(e.to_string()))??;

        let user = User::create(input.full_name, input.date_of_birth, input.gender, email, phone);
        // A concurrent registration can still win the race; the store maps
        // that to Duplicate, which surfaces as Conflict.
        let user = self.store.insert_user(user, password_hash).await?;
        tracing::info!(user_id = %user.id, "user registered");

        self.events.publish(&DomainEvent::Account(AccountEvent::Registered { user_id: user.id })).await;
        Ok(user)
    }

    /// Checks the credentials and issues a token.
    pub async fn login(&self, phone_number: &str, password: &str) -> Result<String> {
        let invalid = || EcommerceError::InvalidCredentials(INVALID_CREDENTIALS.into());
        let phone = PhoneNumber::parse(phone_number).map_err(|_| invalid())?;
        let Some(credentials) = self.store.find_credentials_by_phone(phone.as_str()).await? else {
            tracing::debug!("login for unknown phone number");
            return Err(invalid());
        };

        let password = password.to_owned();
        let hash = credentials.password_hash;
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| EcommerceError::Internal(e.to_string()))?;
        if !verified {
            tracing::debug!(user_id = %credentials.user.id, "login with wrong password");
            return Err(invalid());
        }

        self.issue_token(credentials.user.id)
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String> {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX);
        self.sign(&Claims { role: USER_ROLE.into(), id: user_id, iat, exp: iat.saturating_add(ttl) })
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| EcommerceError::Internal(format!("failed to sign token: {e}")))
    }

    /// Resolves an `Authorization` header value to the owner id it carries.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Uuid> {
        let unauthorized = |msg: &str| EcommerceError::Unauthorized(msg.into());
        let header = authorization.ok_or_else(|| unauthorized("Access denied. No token provided."))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Invalid authorization header"))?;

        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256)).map_err(|e| {
            tracing::debug!(error = %e, "rejected token");
            unauthorized("Invalid or expired token")
        })?;
        if data.claims.role != USER_ROLE {
            return Err(unauthorized("Invalid or expired token"));
        }
        Ok(data.claims.id)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EcommerceError::Internal(format!("failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else { return false };
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}
