//! Request extractors.

use axum::{
    async_trait,
    extract::{rejection::{JsonRejection, PathRejection}, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::config::AccessMode;
use crate::domain::OwnerScope;
use crate::state::AppState;
use crate::EcommerceError;

/// Owner scope of the request: the token's user id, or `Shared` when the
/// server runs without authentication.
#[derive(Clone, Copy, Debug)]
pub struct CurrentOwner(pub OwnerScope);

#[async_trait]
impl FromRequestParts<AppState> for CurrentOwner {
    type Rejection = EcommerceError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if state.access_mode() == AccessMode::Shared {
            return Ok(Self(OwnerScope::Shared));
        }
        let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        let user_id = state.auth.authenticate(header)?;
        Ok(Self(OwnerScope::User(user_id)))
    }
}

/// `Json` with rejections rendered as `{"error": ...}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(EcommerceError))]
pub struct ApiJson<T>(pub T);

/// `Path` with rejections rendered as `{"error": ...}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(EcommerceError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for EcommerceError {
    fn from(rejection: JsonRejection) -> Self { Self::Validation(rejection.body_text()) }
}

impl From<PathRejection> for EcommerceError {
    fn from(rejection: PathRejection) -> Self { Self::Validation(rejection.body_text()) }
}
